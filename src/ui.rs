use crate::dashboard::Dashboard;
use crate::models::{ComparisonSummary, Scalar};
use crate::panel::ChartPanel;
use crate::svg;

pub fn render_page(dash: &Dashboard) -> String {
    let options = dash.year_options();
    let location_summary = dash.location.summary.as_ref();
    let car_summary = dash.car.summary.as_ref();

    let values = [
        (
            "{{YEAR_OPTIONS_DONUT}}",
            year_options_html(&options, dash.donut_year),
        ),
        (
            "{{YEAR_OPTIONS_TREND}}",
            year_options_html(&options, dash.trend_year),
        ),
        (
            "{{YEAR_OPTIONS_WEEKDAY}}",
            year_options_html(&options, dash.weekday_year),
        ),
        (
            "{{YEAR_OPTIONS_LOCATION}}",
            year_options_html(&options, dash.location.year),
        ),
        (
            "{{YEAR_OPTIONS_TRIP}}",
            year_options_html(&options, dash.car.trip_year),
        ),
        ("{{DONUT_SLOT}}", chart_slot(&dash.donut)),
        ("{{TREND_SLOT}}", chart_slot(&dash.trend)),
        ("{{WEEKDAY_SLOT}}", chart_slot(&dash.weekday)),
        ("{{LOCATION_SLOT}}", chart_slot(&dash.location_chart)),
        ("{{CAR_SLOT}}", chart_slot(&dash.car_chart)),
        ("{{DONUT_STATUS}}", status_line(&dash.donut)),
        ("{{TREND_STATUS}}", status_line(&dash.trend)),
        ("{{WEEKDAY_STATUS}}", status_line(&dash.weekday)),
        (
            "{{LOCATION_STATUS}}",
            form_status(dash.location.error.as_deref()) + &status_line(&dash.location_chart),
        ),
        (
            "{{CAR_STATUS}}",
            form_status(dash.car.error.as_deref()) + &status_line(&dash.car_chart),
        ),
        ("{{CITY}}", escape_html(&dash.location.city)),
        ("{{STATE}}", escape_html(&dash.location.state)),
        (
            "{{ZIPCODE}}",
            escape_html(dash.location.zipcode.as_deref().unwrap_or("")),
        ),
        ("{{MAKE}}", escape_html(&dash.car.make)),
        ("{{MODEL}}", escape_html(&dash.car.model)),
        ("{{CAR_YEAR}}", escape_html(&dash.car.car_year)),
        ("{{CYLINDERS}}", escape_html(&dash.car.cylinders)),
        ("{{TRANSMISSION}}", escape_html(&dash.car.transmission)),
        ("{{USER_CAR_ID}}", escape_html(&dash.car.user_car_id)),
        (
            "{{LOCATION_COMPARISON_HIDDEN}}",
            hidden_attr(location_summary.is_some()).to_string(),
        ),
        (
            "{{CAR_COMPARISON_HIDDEN}}",
            hidden_attr(car_summary.is_some()).to_string(),
        ),
        (
            "{{CURRENT_YR_TOTAL}}",
            summary_value(location_summary, |s| &s.current_yearly_co2),
        ),
        (
            "{{NEW_YR_TOTAL}}",
            summary_value(location_summary, |s| &s.new_yearly_co2),
        ),
        (
            "{{CURRENT_DLY_RATE}}",
            summary_value(location_summary, |s| &s.current_daily_rate),
        ),
        (
            "{{NEW_DLY_RATE}}",
            summary_value(location_summary, |s| &s.new_daily_rate),
        ),
        (
            "{{COMPARISON_STATEMENT}}",
            summary_statement(location_summary),
        ),
        (
            "{{CURRENTCAR_YR_TOTAL}}",
            summary_value(car_summary, |s| &s.current_yearly_co2),
        ),
        (
            "{{NEWCAR_YR_TOTAL}}",
            summary_value(car_summary, |s| &s.new_yearly_co2),
        ),
        (
            "{{CURRENTCAR_DLY_RATE}}",
            summary_value(car_summary, |s| &s.current_daily_rate),
        ),
        (
            "{{NEWCAR_DLY_RATE}}",
            summary_value(car_summary, |s| &s.new_daily_rate),
        ),
        ("{{CAR_COMPARISON_STATEMENT}}", summary_statement(car_summary)),
    ];
    fill(INDEX_HTML, &values)
}

// Substituted text is never rescanned, so user input that spells a token stays literal.
fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let Some(end) = rest.find("}}") else {
            break;
        };
        let token = &rest[..end + 2];
        match values.iter().find(|(name, _)| *name == token) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(token),
        }
        rest = &rest[end + 2..];
    }
    out.push_str(rest);
    out
}

fn year_options_html(options: &[i32], selected: i32) -> String {
    options
        .iter()
        .map(|year| {
            if *year == selected {
                format!("<option value=\"{year}\" selected>{year}</option>")
            } else {
                format!("<option value=\"{year}\">{year}</option>")
            }
        })
        .collect()
}

fn chart_slot(panel: &ChartPanel) -> String {
    match panel.handle() {
        Some(handle) => svg::render(&handle.spec),
        None => "<p class=\"placeholder\">No chart drawn yet</p>".to_string(),
    }
}

fn status_line(panel: &ChartPanel) -> String {
    form_status(panel.last_error())
}

fn form_status(error: Option<&str>) -> String {
    match error {
        Some(message) => format!(
            "<p class=\"status\" data-type=\"error\">{}</p>",
            escape_html(message)
        ),
        None => String::new(),
    }
}

fn hidden_attr(visible: bool) -> &'static str {
    if visible { "" } else { " hidden" }
}

fn summary_value(
    summary: Option<&ComparisonSummary>,
    pick: impl Fn(&ComparisonSummary) -> &Scalar,
) -> String {
    summary
        .map(|s| escape_html(&pick(s).to_string()))
        .unwrap_or_default()
}

fn summary_statement(summary: Option<&ComparisonSummary>) -> String {
    summary
        .map(|s| escape_html(&s.comparison_statement))
        .unwrap_or_default()
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Carbon Footprint Dashboard</title>
  <style>
    :root {
      --bg: #f4f7f4;
      --card: #ffffff;
      --ink: #1f2a24;
      --muted: #5f6f66;
      --accent: #2f855a;
      --line: #dbe5dd;
      --soft: #f0f5f1;
      --error-bg: #fdecea;
      --error-ink: #b3261e;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
      background: var(--bg);
      color: var(--ink);
    }

    .wrap {
      max-width: 1060px;
      margin: 0 auto;
      padding: 24px 16px 48px;
    }

    header {
      margin-bottom: 20px;
    }

    h1 {
      margin: 0;
      font-size: 1.6rem;
    }

    .sub {
      margin: 4px 0 0;
      color: var(--muted);
    }

    h2 {
      margin: 0 0 10px;
      font-size: 1.05rem;
    }

    section {
      margin-bottom: 18px;
    }

    .charts-grid {
      display: grid;
      gap: 16px;
      grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
    }

    .card {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 10px;
      padding: 16px;
    }

    .year-form {
      display: flex;
      gap: 8px;
      align-items: center;
      margin: 0 0 12px;
      font-size: 0.85rem;
      color: var(--muted);
    }

    select,
    input {
      padding: 6px 8px;
      border: 1px solid var(--line);
      border-radius: 6px;
      font: inherit;
      background: #fff;
      color: var(--ink);
    }

    input[readonly] {
      background: var(--soft);
    }

    .fields {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 10px;
      margin-bottom: 12px;
    }

    .field {
      display: flex;
      flex-direction: column;
      gap: 4px;
      font-size: 0.78rem;
      color: var(--muted);
    }

    button {
      background: var(--accent);
      color: #fff;
      border: none;
      border-radius: 6px;
      padding: 8px 14px;
      font: inherit;
      cursor: pointer;
    }

    button.ghost {
      background: transparent;
      color: var(--accent);
      border: 1px solid var(--accent);
      padding: 5px 10px;
    }

    .status {
      margin: 10px 0 0;
      padding: 8px 10px;
      border-radius: 6px;
      font-size: 0.85rem;
    }

    .status[data-type="error"] {
      background: var(--error-bg);
      color: var(--error-ink);
    }

    .placeholder {
      margin: 0;
      padding: 28px 0;
      text-align: center;
      color: var(--muted);
      font-size: 0.9rem;
    }

    .chart {
      width: 100%;
      height: auto;
      display: block;
    }

    .chart-grid {
      stroke: #e3eae4;
      stroke-width: 1;
    }

    .chart-axis {
      fill: var(--muted);
      font-size: 11px;
    }

    .chart-label {
      fill: var(--ink);
      font-size: 12px;
    }

    .chart-empty {
      fill: var(--muted);
      font-size: 14px;
    }

    .compare-stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 10px;
      margin: 14px 0;
    }

    .stat {
      background: var(--soft);
      border-radius: 8px;
      padding: 10px 12px;
    }

    .stat .label {
      display: block;
      font-size: 0.7rem;
      text-transform: uppercase;
      letter-spacing: 0.05em;
      color: var(--muted);
    }

    .stat .value {
      display: block;
      font-size: 1.25rem;
      font-weight: 600;
    }

    .statement {
      margin: 0 0 14px;
    }

    footer {
      margin-top: 30px;
      color: var(--muted);
      font-size: 0.8rem;
    }
  </style>
</head>
<body>
  <div class="wrap">
    <header>
      <h1>Carbon Footprint Dashboard</h1>
      <p class="sub">Where your CO2 comes from, and what moving or switching cars would change.</p>
    </header>

    <section class="charts-grid">
      <div class="card">
        <h2>Footprint by Source</h2>
        <form class="year-form" method="post" action="/donut-year">
          <label for="donut-year">Year</label>
          <select id="donut-year" name="year" onchange="this.form.submit()">{{YEAR_OPTIONS_DONUT}}</select>
          <button class="ghost" type="submit">Go</button>
        </form>
        <div id="donutChart" class="chart-slot">{{DONUT_SLOT}}</div>
        {{DONUT_STATUS}}
      </div>
      <div class="card">
        <h2>Monthly Trend</h2>
        <form class="year-form" method="post" action="/trend-year">
          <label for="trend-year">Year</label>
          <select id="trend-year" name="year" onchange="this.form.submit()">{{YEAR_OPTIONS_TREND}}</select>
          <button class="ghost" type="submit">Go</button>
        </form>
        <div id="lineGraph" class="chart-slot">{{TREND_SLOT}}</div>
        {{TREND_STATUS}}
      </div>
      <div class="card">
        <h2>Footprint by Weekday</h2>
        <form class="year-form" method="post" action="/weekday-year">
          <label for="weekday-year">Year</label>
          <select id="weekday-year" name="year" onchange="this.form.submit()">{{YEAR_OPTIONS_WEEKDAY}}</select>
          <button class="ghost" type="submit">Go</button>
        </form>
        <div id="weekdayBarChart" class="chart-slot">{{WEEKDAY_SLOT}}</div>
        {{WEEKDAY_STATUS}}
      </div>
    </section>

    <section class="card">
      <h2>What if you moved?</h2>
      <form method="post" action="/new-location">
        <div class="fields">
          <label class="field">City
            <input id="city" name="city" value="{{CITY}}" placeholder="Boise">
          </label>
          <label class="field">State
            <input id="state" name="state" value="{{STATE}}" placeholder="ID">
          </label>
          <label class="field">Zipcode
            <input id="zipcode" value="{{ZIPCODE}}" readonly placeholder="found for you">
          </label>
        </div>
        <button id="new-location-button" type="submit">Compare Locations</button>
      </form>
      <form class="year-form" method="post" action="/location-year">
        <label for="location-year">Year</label>
        <select id="location-year" name="year" onchange="this.form.submit()">{{YEAR_OPTIONS_LOCATION}}</select>
        <button class="ghost" type="submit">Go</button>
      </form>
      {{LOCATION_STATUS}}
      <div id="location-comparison"{{LOCATION_COMPARISON_HIDDEN}}>
        <div class="compare-stats">
          <div class="stat">
            <span class="label">Current yearly CO2</span>
            <span class="value" id="current-yr-total">{{CURRENT_YR_TOTAL}}</span>
          </div>
          <div class="stat">
            <span class="label">New yearly CO2</span>
            <span class="value" id="new-yr-total">{{NEW_YR_TOTAL}}</span>
          </div>
          <div class="stat">
            <span class="label">Current daily rate</span>
            <span class="value" id="current-dly-rate">{{CURRENT_DLY_RATE}}</span>
          </div>
          <div class="stat">
            <span class="label">New daily rate</span>
            <span class="value" id="new-dly-rate">{{NEW_DLY_RATE}}</span>
          </div>
        </div>
        <p class="statement" id="comparison-statement">{{COMPARISON_STATEMENT}}</p>
        <div id="locationBarChart" class="chart-slot">{{LOCATION_SLOT}}</div>
      </div>
    </section>

    <section class="card">
      <h2>What if you switched cars?</h2>
      <form method="post" action="/new-car">
        <div class="fields">
          <label class="field">Make
            <input id="make" name="make" value="{{MAKE}}" placeholder="Honda">
          </label>
          <label class="field">Model
            <input id="model" name="model" value="{{MODEL}}" placeholder="Fit">
          </label>
          <label class="field">Model year
            <input id="car-year" name="car_year" value="{{CAR_YEAR}}" placeholder="2015">
          </label>
          <label class="field">Cylinders
            <input id="cylinders" name="cylinders" value="{{CYLINDERS}}" placeholder="4">
          </label>
          <label class="field">Transmission
            <input id="transmission" name="transmission" value="{{TRANSMISSION}}" placeholder="Manual 5-spd">
          </label>
        </div>
        <input type="hidden" id="my-car" name="user_car_id" value="{{USER_CAR_ID}}">
        <button id="new-car-button" type="submit">Compare Cars</button>
      </form>
      <form class="year-form" method="post" action="/trip-year">
        <label for="trip-year">Trip year</label>
        <select id="trip-year" name="year" onchange="this.form.submit()">{{YEAR_OPTIONS_TRIP}}</select>
        <button class="ghost" type="submit">Go</button>
      </form>
      {{CAR_STATUS}}
      <div id="car-comparison"{{CAR_COMPARISON_HIDDEN}}>
        <div class="compare-stats">
          <div class="stat">
            <span class="label">Current yearly CO2</span>
            <span class="value" id="currentCar-yr-total">{{CURRENTCAR_YR_TOTAL}}</span>
          </div>
          <div class="stat">
            <span class="label">New yearly CO2</span>
            <span class="value" id="newCar-yr-total">{{NEWCAR_YR_TOTAL}}</span>
          </div>
          <div class="stat">
            <span class="label">Current daily rate</span>
            <span class="value" id="currentCar-dly-rate">{{CURRENTCAR_DLY_RATE}}</span>
          </div>
          <div class="stat">
            <span class="label">New daily rate</span>
            <span class="value" id="newCar-dly-rate">{{NEWCAR_DLY_RATE}}</span>
          </div>
        </div>
        <p class="statement" id="car-comparison-statement">{{CAR_COMPARISON_STATEMENT}}</p>
        <div id="carBarChart" class="chart-slot">{{CAR_SLOT}}</div>
      </div>
    </section>

    <footer>Data served by the carbon stats backend. Charts update when a form is submitted.</footer>
  </div>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts;
    use crate::models::DatatypeTotals;

    fn sample_summary() -> ComparisonSummary {
        ComparisonSummary {
            current_yearly_co2: Scalar::Number(1450.0),
            new_yearly_co2: Scalar::Text("1210".to_string()),
            current_daily_rate: Scalar::Number(3.97),
            new_daily_rate: Scalar::Number(3.31),
            comparison_statement: "You would save 240 kg of CO2 per year.".to_string(),
            current_monthly_co2: vec![100.0; 12],
            new_monthly_co2: vec![90.0; 12],
        }
    }

    #[test]
    fn page_contains_every_contract_id() {
        let page = render_page(&Dashboard::new(2026, String::new()));
        let ids = [
            "donutChart",
            "lineGraph",
            "weekdayBarChart",
            "locationBarChart",
            "carBarChart",
            "donut-year",
            "trend-year",
            "weekday-year",
            "location-year",
            "trip-year",
            "city",
            "state",
            "zipcode",
            "new-location-button",
            "location-comparison",
            "current-yr-total",
            "new-yr-total",
            "current-dly-rate",
            "new-dly-rate",
            "comparison-statement",
            "make",
            "model",
            "car-year",
            "cylinders",
            "transmission",
            "my-car",
            "new-car-button",
            "car-comparison",
            "currentCar-yr-total",
            "newCar-yr-total",
            "currentCar-dly-rate",
            "newCar-dly-rate",
            "car-comparison-statement",
        ];
        for id in ids {
            assert!(page.contains(&format!("id=\"{id}\"")), "missing id {id}");
        }
        assert!(!page.contains("{{"), "unreplaced template token");
    }

    #[test]
    fn user_input_is_escaped() {
        let mut dash = Dashboard::new(2026, String::new());
        dash.location
            .record_inputs("<script>alert(1)</script>", "\"ID\"");
        let page = render_page(&dash);
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(page.contains("&quot;ID&quot;"));
    }

    #[test]
    fn user_text_that_spells_a_token_stays_literal() {
        let mut dash = Dashboard::new(2026, String::new());
        dash.car.record_inputs("Honda", "Fit", "2015", "", "");
        dash.location.record_inputs("{{MAKE}}", "ID");
        let page = render_page(&dash);
        assert!(page.contains("value=\"{{MAKE}}\""));
        assert_eq!(page.matches("value=\"Honda\"").count(), 1);
    }

    #[test]
    fn comparison_blocks_stay_hidden_until_a_summary_exists() {
        let mut dash = Dashboard::new(2026, String::new());
        let page = render_page(&dash);
        assert!(page.contains("<div id=\"location-comparison\" hidden>"));
        assert!(page.contains("<div id=\"car-comparison\" hidden>"));

        dash.location.record_comparison(sample_summary());
        let page = render_page(&dash);
        assert!(page.contains("<div id=\"location-comparison\">"));
        assert!(page.contains("<div id=\"car-comparison\" hidden>"));
        assert!(page.contains(">1450<"));
        assert!(page.contains(">1210<"));
        assert!(page.contains("You would save 240 kg of CO2 per year."));
    }

    #[test]
    fn selected_year_is_marked_in_its_dropdown_only() {
        let mut dash = Dashboard::new(2026, String::new());
        dash.donut_year = 2024;
        let page = render_page(&dash);
        assert!(page.contains("<option value=\"2024\" selected>2024</option>"));
        assert_eq!(page.matches("<option value=\"2026\" selected>").count(), 4);
    }

    #[test]
    fn drawn_chart_replaces_the_placeholder() {
        let mut dash = Dashboard::new(2026, String::new());
        let token = dash.donut.begin_refresh();
        dash.donut.complete_refresh(
            token,
            Ok(charts::yearly_breakdown(&DatatypeTotals([
                120.0, 300.0, 45.0,
            ]))),
        );
        let page = render_page(&dash);
        assert!(page.contains("<svg"));
        assert_eq!(page.matches("No chart drawn yet").count(), 4);
    }

    #[test]
    fn fetch_error_shows_up_as_status_line() {
        let mut dash = Dashboard::new(2026, String::new());
        let token = dash.trend.begin_refresh();
        dash.trend.complete_refresh(
            token,
            Err(crate::errors::FetchError::malformed(
                "/co2-trend.json",
                "kwh has 2 entries, expected 12",
            )),
        );
        let page = render_page(&dash);
        assert!(page.contains("data-type=\"error\""));
        assert!(page.contains("kwh has 2 entries, expected 12"));
    }
}

use crate::charts::{BarSeries, ChartSpec, LineSeries};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

const DOUGHNUT_W: f64 = 340.0;
const DOUGHNUT_H: f64 = 240.0;
const PLOT_W: f64 = 620.0;
const PLOT_H: f64 = 300.0;
const MARGIN_LEFT: f64 = 48.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 34.0;
const MARGIN_BOTTOM: f64 = 36.0;
const TICKS: usize = 4;

pub fn render(spec: &ChartSpec) -> String {
    match spec {
        ChartSpec::Doughnut {
            labels,
            values,
            colors,
        } => doughnut(labels, values, colors),
        ChartSpec::Line { labels, series } => line(labels, series),
        ChartSpec::Bar { labels, series } => bar(labels, series),
    }
}

fn doughnut(labels: &[String], values: &[f64], colors: &[String]) -> String {
    let mut svg = open_svg(DOUGHNUT_W, DOUGHNUT_H);
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        svg.push_str(
            "<text class=\"chart-empty\" x=\"50%\" y=\"50%\" text-anchor=\"middle\">No data yet</text>",
        );
        svg.push_str("</svg>");
        return svg;
    }

    let cx = 120.0;
    let cy = 124.0;
    let outer = 86.0;
    let inner = 52.0;
    let mut cumulative = 0.0;

    for (i, &value) in values.iter().enumerate() {
        if value <= 0.0 {
            continue;
        }
        let color = colors.get(i).map(String::as_str).unwrap_or("#999999");
        let start = TAU * (cumulative / total) - FRAC_PI_2;
        cumulative += value;
        let end = TAU * (cumulative / total) - FRAC_PI_2;

        // A single-source year is a full ring; an arc cannot close on itself.
        if value / total >= 0.999 {
            svg.push_str(&format!(
                "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{:.2}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{:.2}\"/>",
                (outer + inner) / 2.0,
                outer - inner
            ));
            continue;
        }

        let large_arc = if end - start > PI { 1 } else { 0 };
        let (x0, y0) = (cx + outer * start.cos(), cy + outer * start.sin());
        let (x1, y1) = (cx + outer * end.cos(), cy + outer * end.sin());
        let (x2, y2) = (cx + inner * end.cos(), cy + inner * end.sin());
        let (x3, y3) = (cx + inner * start.cos(), cy + inner * start.sin());
        svg.push_str(&format!(
            "<path d=\"M {x0:.2} {y0:.2} A {outer} {outer} 0 {large_arc} 1 {x1:.2} {y1:.2} \
             L {x2:.2} {y2:.2} A {inner} {inner} 0 {large_arc} 0 {x3:.2} {y3:.2} Z\" fill=\"{color}\"/>"
        ));
    }

    for (i, label) in labels.iter().enumerate() {
        let color = colors.get(i).map(String::as_str).unwrap_or("#999999");
        let value = values.get(i).copied().unwrap_or(0.0);
        let row = 78.0 + i as f64 * 22.0;
        svg.push_str(&format!(
            "<rect x=\"224\" y=\"{row}\" width=\"12\" height=\"12\" fill=\"{color}\"/>"
        ));
        svg.push_str(&format!(
            "<text class=\"chart-label\" x=\"242\" y=\"{:.0}\">{label}: {}</text>",
            row + 10.0,
            format_axis_value(value)
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn line(labels: &[String], series: &[LineSeries]) -> String {
    let mut svg = open_svg(PLOT_W, PLOT_H);
    let values: Vec<f64> = series.iter().flat_map(|s| s.values.iter().copied()).collect();
    let points = series.iter().map(|s| s.values.len()).max().unwrap_or(0);
    if values.is_empty() || points == 0 {
        svg.push_str(
            "<text class=\"chart-empty\" x=\"50%\" y=\"50%\" text-anchor=\"middle\">No data yet</text>",
        );
        svg.push_str("</svg>");
        return svg;
    }

    let (min, max) = domain(&values);
    let frame = Frame::plot();
    svg.push_str(&frame.grid(min, max));
    svg.push_str(&frame.x_labels(labels));

    let baseline = frame.y_at(0.0, min, max);
    for s in series.iter().filter(|s| !s.values.is_empty()) {
        let mut d = String::new();
        for (i, &value) in s.values.iter().enumerate() {
            let x = frame.x_at(i, points);
            let y = frame.y_at(value, min, max);
            if i == 0 {
                d.push_str(&format!("M {x:.2} {baseline:.2} L {x:.2} {y:.2}"));
            } else {
                d.push_str(&format!(" L {x:.2} {y:.2}"));
            }
        }
        let last_x = frame.x_at(s.values.len() - 1, points);
        d.push_str(&format!(" L {last_x:.2} {baseline:.2} Z"));
        svg.push_str(&format!(
            "<path class=\"chart-area\" d=\"{d}\" fill=\"{}\" fill-opacity=\"0.25\" stroke=\"none\"/>",
            s.fill
        ));
    }

    for s in series {
        let mut d = String::new();
        for (i, &value) in s.values.iter().enumerate() {
            let x = frame.x_at(i, points);
            let y = frame.y_at(value, min, max);
            if i == 0 {
                d.push_str(&format!("M {x:.2} {y:.2}"));
            } else {
                d.push_str(&format!(" L {x:.2} {y:.2}"));
            }
        }
        svg.push_str(&format!(
            "<path class=\"chart-line\" d=\"{d}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>",
            s.stroke
        ));
        for (i, &value) in s.values.iter().enumerate() {
            let x = frame.x_at(i, points);
            let y = frame.y_at(value, min, max);
            svg.push_str(&format!(
                "<circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"2.5\" fill=\"#fff\" stroke=\"{}\"/>",
                s.stroke
            ));
        }
    }

    let swatches: Vec<(&str, &str)> = series
        .iter()
        .map(|s| (s.label.as_str(), s.stroke.as_str()))
        .collect();
    svg.push_str(&legend(&swatches));
    svg.push_str("</svg>");
    svg
}

fn bar(labels: &[String], series: &[BarSeries]) -> String {
    let mut svg = open_svg(PLOT_W, PLOT_H);
    let values: Vec<f64> = series.iter().flat_map(|s| s.values.iter().copied()).collect();
    let groups = series.iter().map(|s| s.values.len()).max().unwrap_or(0);
    if values.is_empty() || groups == 0 {
        svg.push_str(
            "<text class=\"chart-empty\" x=\"50%\" y=\"50%\" text-anchor=\"middle\">No data yet</text>",
        );
        svg.push_str("</svg>");
        return svg;
    }

    let (min, max) = domain(&values);
    let frame = Frame::plot();
    svg.push_str(&frame.grid(min, max));
    svg.push_str(&frame.x_labels(labels));

    let slot = frame.width / groups as f64;
    let bar_w = slot * 0.8 / series.len() as f64;
    let baseline = frame.y_at(0.0, min, max);
    for (j, s) in series.iter().enumerate() {
        for (i, &value) in s.values.iter().enumerate() {
            let x = frame.left + i as f64 * slot + slot * 0.1 + j as f64 * bar_w;
            let y = frame.y_at(value, min, max);
            let (top, height) = if y <= baseline {
                (y, baseline - y)
            } else {
                (baseline, y - baseline)
            };
            svg.push_str(&format!(
                "<rect class=\"chart-bar\" x=\"{x:.2}\" y=\"{top:.2}\" width=\"{bar_w:.2}\" \
                 height=\"{height:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
                s.fill, s.border
            ));
        }
    }

    let swatches: Vec<(&str, &str)> = series
        .iter()
        .map(|s| (s.label.as_str(), s.border.as_str()))
        .collect();
    svg.push_str(&legend(&swatches));
    svg.push_str("</svg>");
    svg
}

struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn plot() -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: PLOT_W - MARGIN_LEFT - MARGIN_RIGHT,
            height: PLOT_H - MARGIN_TOP - MARGIN_BOTTOM,
        }
    }

    fn x_at(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return self.left + self.width / 2.0;
        }
        self.left + index as f64 * self.width / (count - 1) as f64
    }

    fn y_at(&self, value: f64, min: f64, max: f64) -> f64 {
        let span = max - min;
        self.top + self.height - (value - min) / span * self.height
    }

    fn grid(&self, min: f64, max: f64) -> String {
        let mut out = String::new();
        for i in 0..=TICKS {
            let value = min + (max - min) * i as f64 / TICKS as f64;
            let y = self.y_at(value, min, max);
            out.push_str(&format!(
                "<line class=\"chart-grid\" x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{:.2}\" y2=\"{y:.2}\"/>",
                self.left,
                self.left + self.width
            ));
            out.push_str(&format!(
                "<text class=\"chart-axis\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\">{}</text>",
                self.left - 8.0,
                y + 4.0,
                format_axis_value(value)
            ));
        }
        out
    }

    fn x_labels(&self, labels: &[String]) -> String {
        let every = if labels.len() > 8 { 2 } else { 1 };
        let mut out = String::new();
        for (i, label) in labels.iter().enumerate() {
            if i % every != 0 {
                continue;
            }
            let slot = self.width / labels.len() as f64;
            let x = self.left + i as f64 * slot + slot / 2.0;
            out.push_str(&format!(
                "<text class=\"chart-axis\" x=\"{x:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{label}</text>",
                self.top + self.height + 20.0
            ));
        }
        out
    }
}

fn legend(entries: &[(&str, &str)]) -> String {
    let mut out = String::new();
    let mut x = MARGIN_LEFT;
    for (label, color) in entries {
        out.push_str(&format!(
            "<rect x=\"{x:.2}\" y=\"10\" width=\"12\" height=\"12\" fill=\"{color}\"/>"
        ));
        out.push_str(&format!(
            "<text class=\"chart-label\" x=\"{:.2}\" y=\"20\">{label}</text>",
            x + 18.0
        ));
        x += 44.0 + label.len() as f64 * 7.0;
    }
    out
}

fn domain(values: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    // Zero stays in the domain as the bar baseline.
    min = min.min(0.0);
    max = max.max(0.0);
    if (max - min).abs() < f64::EPSILON {
        max = min + 1.0;
    }
    (min, max)
}

fn open_svg(width: f64, height: f64) -> String {
    format!(
        "<svg class=\"chart\" viewBox=\"0 0 {width:.0} {height:.0}\" \
         xmlns=\"http://www.w3.org/2000/svg\" role=\"img\">"
    )
}

fn format_axis_value(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if (rounded - rounded.trunc()).abs() < 1e-9 {
        format!("{}", rounded.trunc() as i64)
    } else {
        format!("{rounded:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{BarSeries, ChartSpec, LineSeries};

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    fn doughnut_spec(values: Vec<f64>) -> ChartSpec {
        ChartSpec::Doughnut {
            labels: vec![
                "Trip".to_string(),
                "Electricity".to_string(),
                "Natural Gas".to_string(),
            ],
            values,
            colors: vec![
                "#FF6384".to_string(),
                "#36A2EB".to_string(),
                "#FFCE56".to_string(),
            ],
        }
    }

    #[test]
    fn doughnut_draws_a_segment_per_positive_value() {
        let svg = render(&doughnut_spec(vec![120.0, 300.0, 45.0]));
        assert_eq!(count(&svg, "<path"), 3);
        assert!(svg.contains("#FF6384"));
        assert!(svg.contains("#36A2EB"));
        assert!(svg.contains("#FFCE56"));
        assert!(svg.contains("Trip: 120"));
    }

    #[test]
    fn doughnut_with_single_source_draws_a_full_ring() {
        let svg = render(&doughnut_spec(vec![88.0, 0.0, 0.0]));
        assert_eq!(count(&svg, "<path"), 0);
        assert_eq!(count(&svg, "<circle"), 1);
    }

    #[test]
    fn doughnut_without_data_says_so() {
        let svg = render(&doughnut_spec(vec![0.0, 0.0, 0.0]));
        assert!(svg.contains("No data yet"));
        assert_eq!(count(&svg, "<path"), 0);
    }

    #[test]
    fn line_draws_a_path_and_points_per_series() {
        let labels: Vec<String> = crate::charts::MONTH_LABELS
            .iter()
            .map(|l| l.to_string())
            .collect();
        let series: Vec<LineSeries> = (0..3)
            .map(|i| LineSeries {
                label: format!("Series {i}"),
                stroke: "#36A2EB".to_string(),
                fill: "#36A2EB".to_string(),
                values: vec![1.0; 12],
            })
            .collect();
        let svg = render(&ChartSpec::Line { labels, series });
        assert_eq!(count(&svg, "class=\"chart-area\""), 3);
        assert_eq!(count(&svg, "class=\"chart-line\""), 3);
        assert_eq!(count(&svg, "r=\"2.5\""), 36);
    }

    #[test]
    fn twelve_labels_thin_to_every_other_month() {
        let labels: Vec<String> = crate::charts::MONTH_LABELS
            .iter()
            .map(|l| l.to_string())
            .collect();
        let series = vec![LineSeries {
            label: "Trips".to_string(),
            stroke: "rgba(75,192,192,1)".to_string(),
            fill: "rgba(75,192,192,0.4)".to_string(),
            values: vec![1.0; 12],
        }];
        let svg = render(&ChartSpec::Line { labels, series });
        assert!(svg.contains(">January<"));
        assert!(svg.contains(">March<"));
        assert!(!svg.contains(">February<"));
    }

    #[test]
    fn bar_draws_a_rect_per_value_and_keeps_all_weekday_labels() {
        let labels: Vec<String> = crate::charts::WEEKDAY_LABELS
            .iter()
            .map(|l| l.to_string())
            .collect();
        let series = vec![
            BarSeries {
                label: "Electricity Footprint".to_string(),
                fill: "rgba(75, 192, 192, 0.2)".to_string(),
                border: "rgba(75, 192, 192, 1)".to_string(),
                values: vec![5.0; 7],
            },
            BarSeries {
                label: "Trip Footprint".to_string(),
                fill: "rgba(255, 206, 86, 0.2)".to_string(),
                border: "rgba(255, 206, 86, 1)".to_string(),
                values: vec![3.0; 7],
            },
        ];
        let svg = render(&ChartSpec::Bar { labels, series });
        assert_eq!(count(&svg, "class=\"chart-bar\""), 14);
        for day in crate::charts::WEEKDAY_LABELS {
            assert!(svg.contains(&format!(">{day}<")), "missing {day}");
        }
    }

    #[test]
    fn flat_zero_series_still_renders_a_frame() {
        let labels = vec!["Monday".to_string()];
        let series = vec![BarSeries {
            label: "Electricity Footprint".to_string(),
            fill: "rgba(75, 192, 192, 0.2)".to_string(),
            border: "rgba(75, 192, 192, 1)".to_string(),
            values: vec![0.0],
        }];
        let svg = render(&ChartSpec::Bar { labels, series });
        assert!(svg.contains("chart-grid"));
        assert_eq!(count(&svg, "class=\"chart-bar\""), 1);
    }

    #[test]
    fn axis_values_round_to_one_decimal() {
        assert_eq!(format_axis_value(12.0), "12");
        assert_eq!(format_axis_value(12.34), "12.3");
        assert_eq!(format_axis_value(0.05), "0.1");
        assert_eq!(format_axis_value(-3.0), "-3");
    }
}

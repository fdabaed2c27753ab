use crate::models::{ComparisonSummary, DatatypeTotals, TrendSeries, WeekdaySeries};
use serde::Serialize;

pub const MONTH_LABELS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

// The rgba spacing differs between line and bar colors on purpose.
const SEGMENT_COLORS: [&str; 3] = ["#FF6384", "#36A2EB", "#FFCE56"];
const TRIP_LINE_STROKE: &str = "rgba(75,192,192,1)";
const TRIP_LINE_FILL: &str = "rgba(75,192,192,0.4)";
const ELECTRICITY_HEX: &str = "#36A2EB";
const NATURAL_GAS_HEX: &str = "#FFCE56";
const TEAL_BAR_FILL: &str = "rgba(75, 192, 192, 0.2)";
const TEAL_BAR_BORDER: &str = "rgba(75, 192, 192, 1)";
const AMBER_BAR_FILL: &str = "rgba(255, 206, 86, 0.2)";
const AMBER_BAR_BORDER: &str = "rgba(255, 206, 86, 1)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub label: String,
    pub stroke: String,
    pub fill: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub label: String,
    pub fill: String,
    pub border: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Doughnut {
        labels: Vec<String>,
        values: Vec<f64>,
        colors: Vec<String>,
    },
    Line {
        labels: Vec<String>,
        series: Vec<LineSeries>,
    },
    Bar {
        labels: Vec<String>,
        series: Vec<BarSeries>,
    },
}

pub fn yearly_breakdown(totals: &DatatypeTotals) -> ChartSpec {
    ChartSpec::Doughnut {
        labels: vec![
            "Trip".to_string(),
            "Electricity".to_string(),
            "Natural Gas".to_string(),
        ],
        values: vec![totals.trip(), totals.electricity(), totals.natural_gas()],
        colors: SEGMENT_COLORS.iter().map(|c| c.to_string()).collect(),
    }
}

pub fn monthly_trend(series: &TrendSeries) -> ChartSpec {
    ChartSpec::Line {
        labels: month_labels(),
        series: vec![
            LineSeries {
                label: "Trips".to_string(),
                stroke: TRIP_LINE_STROKE.to_string(),
                fill: TRIP_LINE_FILL.to_string(),
                values: series.trip.clone(),
            },
            LineSeries {
                label: "Electricity".to_string(),
                stroke: ELECTRICITY_HEX.to_string(),
                fill: ELECTRICITY_HEX.to_string(),
                values: series.kwh.clone(),
            },
            LineSeries {
                label: "Natural Gas".to_string(),
                stroke: NATURAL_GAS_HEX.to_string(),
                fill: NATURAL_GAS_HEX.to_string(),
                values: series.ng.clone(),
            },
        ],
    }
}

pub fn weekday_breakdown(series: &WeekdaySeries) -> ChartSpec {
    ChartSpec::Bar {
        labels: WEEKDAY_LABELS.iter().map(|l| l.to_string()).collect(),
        series: vec![
            BarSeries {
                label: "Electricity Footprint".to_string(),
                fill: TEAL_BAR_FILL.to_string(),
                border: TEAL_BAR_BORDER.to_string(),
                values: series.kwh.clone(),
            },
            BarSeries {
                label: "Trip Footprint".to_string(),
                fill: AMBER_BAR_FILL.to_string(),
                border: AMBER_BAR_BORDER.to_string(),
                values: series.trip.clone(),
            },
        ],
    }
}

pub fn location_comparison(summary: &ComparisonSummary) -> ChartSpec {
    comparison_bars("Current Location", "New Location", summary)
}

pub fn car_comparison(summary: &ComparisonSummary) -> ChartSpec {
    comparison_bars("Current Car", "New Car", summary)
}

fn comparison_bars(
    current_label: &str,
    new_label: &str,
    summary: &ComparisonSummary,
) -> ChartSpec {
    ChartSpec::Bar {
        labels: month_labels(),
        series: vec![
            BarSeries {
                label: current_label.to_string(),
                fill: TEAL_BAR_FILL.to_string(),
                border: TEAL_BAR_BORDER.to_string(),
                values: summary.current_monthly_co2.clone(),
            },
            BarSeries {
                label: new_label.to_string(),
                fill: AMBER_BAR_FILL.to_string(),
                border: AMBER_BAR_BORDER.to_string(),
                values: summary.new_monthly_co2.clone(),
            },
        ],
    }
}

fn month_labels() -> Vec<String> {
    MONTH_LABELS.iter().map(|l| l.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scalar;

    fn sample_summary() -> ComparisonSummary {
        ComparisonSummary {
            current_yearly_co2: Scalar::Number(1450.0),
            new_yearly_co2: Scalar::Number(1210.0),
            current_daily_rate: Scalar::Number(3.97),
            new_daily_rate: Scalar::Number(3.31),
            comparison_statement: "You would save 240 kg of CO2 per year.".to_string(),
            current_monthly_co2: vec![100.0; 12],
            new_monthly_co2: vec![90.0; 12],
        }
    }

    #[test]
    fn yearly_breakdown_keeps_source_order_and_palette() {
        let spec = yearly_breakdown(&DatatypeTotals([120.0, 300.0, 45.0]));
        let ChartSpec::Doughnut {
            labels,
            values,
            colors,
        } = spec
        else {
            panic!("expected a doughnut spec");
        };
        assert_eq!(labels, vec!["Trip", "Electricity", "Natural Gas"]);
        assert_eq!(values, vec![120.0, 300.0, 45.0]);
        assert_eq!(colors, vec!["#FF6384", "#36A2EB", "#FFCE56"]);
    }

    #[test]
    fn monthly_trend_builds_three_lines_over_twelve_months() {
        let spec = monthly_trend(&TrendSeries {
            trip: vec![1.0; 12],
            kwh: vec![2.0; 12],
            ng: vec![3.0; 12],
        });
        let ChartSpec::Line { labels, series } = spec else {
            panic!("expected a line spec");
        };
        assert_eq!(labels.len(), 12);
        assert_eq!(labels[0], "January");
        assert_eq!(labels[11], "December");
        let names: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(names, vec!["Trips", "Electricity", "Natural Gas"]);
        assert_eq!(series[0].stroke, "rgba(75,192,192,1)");
        assert_eq!(series[0].fill, "rgba(75,192,192,0.4)");
        assert_eq!(series[1].stroke, "#36A2EB");
    }

    #[test]
    fn weekday_breakdown_puts_electricity_before_trips() {
        let spec = weekday_breakdown(&WeekdaySeries {
            kwh: vec![5.0; 7],
            trip: vec![6.0; 7],
        });
        let ChartSpec::Bar { labels, series } = spec else {
            panic!("expected a bar spec");
        };
        assert_eq!(labels[0], "Monday");
        assert_eq!(labels[6], "Sunday");
        assert_eq!(series[0].label, "Electricity Footprint");
        assert_eq!(series[0].values, vec![5.0; 7]);
        assert_eq!(series[0].fill, "rgba(75, 192, 192, 0.2)");
        assert_eq!(series[1].label, "Trip Footprint");
        assert_eq!(series[1].border, "rgba(255, 206, 86, 1)");
    }

    #[test]
    fn comparison_charts_label_current_and_new() {
        let location = location_comparison(&sample_summary());
        let car = car_comparison(&sample_summary());
        let ChartSpec::Bar { series, .. } = location else {
            panic!("expected a bar spec");
        };
        assert_eq!(series[0].label, "Current Location");
        assert_eq!(series[1].label, "New Location");
        let ChartSpec::Bar { series, .. } = car else {
            panic!("expected a bar spec");
        };
        assert_eq!(series[0].label, "Current Car");
        assert_eq!(series[1].label, "New Car");
        assert_eq!(series[0].values, vec![100.0; 12]);
        assert_eq!(series[1].values, vec![90.0; 12]);
    }
}

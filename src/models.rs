use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend array order: trips, electricity, natural gas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatatypeTotals(pub [f64; 3]);

impl DatatypeTotals {
    pub fn trip(&self) -> f64 {
        self.0[0]
    }

    pub fn electricity(&self) -> f64 {
        self.0[1]
    }

    pub fn natural_gas(&self) -> f64 {
        self.0[2]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub trip: Vec<f64>,
    pub kwh: Vec<f64>,
    pub ng: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdaySeries {
    pub kwh: Vec<f64>,
    pub trip: Vec<f64>,
}

/// Comparison payloads send totals as numbers or as preformatted strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub current_yearly_co2: Scalar,
    pub new_yearly_co2: Scalar,
    pub current_daily_rate: Scalar,
    pub new_daily_rate: Scalar,
    pub comparison_statement: String,
    pub current_monthly_co2: Vec<f64>,
    pub new_monthly_co2: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarQuery {
    pub trip_year: i32,
    pub make: String,
    pub model: String,
    pub car_year: String,
    pub cylinders: String,
    pub transmission: String,
    pub user_car_id: String,
}

#[derive(Debug, Deserialize)]
pub struct YearInput {
    pub year: String,
}

#[derive(Debug, Deserialize)]
pub struct LocationInput {
    pub city: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct CarInput {
    pub make: String,
    pub model: String,
    pub car_year: String,
    pub cylinders: String,
    pub transmission: String,
    pub user_car_id: String,
}

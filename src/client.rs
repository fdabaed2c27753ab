use crate::errors::FetchError;
use crate::models::{CarQuery, ComparisonSummary, DatatypeTotals, Scalar, TrendSeries, WeekdaySeries};
use serde::de::DeserializeOwned;
use std::env;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

const DATATYPE_ENDPOINT: &str = "/co2-per-datatype.json";
const TREND_ENDPOINT: &str = "/co2-trend.json";
const WEEKDAY_ENDPOINT: &str = "/co2-day-of-week.json";
const ZIPCODE_ENDPOINT: &str = "/get-zipcode";
const OTHER_LOCATION_ENDPOINT: &str = "/co2-other-location.json";
const OTHER_CAR_ENDPOINT: &str = "/co2-other-car.json";

#[derive(Debug, Clone)]
pub struct StatsClient {
    base_url: String,
    http: reqwest::Client,
}

impl StatsClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("carbon-dash/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_env() -> Result<Self, FetchError> {
        let base = env::var("STATS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn co2_per_datatype(&self, year: i32) -> Result<DatatypeTotals, FetchError> {
        self.get_json(DATATYPE_ENDPOINT, &[("year", year.to_string())])
            .await
    }

    pub async fn co2_trend(&self, year: i32) -> Result<TrendSeries, FetchError> {
        let series: TrendSeries = self
            .get_json(TREND_ENDPOINT, &[("year", year.to_string())])
            .await?;
        expect_len(TREND_ENDPOINT, "trip", &series.trip, 12)?;
        expect_len(TREND_ENDPOINT, "kwh", &series.kwh, 12)?;
        expect_len(TREND_ENDPOINT, "ng", &series.ng, 12)?;
        Ok(series)
    }

    pub async fn co2_day_of_week(&self, year: i32) -> Result<WeekdaySeries, FetchError> {
        let series: WeekdaySeries = self
            .get_json(WEEKDAY_ENDPOINT, &[("year", year.to_string())])
            .await?;
        expect_len(WEEKDAY_ENDPOINT, "kwh", &series.kwh, 7)?;
        expect_len(WEEKDAY_ENDPOINT, "trip", &series.trip, 7)?;
        Ok(series)
    }

    pub async fn zipcode_for(&self, city: &str, state: &str) -> Result<String, FetchError> {
        let response = self
            .http
            .get(format!("{}{ZIPCODE_ENDPOINT}", self.base_url))
            .query(&[("city", city), ("state", state)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: ZIPCODE_ENDPOINT,
                status,
            });
        }
        parse_zipcode(&response.text().await?)
    }

    pub async fn co2_other_location(
        &self,
        year: i32,
        zipcode: &str,
    ) -> Result<ComparisonSummary, FetchError> {
        let summary: ComparisonSummary = self
            .get_json(
                OTHER_LOCATION_ENDPOINT,
                &[("year", year.to_string()), ("zipcode", zipcode.to_string())],
            )
            .await?;
        expect_len(
            OTHER_LOCATION_ENDPOINT,
            "current_monthly_co2",
            &summary.current_monthly_co2,
            12,
        )?;
        expect_len(
            OTHER_LOCATION_ENDPOINT,
            "new_monthly_co2",
            &summary.new_monthly_co2,
            12,
        )?;
        Ok(summary)
    }

    pub async fn co2_other_car(&self, query: &CarQuery) -> Result<ComparisonSummary, FetchError> {
        // Key spelling is the backend's, not ours.
        let params = [
            ("tripYear", query.trip_year.to_string()),
            ("make", query.make.clone()),
            ("model", query.model.clone()),
            ("carYear", query.car_year.clone()),
            ("cylinders", query.cylinders.clone()),
            ("transmission", query.transmission.clone()),
            ("userCarId", query.user_car_id.clone()),
        ];
        let summary: ComparisonSummary = self.get_json(OTHER_CAR_ENDPOINT, &params).await?;
        expect_len(
            OTHER_CAR_ENDPOINT,
            "current_monthly_co2",
            &summary.current_monthly_co2,
            12,
        )?;
        expect_len(
            OTHER_CAR_ENDPOINT,
            "new_monthly_co2",
            &summary.new_monthly_co2,
            12,
        )?;
        Ok(summary)
    }

    async fn get_json<T, P>(&self, endpoint: &'static str, params: &P) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
        P: serde::Serialize + ?Sized,
    {
        let response = self
            .http
            .get(format!("{}{endpoint}", self.base_url))
            .query(params)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { endpoint, status });
        }
        response
            .json::<T>()
            .await
            .map_err(|err| FetchError::malformed(endpoint, err.to_string()))
    }
}

// The zipcode arrives as a JSON scalar or as bare text.
fn parse_zipcode(body: &str) -> Result<String, FetchError> {
    let trimmed = body.trim();
    let zipcode = match serde_json::from_str::<Scalar>(trimmed) {
        Ok(scalar) => scalar.to_string(),
        Err(_) => trimmed.to_string(),
    };
    if zipcode.trim().is_empty() {
        return Err(FetchError::malformed(ZIPCODE_ENDPOINT, "empty zipcode"));
    }
    Ok(zipcode)
}

fn expect_len(
    endpoint: &'static str,
    field: &'static str,
    values: &[f64],
    want: usize,
) -> Result<(), FetchError> {
    if values.len() != want {
        return Err(FetchError::malformed(
            endpoint,
            format!("{field} has {} entries, expected {want}", values.len()),
        ));
    }
    Ok(())
}

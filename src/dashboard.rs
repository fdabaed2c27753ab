use crate::forms::{CarForm, LocationForm};
use crate::panel::{ChartPanel, PanelId};
use chrono::{Datelike, Local};
use serde::Serialize;

pub const YEAR_SPAN: i32 = 5;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    /// Anchor for every year dropdown, fixed at startup.
    pub latest_year: i32,
    pub donut_year: i32,
    pub trend_year: i32,
    pub weekday_year: i32,
    pub donut: ChartPanel,
    pub trend: ChartPanel,
    pub weekday: ChartPanel,
    pub location_chart: ChartPanel,
    pub car_chart: ChartPanel,
    pub location: LocationForm,
    pub car: CarForm,
}

impl Dashboard {
    pub fn new(default_year: i32, user_car_id: String) -> Self {
        Self {
            latest_year: default_year,
            donut_year: default_year,
            trend_year: default_year,
            weekday_year: default_year,
            donut: ChartPanel::new(PanelId::Donut),
            trend: ChartPanel::new(PanelId::Trend),
            weekday: ChartPanel::new(PanelId::Weekday),
            location_chart: ChartPanel::new(PanelId::Location),
            car_chart: ChartPanel::new(PanelId::Car),
            location: LocationForm::new(default_year),
            car: CarForm::new(default_year, user_car_id),
        }
    }

    pub fn year_options(&self) -> Vec<i32> {
        year_options(self.latest_year)
    }
}

pub fn default_year() -> i32 {
    Local::now().year()
}

pub fn year_options(latest: i32) -> Vec<i32> {
    (0..YEAR_SPAN).map(|offset| latest - offset).collect()
}

use crate::models::ComparisonSummary;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormPhase {
    Empty,
    Populated,
    Comparing,
}

/// The comparison needs only zipcode and year, so a year change skips the lookup.
#[derive(Debug, Serialize)]
pub struct LocationForm {
    pub city: String,
    pub state: String,
    pub zipcode: Option<String>,
    pub year: i32,
    pub phase: FormPhase,
    pub summary: Option<ComparisonSummary>,
    pub error: Option<String>,
}

impl LocationForm {
    pub fn new(year: i32) -> Self {
        Self {
            city: String::new(),
            state: String::new(),
            zipcode: None,
            year,
            phase: FormPhase::Empty,
            summary: None,
            error: None,
        }
    }

    pub fn record_inputs(&mut self, city: &str, state: &str) {
        self.city = city.trim().to_string();
        self.state = state.trim().to_string();
    }

    pub fn record_zipcode(&mut self, zipcode: String) {
        self.zipcode = Some(zipcode);
        if self.phase == FormPhase::Empty {
            self.phase = FormPhase::Populated;
        }
        self.error = None;
    }

    pub fn record_comparison(&mut self, summary: ComparisonSummary) {
        self.summary = Some(summary);
        self.phase = FormPhase::Comparing;
        self.error = None;
    }

    pub fn record_failure(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn set_year(&mut self, year: i32) {
        self.year = year;
    }

    pub fn can_compare(&self) -> bool {
        self.zipcode.as_deref().is_some_and(|z| !z.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct CarForm {
    pub make: String,
    pub model: String,
    pub car_year: String,
    pub cylinders: String,
    pub transmission: String,
    pub user_car_id: String,
    pub trip_year: i32,
    pub phase: FormPhase,
    pub summary: Option<ComparisonSummary>,
    pub error: Option<String>,
}

impl CarForm {
    pub fn new(trip_year: i32, user_car_id: String) -> Self {
        Self {
            make: String::new(),
            model: String::new(),
            car_year: String::new(),
            cylinders: String::new(),
            transmission: String::new(),
            user_car_id,
            trip_year,
            phase: FormPhase::Empty,
            summary: None,
            error: None,
        }
    }

    pub fn record_inputs(
        &mut self,
        make: &str,
        model: &str,
        car_year: &str,
        cylinders: &str,
        transmission: &str,
    ) {
        self.make = make.trim().to_string();
        self.model = model.trim().to_string();
        self.car_year = car_year.trim().to_string();
        self.cylinders = cylinders.trim().to_string();
        self.transmission = transmission.trim().to_string();
        if self.phase == FormPhase::Empty && self.can_compare() {
            self.phase = FormPhase::Populated;
        }
    }

    pub fn record_comparison(&mut self, summary: ComparisonSummary) {
        self.summary = Some(summary);
        self.phase = FormPhase::Comparing;
        self.error = None;
    }

    pub fn record_failure(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn set_trip_year(&mut self, year: i32) {
        self.trip_year = year;
    }

    /// Cylinders and transmission are optional.
    pub fn can_compare(&self) -> bool {
        !self.make.is_empty() && !self.model.is_empty() && !self.car_year.is_empty()
    }
}

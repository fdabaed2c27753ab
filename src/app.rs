use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/dashboard.json", get(handlers::dashboard_json))
        .route("/donut-year", post(handlers::set_donut_year))
        .route("/trend-year", post(handlers::set_trend_year))
        .route("/weekday-year", post(handlers::set_weekday_year))
        .route("/new-location", post(handlers::lookup_location))
        .route("/location-year", post(handlers::set_location_year))
        .route("/new-car", post(handlers::compare_car))
        .route("/trip-year", post(handlers::set_trip_year))
        .with_state(state)
}

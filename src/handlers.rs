use crate::charts;
use crate::errors::AppError;
use crate::models::{CarInput, CarQuery, LocationInput, YearInput};
use crate::panel::RefreshOutcome;
use crate::state::AppState;
use crate::ui::render_page;
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form, Json,
};
use tracing::{error, info};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let dash = state.dashboard.lock().await;
    Html(render_page(&dash))
}

pub async fn dashboard_json(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let dash = state.dashboard.lock().await;
    let snapshot = serde_json::to_value(&*dash).map_err(AppError::internal)?;
    Ok(Json(snapshot))
}

pub async fn set_donut_year(
    State(state): State<AppState>,
    Form(input): Form<YearInput>,
) -> Result<Redirect, AppError> {
    let year = parse_year(&input.year)?;
    refresh_donut(&state, year).await;
    Ok(Redirect::to("/"))
}

pub async fn set_trend_year(
    State(state): State<AppState>,
    Form(input): Form<YearInput>,
) -> Result<Redirect, AppError> {
    let year = parse_year(&input.year)?;
    refresh_trend(&state, year).await;
    Ok(Redirect::to("/"))
}

pub async fn set_weekday_year(
    State(state): State<AppState>,
    Form(input): Form<YearInput>,
) -> Result<Redirect, AppError> {
    let year = parse_year(&input.year)?;
    refresh_weekday(&state, year).await;
    Ok(Redirect::to("/"))
}

pub async fn lookup_location(
    State(state): State<AppState>,
    Form(input): Form<LocationInput>,
) -> Result<Redirect, AppError> {
    let city = input.city.trim().to_string();
    let location_state = input.state.trim().to_string();
    {
        let mut dash = state.dashboard.lock().await;
        dash.location.record_inputs(&city, &location_state);
    }
    match state.client.zipcode_for(&city, &location_state).await {
        Ok(zipcode) => {
            info!("resolved {city}, {location_state} to zipcode {zipcode}");
            {
                let mut dash = state.dashboard.lock().await;
                dash.location.record_zipcode(zipcode);
            }
            run_location_comparison(&state).await;
        }
        Err(err) => {
            error!("zipcode lookup for {city}, {location_state} failed: {err}");
            let mut dash = state.dashboard.lock().await;
            dash.location.record_failure(err.to_string());
        }
    }
    Ok(Redirect::to("/"))
}

pub async fn set_location_year(
    State(state): State<AppState>,
    Form(input): Form<YearInput>,
) -> Result<Redirect, AppError> {
    let year = parse_year(&input.year)?;
    let armed = {
        let mut dash = state.dashboard.lock().await;
        dash.location.set_year(year);
        dash.location.can_compare()
    };
    if armed {
        run_location_comparison(&state).await;
    }
    Ok(Redirect::to("/"))
}

pub async fn compare_car(
    State(state): State<AppState>,
    Form(input): Form<CarInput>,
) -> Result<Redirect, AppError> {
    {
        let mut dash = state.dashboard.lock().await;
        dash.car.record_inputs(
            &input.make,
            &input.model,
            &input.car_year,
            &input.cylinders,
            &input.transmission,
        );
        if !input.user_car_id.trim().is_empty() {
            dash.car.user_car_id = input.user_car_id.trim().to_string();
        }
    }
    run_car_comparison(&state).await;
    Ok(Redirect::to("/"))
}

pub async fn set_trip_year(
    State(state): State<AppState>,
    Form(input): Form<YearInput>,
) -> Result<Redirect, AppError> {
    let year = parse_year(&input.year)?;
    let armed = {
        let mut dash = state.dashboard.lock().await;
        dash.car.set_trip_year(year);
        dash.car.can_compare()
    };
    if armed {
        run_car_comparison(&state).await;
    }
    Ok(Redirect::to("/"))
}

pub async fn refresh_year_panels(state: &AppState) {
    let (donut_year, trend_year, weekday_year) = {
        let dash = state.dashboard.lock().await;
        (dash.donut_year, dash.trend_year, dash.weekday_year)
    };
    tokio::join!(
        refresh_donut(state, donut_year),
        refresh_trend(state, trend_year),
        refresh_weekday(state, weekday_year),
    );
}

// The lock is held to take a token and again to apply the outcome; the fetch runs unlocked.

async fn refresh_donut(state: &AppState, year: i32) {
    let token = {
        let mut dash = state.dashboard.lock().await;
        dash.donut_year = year;
        dash.donut.begin_refresh()
    };
    let result = state
        .client
        .co2_per_datatype(year)
        .await
        .map(|totals| charts::yearly_breakdown(&totals));
    let mut dash = state.dashboard.lock().await;
    dash.donut.complete_refresh(token, result);
}

async fn refresh_trend(state: &AppState, year: i32) {
    let token = {
        let mut dash = state.dashboard.lock().await;
        dash.trend_year = year;
        dash.trend.begin_refresh()
    };
    let result = state
        .client
        .co2_trend(year)
        .await
        .map(|series| charts::monthly_trend(&series));
    let mut dash = state.dashboard.lock().await;
    dash.trend.complete_refresh(token, result);
}

async fn refresh_weekday(state: &AppState, year: i32) {
    let token = {
        let mut dash = state.dashboard.lock().await;
        dash.weekday_year = year;
        dash.weekday.begin_refresh()
    };
    let result = state
        .client
        .co2_day_of_week(year)
        .await
        .map(|series| charts::weekday_breakdown(&series));
    let mut dash = state.dashboard.lock().await;
    dash.weekday.complete_refresh(token, result);
}

async fn run_location_comparison(state: &AppState) {
    let snapshot = {
        let mut dash = state.dashboard.lock().await;
        match dash.location.zipcode.clone() {
            Some(zipcode) if !zipcode.is_empty() => Some((
                dash.location_chart.begin_refresh(),
                dash.location.year,
                zipcode,
            )),
            _ => None,
        }
    };
    let Some((token, year, zipcode)) = snapshot else {
        return;
    };
    let result = state.client.co2_other_location(year, &zipcode).await;
    let mut dash = state.dashboard.lock().await;
    match result {
        Ok(summary) => {
            let spec = charts::location_comparison(&summary);
            // Summary text and chart always come from the same payload.
            if dash.location_chart.complete_refresh(token, Ok(spec)) == RefreshOutcome::Applied {
                dash.location.record_comparison(summary);
            }
        }
        Err(err) => {
            let message = err.to_string();
            if dash.location_chart.complete_refresh(token, Err(err)) == RefreshOutcome::Failed {
                dash.location.record_failure(message);
            }
        }
    }
}

async fn run_car_comparison(state: &AppState) {
    let (token, query) = {
        let mut dash = state.dashboard.lock().await;
        let query = CarQuery {
            trip_year: dash.car.trip_year,
            make: dash.car.make.clone(),
            model: dash.car.model.clone(),
            car_year: dash.car.car_year.clone(),
            cylinders: dash.car.cylinders.clone(),
            transmission: dash.car.transmission.clone(),
            user_car_id: dash.car.user_car_id.clone(),
        };
        (dash.car_chart.begin_refresh(), query)
    };
    let result = state.client.co2_other_car(&query).await;
    let mut dash = state.dashboard.lock().await;
    match result {
        Ok(summary) => {
            let spec = charts::car_comparison(&summary);
            if dash.car_chart.complete_refresh(token, Ok(spec)) == RefreshOutcome::Applied {
                dash.car.record_comparison(summary);
            }
        }
        Err(err) => {
            let message = err.to_string();
            if dash.car_chart.complete_refresh(token, Err(err)) == RefreshOutcome::Failed {
                dash.car.record_failure(message);
            }
        }
    }
}

fn parse_year(raw: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::bad_request(format!("year must be a whole number, got '{raw}'")))
}

use carbon_dash::{dashboard, handlers, router, AppState, Dashboard, StatsClient};
use std::{env, net::SocketAddr};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let client = StatsClient::from_env()?;
    info!("using stats backend at {}", client.base_url());

    let user_car_id = env::var("USER_CAR_ID").unwrap_or_default();
    let state = AppState::new(client, Dashboard::new(dashboard::default_year(), user_car_id));

    handlers::refresh_year_panels(&state).await;

    let app = router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

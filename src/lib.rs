pub mod app;
pub mod charts;
pub mod client;
pub mod dashboard;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod panel;
pub mod state;
pub mod svg;
pub mod ui;

pub use app::router;
pub use client::StatsClient;
pub use dashboard::Dashboard;
pub use state::AppState;

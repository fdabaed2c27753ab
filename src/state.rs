use crate::client::StatsClient;
use crate::dashboard::Dashboard;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub client: StatsClient,
    pub dashboard: Arc<Mutex<Dashboard>>,
}

impl AppState {
    pub fn new(client: StatsClient, dashboard: Dashboard) -> Self {
        Self {
            client,
            dashboard: Arc::new(Mutex::new(dashboard)),
        }
    }
}

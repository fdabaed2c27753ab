use crate::charts::ChartSpec;
use crate::errors::FetchError;
use serde::Serialize;
use tracing::{error, warn};

/// The canvas ids are part of the page contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PanelId {
    Donut,
    Trend,
    Weekday,
    Location,
    Car,
}

impl PanelId {
    pub fn canvas_id(self) -> &'static str {
        match self {
            PanelId::Donut => "donutChart",
            PanelId::Trend => "lineGraph",
            PanelId::Weekday => "weekdayBarChart",
            PanelId::Location => "locationBarChart",
            PanelId::Car => "carBarChart",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartHandle {
    pub canvas_id: &'static str,
    pub generation: u64,
    pub spec: ChartSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    Stale,
    Failed,
}

/// A completion whose token is no longer the newest is dropped.
#[derive(Debug, Serialize)]
pub struct ChartPanel {
    id: PanelId,
    issued: u64,
    handle: Option<ChartHandle>,
    last_error: Option<String>,
}

impl ChartPanel {
    pub fn new(id: PanelId) -> Self {
        Self {
            id,
            issued: 0,
            handle: None,
            last_error: None,
        }
    }

    pub fn begin_refresh(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub fn complete_refresh(
        &mut self,
        token: u64,
        result: Result<ChartSpec, FetchError>,
    ) -> RefreshOutcome {
        if token < self.issued {
            warn!(
                "dropping stale refresh of {} (token {token}, newest {})",
                self.id.canvas_id(),
                self.issued
            );
            return RefreshOutcome::Stale;
        }
        match result {
            Ok(spec) => {
                self.replace(token, spec);
                self.last_error = None;
                RefreshOutcome::Applied
            }
            Err(err) => {
                error!("refresh of {} failed: {err}", self.id.canvas_id());
                self.last_error = Some(err.to_string());
                RefreshOutcome::Failed
            }
        }
    }

    pub fn handle(&self) -> Option<&ChartHandle> {
        self.handle.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn replace(&mut self, generation: u64, spec: ChartSpec) {
        // Old handle is dropped before the new one exists, never two at once.
        self.handle.take();
        self.handle = Some(ChartHandle {
            canvas_id: self.id.canvas_id(),
            generation,
            spec,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartSpec;
    use crate::errors::FetchError;

    fn spec(value: f64) -> ChartSpec {
        ChartSpec::Doughnut {
            labels: vec!["Trip".to_string()],
            values: vec![value],
            colors: vec!["#FF6384".to_string()],
        }
    }

    fn failure() -> FetchError {
        FetchError::malformed("/co2-trend.json", "trip has 2 entries, expected 12")
    }

    #[test]
    fn refresh_installs_a_single_handle() {
        let mut panel = ChartPanel::new(PanelId::Donut);
        let token = panel.begin_refresh();
        let outcome = panel.complete_refresh(token, Ok(spec(1.0)));
        assert_eq!(outcome, RefreshOutcome::Applied);
        let handle = panel.handle().expect("handle after refresh");
        assert_eq!(handle.canvas_id, "donutChart");
        assert_eq!(handle.generation, 1);
    }

    #[test]
    fn second_refresh_replaces_the_first() {
        let mut panel = ChartPanel::new(PanelId::Trend);
        let first = panel.begin_refresh();
        panel.complete_refresh(first, Ok(spec(1.0)));
        let second = panel.begin_refresh();
        panel.complete_refresh(second, Ok(spec(2.0)));
        let handle = panel.handle().expect("handle after refresh");
        assert_eq!(handle.generation, 2);
        assert_eq!(handle.spec, spec(2.0));
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut panel = ChartPanel::new(PanelId::Weekday);
        let old = panel.begin_refresh();
        let new = panel.begin_refresh();
        assert_eq!(panel.complete_refresh(new, Ok(spec(2.0))), RefreshOutcome::Applied);
        assert_eq!(panel.complete_refresh(old, Ok(spec(1.0))), RefreshOutcome::Stale);
        let handle = panel.handle().expect("handle after refresh");
        assert_eq!(handle.spec, spec(2.0));
        assert_eq!(handle.generation, 2);
    }

    #[test]
    fn failure_keeps_last_good_chart_and_records_error() {
        let mut panel = ChartPanel::new(PanelId::Location);
        let first = panel.begin_refresh();
        panel.complete_refresh(first, Ok(spec(1.0)));
        let second = panel.begin_refresh();
        assert_eq!(
            panel.complete_refresh(second, Err(failure())),
            RefreshOutcome::Failed
        );
        assert_eq!(panel.handle().expect("last good handle").spec, spec(1.0));
        let message = panel.last_error().expect("recorded error");
        assert!(message.contains("/co2-trend.json"));
    }

    #[test]
    fn next_success_clears_the_error() {
        let mut panel = ChartPanel::new(PanelId::Car);
        let first = panel.begin_refresh();
        panel.complete_refresh(first, Err(failure()));
        assert!(panel.last_error().is_some());
        assert!(panel.handle().is_none());
        let second = panel.begin_refresh();
        panel.complete_refresh(second, Ok(spec(3.0)));
        assert!(panel.last_error().is_none());
        assert!(panel.handle().is_some());
    }

    #[test]
    fn failure_before_any_success_leaves_no_handle() {
        let mut panel = ChartPanel::new(PanelId::Donut);
        let token = panel.begin_refresh();
        panel.complete_refresh(token, Err(failure()));
        assert!(panel.handle().is_none());
        assert!(panel.last_error().is_some());
    }
}

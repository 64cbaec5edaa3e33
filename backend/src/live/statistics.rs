use crate::live::state::SharedStatistics;
use crate::store::{self, SharedStore, StoreError};
use chrono::{DateTime, Utc};
use common::model::Statistics;
use log::warn;
use serde::Serialize;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default period between two scheduled refreshes.
pub const REFRESH_PERIOD: Duration = Duration::from_secs(30);

/// What readers of the statistics endpoint get.
///
/// A failed refresh keeps the previous figures and records the error, so
/// the dashboard can show both.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatisticsSnapshot {
    pub statistics: Option<Statistics>,
    pub error: Option<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Fetches the aggregate figures and stores them in `shared`.
pub async fn refresh(
    store: &SharedStore,
    shared: &SharedStatistics,
) -> Result<Statistics, StoreError> {
    let result = store::run(store, |s| s.statistics()).await;
    let mut snapshot = shared.write().await;
    match &result {
        Ok(stats) => {
            snapshot.statistics = Some(stats.clone());
            snapshot.error = None;
            snapshot.refreshed_at = Some(Utc::now());
        }
        Err(e) => snapshot.error = Some(e.to_string()),
    }
    result
}

/// Owns the periodic refresh task; dropping it stops the timer.
pub struct MonitorHandle {
    task: JoinHandle<()>,
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Refreshes now and then every `period`.
pub fn start(store: SharedStore, shared: SharedStatistics, period: Duration) -> MonitorHandle {
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            if let Err(e) = refresh(&store, &shared).await {
                warn!("Statistics refresh failed: {}", e);
            }
        }
    });
    MonitorHandle { task }
}

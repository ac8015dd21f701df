//! Stats recorder
//!
//! Best-effort read-modify-write of [`SaveStats`]. A failing store is logged
//! and otherwise ignored so observability never blocks or fails a save.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use wikisave_domain::{Result, SaveStats};

use super::ports::StatsStore;

pub struct StatsRecorder {
    store: Arc<dyn StatsStore>,
}

impl StatsRecorder {
    pub fn new(store: Arc<dyn StatsStore>) -> Self {
        Self { store }
    }

    /// Count a successful save. `debug` raises store failures to `warn`.
    pub async fn record_success(&self, debug: bool) {
        self.update(debug, |stats| stats.record_success(Utc::now())).await;
    }

    /// Count a terminally failed save with its user-facing message.
    pub async fn record_failure(&self, message: &str, debug: bool) {
        self.update(debug, |stats| stats.record_failure(message, Utc::now())).await;
    }

    /// Current persisted record.
    pub async fn snapshot(&self) -> Result<SaveStats> {
        self.store.load().await
    }

    async fn update(&self, debug: bool, apply: impl FnOnce(&mut SaveStats) + Send) {
        let mut stats = match self.store.load().await {
            Ok(stats) => stats,
            Err(err) => {
                // Counting from zero would overwrite real history
                report_failure(debug, "load", &err);
                return;
            }
        };

        apply(&mut stats);

        if let Err(err) = self.store.store(&stats).await {
            report_failure(debug, "store", &err);
        }
    }
}

fn report_failure(debug: bool, operation: &str, err: &wikisave_domain::WikiSaveError) {
    if debug {
        warn!(operation, error = %err, "failed to record save stats");
    } else {
        debug!(operation, error = %err, "failed to record save stats");
    }
}

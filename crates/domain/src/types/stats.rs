//! Persisted save statistics

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Outcome of the most recent terminal save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LastSaveStatus {
    Success,
    Failure,
}

impl_domain_status_conversions!(LastSaveStatus {
    Success => "success",
    Failure => "failure",
});

/// Counters and last-outcome record kept in the stats store.
///
/// Counters only ever grow. `last_save_*` always describes the most recent
/// save that terminated (retries in flight are not recorded).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveStats {
    pub successful_saves: u64,
    pub failed_saves: u64,
    pub last_save_status: Option<LastSaveStatus>,
    /// ISO-8601 time of the last terminal save
    pub last_save_time: Option<String>,
    /// Empty after a success
    pub last_save_error: String,
}

impl SaveStats {
    pub fn record_success(&mut self, at: DateTime<Utc>) {
        self.successful_saves = self.successful_saves.saturating_add(1);
        self.mark_last(LastSaveStatus::Success, String::new(), at);
    }

    pub fn record_failure(&mut self, message: impl Into<String>, at: DateTime<Utc>) {
        self.failed_saves = self.failed_saves.saturating_add(1);
        self.mark_last(LastSaveStatus::Failure, message.into(), at);
    }

    pub fn total_saves(&self) -> u64 {
        self.successful_saves.saturating_add(self.failed_saves)
    }

    fn mark_last(&mut self, status: LastSaveStatus, error: String, at: DateTime<Utc>) {
        self.last_save_status = Some(status);
        self.last_save_time = Some(at.to_rfc3339_opts(SecondsFormat::Millis, true));
        self.last_save_error = error;
    }
}

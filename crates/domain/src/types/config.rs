//! Typed saver configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_AUTO_RETRIES;

/// Settings for one save invocation.
///
/// Built fresh by the config resolver each time a save starts; never mutated
/// afterwards. Only exists when saving is eligible, so `endpoint` is always
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveConfig {
    /// Remote write endpoint
    pub endpoint: String,
    /// Per-attempt deadline, never below five seconds
    pub timeout: Duration,
    pub notifications_enabled: bool,
    pub auto_retry_enabled: bool,
    pub remember_password: bool,
    pub debug: bool,
}

impl SaveConfig {
    /// Number of retries allowed after the first attempt.
    pub fn max_retries(&self) -> u32 {
        if self.auto_retry_enabled {
            MAX_AUTO_RETRIES
        } else {
            0
        }
    }
}

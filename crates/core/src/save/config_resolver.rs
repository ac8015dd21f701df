//! Config resolver
//!
//! Reads the saver options from the host [`ConfigStore`] and coerces them
//! into a [`SaveConfig`]. Resolution fails closed: a disabled saver or a
//! blank endpoint yields `None`, which callers treat as "not eligible"
//! rather than as an error.

use std::sync::Arc;
use std::time::Duration;

use wikisave_domain::constants::{
    AFFIRMATIVE, CONFIG_AUTO_RETRY, CONFIG_DEBUG, CONFIG_ENABLED, CONFIG_ENDPOINT,
    CONFIG_NOTIFICATIONS, CONFIG_REMEMBER_PASSWORD, CONFIG_TIMEOUT, DEFAULT_AUTO_RETRY,
    DEFAULT_DEBUG, DEFAULT_ENABLED, DEFAULT_ENDPOINT, DEFAULT_NOTIFICATIONS,
    DEFAULT_REMEMBER_PASSWORD, DEFAULT_TIMEOUT_SECS, FALLBACK_TIMEOUT_SECS, MIN_TIMEOUT_SECS,
};
use wikisave_domain::SaveConfig;

use super::ports::ConfigStore;

/// Builds [`SaveConfig`] records from a [`ConfigStore`].
#[derive(Clone)]
pub struct ConfigResolver {
    store: Arc<dyn ConfigStore>,
}

impl ConfigResolver {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Resolve the full configuration, or `None` when saving is not
    /// eligible.
    pub fn resolve(&self) -> Option<SaveConfig> {
        if !self.is_enabled() {
            return None;
        }
        let endpoint = self.endpoint()?;

        Some(SaveConfig {
            endpoint,
            timeout: self.timeout(),
            notifications_enabled: self.flag(CONFIG_NOTIFICATIONS, DEFAULT_NOTIFICATIONS),
            auto_retry_enabled: self.flag(CONFIG_AUTO_RETRY, DEFAULT_AUTO_RETRY),
            remember_password: self.flag(CONFIG_REMEMBER_PASSWORD, DEFAULT_REMEMBER_PASSWORD),
            debug: self.flag(CONFIG_DEBUG, DEFAULT_DEBUG),
        })
    }

    /// Eligibility check alone: enabled and an endpoint is configured.
    pub fn can_save(&self) -> bool {
        self.is_enabled() && self.endpoint().is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.flag(CONFIG_ENABLED, DEFAULT_ENABLED)
    }

    /// The configured endpoint, trimmed; `None` when blank.
    pub fn endpoint(&self) -> Option<String> {
        let raw = self.store.get(CONFIG_ENDPOINT, DEFAULT_ENDPOINT);
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn timeout(&self) -> Duration {
        parse_timeout(&self.store.get(CONFIG_TIMEOUT, DEFAULT_TIMEOUT_SECS))
    }

    fn flag(&self, name: &str, default: &str) -> bool {
        parse_flag(&self.store.get(name, default))
    }
}

/// Only the exact affirmative token turns a flag on.
pub fn parse_flag(value: &str) -> bool {
    value == AFFIRMATIVE
}

/// Convert a seconds option into the per-attempt deadline.
///
/// The leading integer is used (`"12s"` is 12). No integer, or zero, falls
/// back to 30 seconds; anything below 5 seconds is raised to 5.
pub fn parse_timeout(value: &str) -> Duration {
    let secs = match parse_leading_int(value) {
        Some(0) | None => FALLBACK_TIMEOUT_SECS,
        // Negative values clamp to the floor below
        Some(secs) => u64::try_from(secs).unwrap_or(0),
    };
    let secs = secs.max(MIN_TIMEOUT_SECS);
    Duration::from_millis(secs.saturating_mul(1000))
}

fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut seen_digit = false;
    let mut acc: i64 = 0;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        acc = acc.saturating_mul(10).saturating_add(i64::from(byte - b'0'));
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -acc } else { acc })
}

//! Classified save failures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Failure taxonomy for a handled save.
///
/// "Not eligible" is not part of it: an ineligible save is never handled, so
/// it has no error to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Credential prompt declined
    UserCancelled,
    /// 401; the cached credential is discarded
    AuthenticationFailure,
    /// 429
    RateLimited,
    /// 413
    PayloadTooLarge,
    /// 409; retried while retries remain
    Conflict,
    /// Timeout, network failure, any other non-2xx
    Transient,
}

impl_domain_status_conversions!(ErrorKind {
    UserCancelled => "user_cancelled",
    AuthenticationFailure => "authentication_failure",
    RateLimited => "rate_limited",
    PayloadTooLarge => "payload_too_large",
    Conflict => "conflict",
    Transient => "transient",
});

/// A failed attempt, interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    /// `None` when no response arrived (timeout or network failure)
    pub http_status: Option<u16>,
    /// Message composed from status, status text and body
    pub raw_message: String,
    /// Message shown to the user; equals `raw_message` unless a status
    /// override applies
    pub user_message: String,
    pub retry_eligible: bool,
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message)
    }
}

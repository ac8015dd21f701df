//! Error types used throughout the saver

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ClassifiedError, ErrorKind};

/// Message reported when the credential prompt is declined.
pub const CANCELLED_MESSAGE: &str = "Save cancelled by user";

/// Main error type for wikisave infrastructure and application plumbing
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum WikiSaveError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for wikisave operations
pub type Result<T> = std::result::Result<T, WikiSaveError>;

/// Terminal outcome of a save that did not succeed.
///
/// Exactly one of these (or success) is delivered per handled save.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// The credential prompt was declined; no request was sent.
    #[error("Save cancelled by user")]
    Cancelled,

    /// The endpoint rejected the save, or it could not be reached, and no
    /// further retries are scheduled.
    #[error("{0}")]
    Rejected(ClassifiedError),
}

impl SaveError {
    /// Human-readable message handed to the completion callback.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Cancelled => ErrorKind::UserCancelled,
            Self::Rejected(err) => err.kind,
        }
    }

    /// The classified error, when the failure came from an HTTP attempt.
    pub fn classified(&self) -> Option<&ClassifiedError> {
        match self {
            Self::Cancelled => None,
            Self::Rejected(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_uses_fixed_message() {
        assert_eq!(SaveError::Cancelled.user_message(), "Save cancelled by user");
        assert!(SaveError::Cancelled.classified().is_none());
        assert_eq!(SaveError::Cancelled.kind(), ErrorKind::UserCancelled);
    }

    #[test]
    fn rejected_surfaces_user_message() {
        let classified = ClassifiedError {
            kind: ErrorKind::RateLimited,
            http_status: Some(429),
            raw_message: "Save failed: HTTP 429 Too Many Requests".into(),
            user_message: "Rate limit exceeded. Wait before retrying.".into(),
            retry_eligible: false,
        };
        let err = SaveError::Rejected(classified.clone());

        assert_eq!(err.user_message(), classified.user_message);
        assert_eq!(err.classified(), Some(&classified));
        assert_eq!(err.kind(), ErrorKind::RateLimited);
    }

    #[test]
    fn infra_error_serializes_tagged() {
        let err = WikiSaveError::Storage("disk full".into());
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["type"], "Storage");
        assert_eq!(json["message"], "disk full");
    }
}

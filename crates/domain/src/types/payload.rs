//! Wire types exchanged with the save endpoint

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::Credential;

/// JSON body of a single save attempt.
///
/// Borrows the document and the secret so neither is copied per retry.
/// `Debug` masks the password and prints only the document length.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload<'a> {
    pub content: &'a str,
    pub password: &'a str,
    /// ISO-8601 with millisecond precision and a `Z` suffix
    pub timestamp: String,
    pub retry_count: u32,
}

impl<'a> SavePayload<'a> {
    /// Build a payload stamped with the current time.
    pub fn new(content: &'a str, credential: &'a Credential, retry_count: u32) -> Self {
        Self::at(content, credential, retry_count, Utc::now())
    }

    /// Build a payload stamped with an explicit time.
    pub fn at(
        content: &'a str,
        credential: &'a Credential,
        retry_count: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            content,
            password: credential.expose(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            retry_count,
        }
    }
}

impl fmt::Debug for SavePayload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SavePayload")
            .field("content_len", &self.content.len())
            .field("password", &"***")
            .field("timestamp", &self.timestamp)
            .field("retry_count", &self.retry_count)
            .finish()
    }
}

/// What a single HTTP attempt produced.
///
/// Non-2xx responses are not transport errors; they come back as
/// `Response` and are classified by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
    Response { status: u16, status_text: String, body: String },
    /// The per-attempt deadline fired before a response arrived.
    TimedOut,
    /// The request never produced a response (DNS, refused, reset, ...).
    Failed(String),
}

impl TransportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Response { status, .. } if (200..300).contains(status))
    }
}

/// Optional body of a successful save response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SaveReceipt {
    /// Commit identifier reported by the endpoint
    #[serde(default)]
    pub commit: Option<String>,
}

impl SaveReceipt {
    /// Parse a success body; anything that is not the expected JSON object
    /// yields an empty receipt.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }
}

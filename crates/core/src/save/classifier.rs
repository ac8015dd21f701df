//! Error classification for failed save attempts
//!
//! Turns a raw HTTP status, status text and body into a [`ClassifiedError`]
//! carrying the user-facing message and the retry verdict.
//!
//! Message composition, in order:
//! 1. `Save failed`, then `: HTTP <status> <text>` (or `: <text>` when no
//!    response arrived)
//! 2. ` - <error>` and ` (retry in N seconds)` from a JSON error body
//! 3. otherwise the raw body verbatim when it is short
//! 4. fixed messages for 401, 409, 413 and 429 replace the composed one

use serde_json::Value;
use wikisave_domain::constants::MAX_INLINE_BODY_CHARS;
use wikisave_domain::{ClassifiedError, ErrorKind, TransportOutcome};

pub const REQUEST_TIMEOUT_TEXT: &str = "Request timeout";
pub const NETWORK_ERROR_TEXT: &str = "Network error";

pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed. Check your password.";
pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Wait before retrying.";
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Content too large. Document exceeds maximum size.";
pub const CONFLICT_MESSAGE: &str = "Conflict detected. Another save may be in progress.";

/// Classify a failed attempt. `http_status` 0 means no response arrived.
pub fn classify(http_status: u16, status_text: &str, raw_body: &str) -> ClassifiedError {
    let raw_message = compose_message(http_status, status_text, raw_body);

    let (kind, override_message, retry_eligible) = match http_status {
        401 => (ErrorKind::AuthenticationFailure, Some(AUTH_FAILED_MESSAGE), false),
        429 => (ErrorKind::RateLimited, Some(RATE_LIMITED_MESSAGE), false),
        413 => (ErrorKind::PayloadTooLarge, Some(PAYLOAD_TOO_LARGE_MESSAGE), false),
        409 => (ErrorKind::Conflict, Some(CONFLICT_MESSAGE), true),
        _ => (ErrorKind::Transient, None, true),
    };

    let user_message = override_message.map_or_else(|| raw_message.clone(), str::to_string);

    ClassifiedError {
        kind,
        http_status: (http_status != 0).then_some(http_status),
        raw_message,
        user_message,
        retry_eligible,
    }
}

/// Classify a transport outcome; `None` for a 2xx response.
pub fn classify_outcome(outcome: &TransportOutcome) -> Option<ClassifiedError> {
    match outcome {
        TransportOutcome::Response { status, .. } if (200..300).contains(status) => None,
        TransportOutcome::Response { status, status_text, body } => {
            Some(classify(*status, status_text, body))
        }
        TransportOutcome::TimedOut => Some(classify(0, REQUEST_TIMEOUT_TEXT, "")),
        TransportOutcome::Failed(message) => Some(classify(0, NETWORK_ERROR_TEXT, message)),
    }
}

fn compose_message(http_status: u16, status_text: &str, raw_body: &str) -> String {
    let mut message = String::from("Save failed");

    if http_status != 0 {
        message.push_str(&format!(": HTTP {http_status}"));
        if !status_text.is_empty() {
            message.push(' ');
            message.push_str(status_text);
        }
    } else if !status_text.is_empty() {
        message.push_str(": ");
        message.push_str(status_text);
    }

    if raw_body.is_empty() {
        return message;
    }

    // A bare `null` has no fields to read and is shown like unparsed text
    match serde_json::from_str::<Value>(raw_body).ok().filter(|body| !body.is_null()) {
        Some(body) => {
            if let Some(error) = body.get("error").and_then(error_text) {
                message.push_str(" - ");
                message.push_str(&error);
            }
            if let Some(reset_in) = body.get("resetIn").and_then(reset_seconds) {
                message.push_str(&format!(" (retry in {reset_in} seconds)"));
            }
        }
        None if raw_body.chars().count() < MAX_INLINE_BODY_CHARS => {
            message.push_str(" - ");
            message.push_str(raw_body);
        }
        None => {}
    }

    message
}

/// Text for a truthy `error` field; empty strings, zero, `false` and `null`
/// count as absent.
fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        Value::Bool(true) => Some("true".into()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        _ => None,
    }
}

fn reset_seconds(value: &Value) -> Option<String> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(whole) = number.as_i64() {
        return (whole != 0).then(|| whole.to_string());
    }
    let fractional = number.as_f64()?;
    (fractional != 0.0).then(|| fractional.to_string())
}

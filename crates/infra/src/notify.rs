//! Notification and alert sinks that report through `tracing`.

use tracing::{error, info, warn};
use wikisave_core::{AlertSink, Notifier};
use wikisave_domain::constants::{NOTIFICATION_FAILURE, NOTIFICATION_SAVING, NOTIFICATION_SUCCESS};
use wikisave_domain::AlertSeverity;

/// Human label for a known notification id.
pub fn notification_label(notification_id: &str) -> &str {
    match notification_id {
        NOTIFICATION_SAVING => "Saving to Cloudflare...",
        NOTIFICATION_SUCCESS => "Saved to Cloudflare",
        NOTIFICATION_FAILURE => "Cloudflare save failed",
        other => other,
    }
}

/// [`Notifier`] that emits each notification as an `info` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn display(&self, notification_id: &str) {
        info!(notification = notification_id, "{}", notification_label(notification_id));
    }
}

/// [`AlertSink`] that logs alerts at a level matching their severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn display(&self, message: &str, severity: AlertSeverity) {
        let title = severity.title();
        match severity {
            AlertSeverity::Success => info!(title, "{message}"),
            AlertSeverity::Info => warn!(title, "{message}"),
            AlertSeverity::Error => error!(title, "{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_have_labels() {
        assert_eq!(notification_label(NOTIFICATION_SUCCESS), "Saved to Cloudflare");
        assert_eq!(notification_label("custom/id"), "custom/id");
    }
}

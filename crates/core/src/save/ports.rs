//! Port interfaces for the remote saver
//!
//! Every collaborator the save flow talks to is behind one of these traits.
//! Infrastructure adapters live in `wikisave-infra`; tests use in-memory
//! recording mocks.

use std::time::Duration;

use async_trait::async_trait;
use wikisave_domain::{AlertSeverity, Result, SavePayload, SaveStats, TransportOutcome};

/// Keyed configuration lookup with string defaults.
pub trait ConfigStore: Send + Sync {
    /// Return the value stored under `name`, or `default` when absent.
    fn get(&self, name: &str, default: &str) -> String;
}

/// Source of the shared secret, typically a password dialog.
#[async_trait]
pub trait CredentialPrompt: Send + Sync {
    /// Ask the user for the secret.
    ///
    /// `None` or an empty string means the user cancelled.
    async fn prompt(&self, message: &str) -> Option<String>;
}

/// Host notification area. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn display(&self, notification_id: &str);
}

/// Modal alerts, used only by the connection probe.
pub trait AlertSink: Send + Sync {
    fn display(&self, message: &str, severity: AlertSeverity);
}

/// Durable home of [`SaveStats`].
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Load the current record; a store that has never been written returns
    /// the default record.
    async fn load(&self) -> Result<SaveStats>;

    /// Replace the stored record.
    async fn store(&self, stats: &SaveStats) -> Result<()>;
}

/// One HTTP POST with its own deadline.
#[async_trait]
pub trait SaveTransport: Send + Sync {
    /// Send `payload` to `endpoint` as JSON.
    ///
    /// Implementations must abort the request once `timeout` elapses and
    /// report [`TransportOutcome::TimedOut`]. Non-2xx responses are returned
    /// as [`TransportOutcome::Response`], never as failures.
    async fn post(
        &self,
        endpoint: &str,
        payload: &SavePayload<'_>,
        timeout: Duration,
    ) -> TransportOutcome;
}

/// Suspends the save between retries.
#[async_trait]
pub trait BackoffTimer: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

/// [`BackoffTimer`] backed by `tokio::time::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioBackoffTimer;

#[async_trait]
impl BackoffTimer for TokioBackoffTimer {
    async fn sleep(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

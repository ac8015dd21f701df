//! In-memory recording mocks for the save ports.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use wikisave_core::{
    AlertSink, BackoffTimer, ConfigStore, CredentialPrompt, Notifier, SaveTransport, StatsStore,
};
use wikisave_domain::constants::{CONFIG_ENABLED, CONFIG_ENDPOINT};
use wikisave_domain::{
    AlertSeverity, Result as DomainResult, SavePayload, SaveStats, TransportOutcome, WikiSaveError,
};

/// Config store backed by a plain map; missing keys yield the default.
#[derive(Default)]
pub struct MockConfigStore {
    values: Mutex<HashMap<String, String>>,
}

impl MockConfigStore {
    pub fn enabled(endpoint: &str) -> Self {
        Self::default().with(CONFIG_ENABLED, "yes").with(CONFIG_ENDPOINT, endpoint)
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }
}

impl ConfigStore for MockConfigStore {
    fn get(&self, name: &str, default: &str) -> String {
        self.values.lock().get(name).cloned().unwrap_or_else(|| default.to_string())
    }
}

/// Answers prompts from a script; once exhausted it answers `secret`.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<Option<String>>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answer(&self, answer: Option<&str>) {
        self.answers.lock().push_back(answer.map(str::to_string));
    }

    pub fn times_asked(&self) -> usize {
        self.asked.lock().len()
    }

    pub fn messages(&self) -> Vec<String> {
        self.asked.lock().clone()
    }
}

#[async_trait]
impl CredentialPrompt for ScriptedPrompt {
    async fn prompt(&self, message: &str) -> Option<String> {
        self.asked.lock().push(message.to_string());
        self.answers.lock().pop_front().unwrap_or_else(|| Some("secret".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn shown(&self) -> Vec<String> {
        self.shown.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn display(&self, notification_id: &str) {
        self.shown.lock().push(notification_id.to_string());
    }
}

#[derive(Default)]
pub struct RecordingAlerts {
    shown: Mutex<Vec<(String, AlertSeverity)>>,
}

impl RecordingAlerts {
    pub fn shown(&self) -> Vec<(String, AlertSeverity)> {
        self.shown.lock().clone()
    }
}

impl AlertSink for RecordingAlerts {
    fn display(&self, message: &str, severity: AlertSeverity) {
        self.shown.lock().push((message.to_string(), severity));
    }
}

/// Stats store that can be told to fail.
#[derive(Default)]
pub struct MockStatsStore {
    stats: Mutex<SaveStats>,
    fail_store: Mutex<bool>,
}

impl MockStatsStore {
    pub fn current(&self) -> SaveStats {
        self.stats.lock().clone()
    }

    pub fn fail_writes(&self) {
        *self.fail_store.lock() = true;
    }
}

#[async_trait]
impl StatsStore for MockStatsStore {
    async fn load(&self) -> DomainResult<SaveStats> {
        Ok(self.stats.lock().clone())
    }

    async fn store(&self, stats: &SaveStats) -> DomainResult<()> {
        if *self.fail_store.lock() {
            return Err(WikiSaveError::Storage("stats store is read-only".into()));
        }
        *self.stats.lock() = stats.clone();
        Ok(())
    }
}

/// One recorded POST.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub endpoint: String,
    pub content: String,
    pub password: String,
    pub timestamp: String,
    pub retry_count: u32,
    pub timeout: Duration,
}

/// Replays queued outcomes; once exhausted every attempt gets `200 OK`.
#[derive(Default)]
pub struct ScriptedTransport {
    outcomes: Mutex<VecDeque<TransportOutcome>>,
    attempts: Mutex<Vec<Attempt>>,
}

impl ScriptedTransport {
    pub fn respond(&self, status: u16, status_text: &str, body: &str) {
        self.push(TransportOutcome::Response {
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        });
    }

    pub fn push(&self, outcome: TransportOutcome) {
        self.outcomes.lock().push_back(outcome);
    }

    /// Queue the same outcome `times` times.
    pub fn repeat(&self, outcome: TransportOutcome, times: usize) {
        for _ in 0..times {
            self.push(outcome.clone());
        }
    }

    pub fn attempts(&self) -> Vec<Attempt> {
        self.attempts.lock().clone()
    }
}

#[async_trait]
impl SaveTransport for ScriptedTransport {
    async fn post(
        &self,
        endpoint: &str,
        payload: &SavePayload<'_>,
        timeout: Duration,
    ) -> TransportOutcome {
        self.attempts.lock().push(Attempt {
            endpoint: endpoint.to_string(),
            content: payload.content.to_string(),
            password: payload.password.to_string(),
            timestamp: payload.timestamp.clone(),
            retry_count: payload.retry_count,
            timeout,
        });

        self.outcomes.lock().pop_front().unwrap_or_else(|| TransportOutcome::Response {
            status: 200,
            status_text: "OK".to_string(),
            body: r#"{"success":true,"commit":"abc123"}"#.to_string(),
        })
    }
}

/// Records requested delays and returns immediately.
#[derive(Default)]
pub struct RecordingTimer {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingTimer {
    pub fn delays_ms(&self) -> Vec<u128> {
        self.delays.lock().iter().map(Duration::as_millis).collect()
    }
}

#[async_trait]
impl BackoffTimer for RecordingTimer {
    async fn sleep(&self, delay: Duration) {
        self.delays.lock().push(delay);
    }
}

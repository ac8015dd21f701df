//! Shared test helpers for `wikisave-core` integration tests.
//!
//! Recording mocks for every save port so the orchestrator tests can assert
//! on attempts, prompts, notifications and backoff delays without I/O.

#![allow(dead_code)]

pub mod mocks;

use std::sync::Arc;

use wikisave_core::{ProbeCollaborators, SaveCollaborators};

pub use mocks::*;

/// A full set of mocks plus the collaborator bundles built from them.
pub struct Harness {
    pub config: Arc<MockConfigStore>,
    pub prompt: Arc<ScriptedPrompt>,
    pub notifier: Arc<RecordingNotifier>,
    pub alerts: Arc<RecordingAlerts>,
    pub stats: Arc<MockStatsStore>,
    pub transport: Arc<ScriptedTransport>,
    pub timer: Arc<RecordingTimer>,
}

impl Harness {
    /// Enabled saver pointed at a dummy endpoint with default options.
    pub fn enabled() -> Self {
        Self::with_config(MockConfigStore::enabled("https://saver.test/save"))
    }

    pub fn with_config(config: MockConfigStore) -> Self {
        Self {
            config: Arc::new(config),
            prompt: Arc::new(ScriptedPrompt::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            alerts: Arc::new(RecordingAlerts::default()),
            stats: Arc::new(MockStatsStore::default()),
            transport: Arc::new(ScriptedTransport::default()),
            timer: Arc::new(RecordingTimer::default()),
        }
    }

    pub fn save_collaborators(&self) -> SaveCollaborators {
        SaveCollaborators {
            config_store: self.config.clone(),
            prompt: self.prompt.clone(),
            notifier: self.notifier.clone(),
            stats_store: self.stats.clone(),
            transport: self.transport.clone(),
            timer: self.timer.clone(),
        }
    }

    pub fn probe_collaborators(&self) -> ProbeCollaborators {
        ProbeCollaborators {
            config_store: self.config.clone(),
            prompt: self.prompt.clone(),
            transport: self.transport.clone(),
            notifier: self.notifier.clone(),
            alerts: self.alerts.clone(),
        }
    }
}

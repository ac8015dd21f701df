use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tempfile::TempDir;
use wikisave_core::{BackoffTimer, SaveCollaborators, SaveService};
use wikisave_domain::constants::{CONFIG_ENABLED, CONFIG_ENDPOINT, CONFIG_TIMEOUT};
use wikisave_infra::{
    HttpSaveTransport, JsonFileStatsStore, MapConfigStore, StaticCredentialPrompt, TracingNotifier,
};

/// Backoff timer that records delays instead of sleeping.
#[derive(Default)]
pub struct InstantTimer {
    delays: Mutex<Vec<Duration>>,
}

impl InstantTimer {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().clone()
    }
}

#[async_trait]
impl BackoffTimer for InstantTimer {
    async fn sleep(&self, delay: Duration) {
        self.delays.lock().push(delay);
    }
}

/// A save service wired to real infra adapters against `endpoint`.
pub struct TestSaver {
    pub service: Arc<SaveService>,
    pub config: Arc<MapConfigStore>,
    pub stats: Arc<JsonFileStatsStore>,
    pub timer: Arc<InstantTimer>,
    _stats_dir: TempDir,
}

impl TestSaver {
    pub fn new(endpoint: &str, password: Option<&str>) -> Self {
        let stats_dir = TempDir::new().expect("temp dir should be created");
        let config = Arc::new(MapConfigStore::from_pairs([
            (CONFIG_ENABLED, "yes"),
            (CONFIG_ENDPOINT, endpoint),
            (CONFIG_TIMEOUT, "5"),
        ]));
        let stats = Arc::new(JsonFileStatsStore::new(stats_dir.path().join("stats.json")));
        let timer = Arc::new(InstantTimer::default());

        let service = Arc::new(SaveService::new(SaveCollaborators {
            config_store: config.clone(),
            prompt: Arc::new(StaticCredentialPrompt::new(password.map(str::to_string))),
            notifier: Arc::new(TracingNotifier),
            stats_store: stats.clone(),
            transport: Arc::new(
                HttpSaveTransport::builder()
                    .proxy_from_env(false)
                    .build()
                    .expect("transport"),
            ),
            timer: timer.clone(),
        }));

        Self { service, config, stats, timer, _stats_dir: stats_dir }
    }
}

//! Wiring of infra adapters into the save service and connection probe.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use wikisave_core::{
    ConnectionProbe, CredentialPrompt, ProbeCollaborators, ProbeReport, SaveCollaborators,
    SaveService, StatsRecorder, TokioBackoffTimer,
};
use wikisave_domain::constants::{AFFIRMATIVE, CONFIG_DEBUG};
use wikisave_domain::SaveMethod;
use wikisave_infra::config::{self, MapConfigStore};
use wikisave_infra::{
    HttpSaveTransport, JsonFileStatsStore, StaticCredentialPrompt, TerminalCredentialPrompt,
    TracingAlertSink, TracingNotifier,
};

const PASSWORD_ENV: &str = "WIKISAVE_PASSWORD";
const USER_AGENT: &str = concat!("wikisave/", env!("CARGO_PKG_VERSION"));
const PROBE_DOCUMENT: &str =
    "<!doctype html><html><head><title>wikisave connection test</title></head></html>";

/// Command-line settings that shape how the app is wired.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub config_path: Option<PathBuf>,
    pub debug: bool,
    pub stats_file: PathBuf,
    pub proxy_from_env: bool,
}

pub struct App {
    service: Arc<SaveService>,
    probe: ConnectionProbe,
    stats_path: PathBuf,
    shutdown: CancellationToken,
}

impl App {
    /// Load options and build every collaborator. Must run inside the runtime.
    pub fn build(options: AppOptions) -> Result<Self> {
        let store = Arc::new(load_options(options.config_path.as_deref())?);
        if options.debug {
            store.set(CONFIG_DEBUG, AFFIRMATIVE);
        }

        let prompt: Arc<dyn CredentialPrompt> = if std::env::var_os(PASSWORD_ENV).is_some() {
            debug!("using password from {PASSWORD_ENV}");
            Arc::new(StaticCredentialPrompt::from_env(PASSWORD_ENV))
        } else {
            Arc::new(TerminalCredentialPrompt)
        };

        let shutdown = CancellationToken::new();
        spawn_interrupt_handler(shutdown.clone());

        let transport = Arc::new(
            HttpSaveTransport::builder()
                .user_agent(USER_AGENT)
                .proxy_from_env(options.proxy_from_env)
                .shutdown(shutdown.clone())
                .build()
                .context("failed to build HTTP client")?,
        );
        let notifier = Arc::new(TracingNotifier);
        let stats_path = options.stats_file;
        let stats = Arc::new(JsonFileStatsStore::new(stats_path.clone()));

        let service = Arc::new(SaveService::new(SaveCollaborators {
            config_store: store.clone(),
            prompt: prompt.clone(),
            notifier: notifier.clone(),
            stats_store: stats,
            transport: transport.clone(),
            timer: Arc::new(TokioBackoffTimer),
        }));

        let probe = ConnectionProbe::new(ProbeCollaborators {
            config_store: store,
            prompt,
            transport,
            notifier,
            alerts: Arc::new(TracingAlertSink),
        });

        Ok(Self { service, probe, stats_path, shutdown })
    }

    pub async fn save(&self, file: &Path, method: SaveMethod) -> Result<()> {
        let content = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("failed to read {}", file.display()))?;

        let (done, outcome) = oneshot::channel();
        let handled = self.service.save(content, method, move |message| {
            let _ = done.send(message);
        });
        if !handled {
            bail!("remote saver is disabled or has no endpoint configured");
        }

        let reported = tokio::select! {
            reported = outcome => reported.context("save task ended without reporting")?,
            () = self.shutdown.cancelled() => bail!("save interrupted"),
        };

        match reported {
            None => {
                println!("Saved {}", file.display());
                Ok(())
            }
            Some(message) => bail!(message),
        }
    }

    pub async fn test_connection(&self, file: Option<&Path>) -> Result<()> {
        let content = match file {
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?,
            None => PROBE_DOCUMENT.to_string(),
        };

        match self.probe.run(&content).await {
            ProbeReport::Succeeded { commit } => {
                println!("Connection verified (commit {commit})");
                Ok(())
            }
            ProbeReport::Failed { message } => bail!("connection test failed: {message}"),
            ProbeReport::Unreachable { message } => bail!("endpoint unreachable: {message}"),
            ProbeReport::NotEnabled => bail!("remote saver is not enabled"),
            ProbeReport::NoEndpoint => bail!("no save endpoint configured"),
            ProbeReport::Cancelled => bail!("connection test cancelled"),
        }
    }

    pub async fn print_stats(&self) -> Result<()> {
        let report = render_stats(self.service.stats())
            .await
            .with_context(|| format!("failed to read {}", self.stats_path.display()))?;
        println!("{report}");
        Ok(())
    }
}

async fn render_stats(recorder: &StatsRecorder) -> Result<String> {
    let stats = recorder.snapshot().await?;
    Ok(serde_json::to_string_pretty(&stats)?)
}

fn load_options(config_path: Option<&Path>) -> Result<MapConfigStore> {
    let store = match config_path {
        Some(path) => {
            let store = config::load_from_file(Some(path.to_path_buf()))?;
            config::apply_env_overrides(&store);
            store
        }
        None => config::load()?,
    };
    Ok(store)
}

fn spawn_interrupt_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, aborting in-flight save");
            shutdown.cancel();
        }
    });
}

//! Save orchestrator
//!
//! Drives one logical save from eligibility check to a single terminal
//! outcome: resolve config, obtain the credential, then loop attempts
//! through the [`SaveStateMachine`] until it succeeds or fails for good.
//!
//! Independent saves are not serialised against each other. A manual save
//! racing an autosave runs two state machines whose stats writes may
//! interleave.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use wikisave_domain::constants::{NOTIFICATION_FAILURE, NOTIFICATION_SAVING, NOTIFICATION_SUCCESS};
use wikisave_domain::{
    ClassifiedError, ErrorKind, SaveConfig, SaveError, SaveMethod, SavePayload, SaverInfo,
};

use super::config_resolver::ConfigResolver;
use super::credentials::CredentialCache;
use super::ports::{
    BackoffTimer, ConfigStore, CredentialPrompt, Notifier, SaveTransport, StatsStore,
};
use super::retry::{SaveStateMachine, Step};
use super::stats::StatsRecorder;

/// Everything the service needs from the outside world.
#[derive(Clone)]
pub struct SaveCollaborators {
    pub config_store: Arc<dyn ConfigStore>,
    pub prompt: Arc<dyn CredentialPrompt>,
    pub notifier: Arc<dyn Notifier>,
    pub stats_store: Arc<dyn StatsStore>,
    pub transport: Arc<dyn SaveTransport>,
    pub timer: Arc<dyn BackoffTimer>,
}

/// Result of [`SaveService::save_and_wait`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The saver does not apply; the host should try another mechanism.
    NotHandled,
    Saved,
    Failed(SaveError),
}

impl SaveOutcome {
    /// The completion-callback view: `None` on success.
    pub fn callback_message(&self) -> Option<String> {
        match self {
            Self::NotHandled | Self::Saved => None,
            Self::Failed(err) => Some(err.user_message()),
        }
    }
}

/// Remote save service.
pub struct SaveService {
    resolver: ConfigResolver,
    credentials: Arc<CredentialCache>,
    transport: Arc<dyn SaveTransport>,
    notifier: Arc<dyn Notifier>,
    stats: StatsRecorder,
    timer: Arc<dyn BackoffTimer>,
    info: SaverInfo,
}

impl SaveService {
    pub fn new(collaborators: SaveCollaborators) -> Self {
        Self {
            resolver: ConfigResolver::new(collaborators.config_store),
            credentials: Arc::new(CredentialCache::new(collaborators.prompt)),
            transport: collaborators.transport,
            notifier: collaborators.notifier,
            stats: StatsRecorder::new(collaborators.stats_store),
            timer: collaborators.timer,
            info: SaverInfo::default(),
        }
    }

    pub fn info(&self) -> &SaverInfo {
        &self.info
    }

    /// The session credential cache, for wiring external clear signals.
    pub fn credentials(&self) -> &Arc<CredentialCache> {
        &self.credentials
    }

    pub fn stats(&self) -> &StatsRecorder {
        &self.stats
    }

    /// Whether a save issued now would be handled.
    pub fn can_save(&self) -> bool {
        self.resolver.can_save()
    }

    /// Start a save and report its outcome through `callback`.
    ///
    /// Returns `false` when the saver does not apply (disabled, no endpoint,
    /// unsupported method, or no Tokio runtime to run on); `callback` is then
    /// never invoked. Returns `true` otherwise, and `callback` is invoked
    /// exactly once with `None` on success or the user-facing message.
    pub fn save<F>(self: &Arc<Self>, content: String, method: SaveMethod, callback: F) -> bool
    where
        F: FnOnce(Option<String>) + Send + 'static,
    {
        let Some(config) = self.eligible_config(method) else {
            return false;
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                error!(error = %err, "save requested outside a Tokio runtime");
                return false;
            }
        };

        let service = Arc::clone(self);
        runtime.spawn(async move {
            let result = service.run(config, &content, method).await;
            callback(result.err().map(|err| err.user_message()));
        });

        true
    }

    /// Run a save to completion on the current task.
    pub async fn save_and_wait(&self, content: &str, method: SaveMethod) -> SaveOutcome {
        let Some(config) = self.eligible_config(method) else {
            return SaveOutcome::NotHandled;
        };

        match self.run(config, content, method).await {
            Ok(()) => SaveOutcome::Saved,
            Err(err) => SaveOutcome::Failed(err),
        }
    }

    fn eligible_config(&self, method: SaveMethod) -> Option<SaveConfig> {
        if !self.info.supports(method) {
            debug!(%method, "save method not handled");
            return None;
        }

        let config = self.resolver.resolve();
        if config.is_none() {
            debug!(%method, "saver disabled or endpoint missing");
        }
        config
    }

    #[instrument(
        skip(self, config, content, method),
        fields(save_id = %Uuid::new_v4(), method = %method, bytes = content.len())
    )]
    async fn run(
        &self,
        config: SaveConfig,
        content: &str,
        method: SaveMethod,
    ) -> Result<(), SaveError> {
        if config.debug {
            info!(endpoint = %config.endpoint, "save initiated");
        }

        let credential = match self.credentials.get(&config).await {
            Ok(credential) => credential,
            Err(err) => {
                info!(kind = %err.kind(), "save cancelled at credential prompt");
                return Err(err);
            }
        };

        if config.notifications_enabled {
            self.notifier.display(NOTIFICATION_SAVING);
        }

        let mut machine = SaveStateMachine::new(config.max_retries());
        let mut retry_count = machine.start();

        loop {
            let payload = SavePayload::new(content, &credential, retry_count);
            debug!(retry_count, "dispatching save attempt");
            let outcome = self.transport.post(&config.endpoint, &payload, config.timeout).await;

            match machine.advance(&outcome) {
                Step::Succeeded => {
                    self.finish_success(&config, retry_count).await;
                    return Ok(());
                }
                Step::Retry { delay, error } => {
                    self.observe_failure(&config, &error, retry_count, true);
                    if config.debug {
                        info!(delay_ms = delay.as_millis() as u64, "retrying save");
                    }
                    self.timer.sleep(delay).await;
                    retry_count = machine.resume();
                }
                Step::Failed(error) => {
                    self.observe_failure(&config, &error, retry_count, false);
                    self.finish_failure(&config, &error).await;
                    return Err(SaveError::Rejected(error));
                }
            }
        }
    }

    fn observe_failure(
        &self,
        config: &SaveConfig,
        error: &ClassifiedError,
        retry_count: u32,
        will_retry: bool,
    ) {
        if error.kind == ErrorKind::AuthenticationFailure {
            self.credentials.clear();
        }

        let status = error.http_status.unwrap_or(0);
        if config.debug {
            info!(
                status,
                retry_count,
                will_retry,
                kind = %error.kind,
                message = %error.raw_message,
                "save attempt failed"
            );
        } else {
            debug!(status, retry_count, will_retry, kind = %error.kind, "save attempt failed");
        }
    }

    async fn finish_success(&self, config: &SaveConfig, retry_count: u32) {
        info!(retry_count, "save completed");
        self.stats.record_success(config.debug).await;
        if config.notifications_enabled {
            self.notifier.display(NOTIFICATION_SUCCESS);
        }
    }

    async fn finish_failure(&self, config: &SaveConfig, error: &ClassifiedError) {
        warn!(kind = %error.kind, message = %error.user_message, "save failed");
        self.stats.record_failure(&error.user_message, config.debug).await;
        if config.notifications_enabled {
            self.notifier.display(NOTIFICATION_FAILURE);
        }
    }
}

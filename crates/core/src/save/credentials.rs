//! Session-scoped credential cache
//!
//! Owns the optional remembered secret for the lifetime of the process. The
//! secret is only reused when the save config asks for it; otherwise every
//! save prompts afresh. Any `401` and any external clear signal discard it.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use wikisave_domain::constants::PASSWORD_PROMPT;
use wikisave_domain::{Credential, SaveConfig, SaveError};

use super::ports::CredentialPrompt;

/// External "forget the password" event (e.g. user logout). Carries no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearCredential;

/// Holds at most one credential for the session.
pub struct CredentialCache {
    cached: Mutex<Option<Credential>>,
    prompt: Arc<dyn CredentialPrompt>,
}

impl CredentialCache {
    pub fn new(prompt: Arc<dyn CredentialPrompt>) -> Self {
        Self { cached: Mutex::new(None), prompt }
    }

    /// Obtain the credential for a save.
    ///
    /// Returns the remembered credential when `remember_password` is set and
    /// one is cached; otherwise prompts. A declined prompt yields
    /// [`SaveError::Cancelled`].
    pub async fn get(&self, config: &SaveConfig) -> Result<Credential, SaveError> {
        if config.remember_password {
            let remembered = self.cached.lock().clone();
            if let Some(credential) = remembered {
                debug!("using remembered credential");
                return Ok(credential);
            }
        }

        let credential = self
            .prompt
            .prompt(PASSWORD_PROMPT)
            .await
            .and_then(Credential::new)
            .ok_or(SaveError::Cancelled)?;

        if config.remember_password {
            *self.cached.lock() = Some(credential.clone());
        }

        Ok(credential)
    }

    /// Discard the remembered credential, if any.
    pub fn clear(&self) {
        if self.cached.lock().take().is_some() {
            info!("remembered credential cleared");
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cached.lock().is_some()
    }

    /// Clear the cache whenever a [`ClearCredential`] signal arrives.
    ///
    /// Runs until every sender is dropped or `shutdown` is cancelled. A
    /// lagged receiver still clears: missed signals all meant the same thing.
    pub fn spawn_clear_listener(
        self: &Arc<Self>,
        mut signals: broadcast::Receiver<ClearCredential>,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = shutdown.cancelled() => break,
                    received = signals.recv() => match received {
                        Ok(ClearCredential) | Err(broadcast::error::RecvError::Lagged(_)) => {
                            cache.clear();
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            debug!("credential clear listener stopped");
        })
    }
}

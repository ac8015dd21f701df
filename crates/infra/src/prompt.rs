//! Credential prompts for non-interactive and terminal use.

use async_trait::async_trait;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Password;
use tracing::debug;
use wikisave_core::CredentialPrompt;
use wikisave_domain::Credential;

/// Answers every prompt with a fixed secret, or declines when none is set.
#[derive(Debug, Default)]
pub struct StaticCredentialPrompt {
    credential: Option<Credential>,
}

impl StaticCredentialPrompt {
    pub fn new(secret: Option<String>) -> Self {
        Self { credential: secret.and_then(Credential::new) }
    }

    /// Read the secret from an environment variable.
    pub fn from_env(var: &str) -> Self {
        Self::new(std::env::var(var).ok())
    }

    pub fn has_secret(&self) -> bool {
        self.credential.is_some()
    }
}

#[async_trait]
impl CredentialPrompt for StaticCredentialPrompt {
    async fn prompt(&self, _message: &str) -> Option<String> {
        self.credential.as_ref().map(|credential| credential.expose().to_string())
    }
}

/// Asks for the password on the controlling terminal without echoing it.
///
/// An empty answer, a missing terminal or any read error counts as a cancel.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalCredentialPrompt;

#[async_trait]
impl CredentialPrompt for TerminalCredentialPrompt {
    async fn prompt(&self, message: &str) -> Option<String> {
        let message = message.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            Password::with_theme(&ColorfulTheme::default())
                .with_prompt(message)
                .allow_empty_password(true)
                .interact()
        })
        .await;

        match answer {
            Ok(answer) => into_secret(answer),
            Err(err) => {
                debug!(error = %err, "password prompt task failed");
                None
            }
        }
    }
}

fn into_secret(answer: dialoguer::Result<String>) -> Option<String> {
    match answer {
        Ok(secret) if secret.is_empty() => None,
        Ok(secret) => Some(secret),
        Err(err) => {
            debug!(error = %err, "failed to read password from terminal");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_prompt_returns_secret() {
        let prompt = StaticCredentialPrompt::new(Some("hunter2".into()));
        assert!(prompt.has_secret());
        assert_eq!(prompt.prompt("ignored").await, Some("hunter2".to_string()));
    }

    #[tokio::test]
    async fn empty_static_secret_declines() {
        let prompt = StaticCredentialPrompt::new(Some(String::new()));
        assert!(!prompt.has_secret());
        assert_eq!(prompt.prompt("ignored").await, None);
        assert_eq!(StaticCredentialPrompt::default().prompt("ignored").await, None);
    }

    #[test]
    fn terminal_answer_becomes_secret() {
        assert_eq!(into_secret(Ok("hunter2".into())), Some("hunter2".to_string()));
    }

    #[test]
    fn empty_or_failed_terminal_answer_cancels() {
        assert_eq!(into_secret(Ok(String::new())), None);

        let not_a_terminal =
            std::io::Error::new(std::io::ErrorKind::NotConnected, "not a terminal");
        assert_eq!(into_secret(Err(not_a_terminal.into())), None);
    }
}

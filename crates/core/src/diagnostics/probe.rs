//! Connection probe
//!
//! Sends a single save request with the configured endpoint and a freshly
//! prompted password, then reports the result as a modal alert. The probe
//! never retries, never reads or fills the credential cache and never
//! touches save stats.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument, warn};
use wikisave_domain::constants::{
    NOTIFICATION_FAILURE, NOTIFICATION_SAVING, NOTIFICATION_SUCCESS, TEST_PASSWORD_PROMPT,
};
use wikisave_domain::{AlertSeverity, Credential, SavePayload, SaveReceipt, TransportOutcome};

use crate::save::classifier::REQUEST_TIMEOUT_TEXT;
use crate::save::config_resolver::ConfigResolver;
use crate::save::ports::{AlertSink, ConfigStore, CredentialPrompt, Notifier, SaveTransport};

const NOT_ENABLED_ALERT: &str =
    "Cloudflare Saver is not enabled. Please enable it in the settings above.";
const NO_ENDPOINT_ALERT: &str =
    "No Cloudflare Function endpoint configured. Please enter your endpoint URL above.";
const CANCELLED_ALERT: &str = "Test cancelled - no password provided.";

/// Collaborators for [`ConnectionProbe`].
#[derive(Clone)]
pub struct ProbeCollaborators {
    pub config_store: Arc<dyn ConfigStore>,
    pub prompt: Arc<dyn CredentialPrompt>,
    pub transport: Arc<dyn SaveTransport>,
    pub notifier: Arc<dyn Notifier>,
    pub alerts: Arc<dyn AlertSink>,
}

/// What the probe found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeReport {
    NotEnabled,
    NoEndpoint,
    Cancelled,
    /// `commit` is `N/A` when the endpoint did not report one
    Succeeded { commit: String },
    /// The endpoint answered with a non-2xx status
    Failed { message: String },
    /// No response arrived (timeout, DNS, refused, CORS)
    Unreachable { message: String },
}

impl ProbeReport {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

pub struct ConnectionProbe {
    resolver: ConfigResolver,
    prompt: Arc<dyn CredentialPrompt>,
    transport: Arc<dyn SaveTransport>,
    notifier: Arc<dyn Notifier>,
    alerts: Arc<dyn AlertSink>,
}

impl ConnectionProbe {
    pub fn new(collaborators: ProbeCollaborators) -> Self {
        Self {
            resolver: ConfigResolver::new(collaborators.config_store),
            prompt: collaborators.prompt,
            transport: collaborators.transport,
            notifier: collaborators.notifier,
            alerts: collaborators.alerts,
        }
    }

    /// Run the probe, posting `test_content` as the document body.
    #[instrument(skip_all, fields(bytes = test_content.len()))]
    pub async fn run(&self, test_content: &str) -> ProbeReport {
        if !self.resolver.is_enabled() {
            self.alerts.display(NOT_ENABLED_ALERT, AlertSeverity::Error);
            return ProbeReport::NotEnabled;
        }
        let Some(endpoint) = self.resolver.endpoint() else {
            self.alerts.display(NO_ENDPOINT_ALERT, AlertSeverity::Error);
            return ProbeReport::NoEndpoint;
        };

        let Some(credential) =
            self.prompt.prompt(TEST_PASSWORD_PROMPT).await.and_then(Credential::new)
        else {
            self.alerts.display(CANCELLED_ALERT, AlertSeverity::Info);
            return ProbeReport::Cancelled;
        };

        self.notifier.display(NOTIFICATION_SAVING);

        let payload = SavePayload::new(test_content, &credential, 0);
        let outcome = self.transport.post(&endpoint, &payload, self.resolver.timeout()).await;

        let report = interpret(&outcome);
        self.announce(&report);
        report
    }

    fn announce(&self, report: &ProbeReport) {
        match report {
            ProbeReport::Succeeded { commit } => {
                info!(%commit, "connection test succeeded");
                self.notifier.display(NOTIFICATION_SUCCESS);
                self.alerts.display(
                    &format!(
                        "Test successful\n\nConnection to Cloudflare Function verified.\n\
                         Commit SHA: {commit}\n\nYour Cloudflare Saver is configured correctly."
                    ),
                    AlertSeverity::Success,
                );
            }
            ProbeReport::Failed { message } | ProbeReport::Unreachable { message } => {
                warn!(%message, "connection test failed");
                self.notifier.display(NOTIFICATION_FAILURE);
                self.alerts.display(&failure_alert(report, message), AlertSeverity::Error);
            }
            ProbeReport::NotEnabled | ProbeReport::NoEndpoint | ProbeReport::Cancelled => {}
        }
    }
}

fn interpret(outcome: &TransportOutcome) -> ProbeReport {
    match outcome {
        TransportOutcome::Response { status, body, .. } if (200..300).contains(status) => {
            let commit = SaveReceipt::from_body(body).commit.unwrap_or_else(|| "N/A".into());
            ProbeReport::Succeeded { commit }
        }
        TransportOutcome::Response { status, status_text, body } => {
            let message = error_field(body)
                .unwrap_or_else(|| format!("HTTP {status} {status_text}").trim_end().to_string());
            ProbeReport::Failed { message }
        }
        TransportOutcome::TimedOut => {
            ProbeReport::Unreachable { message: REQUEST_TIMEOUT_TEXT.into() }
        }
        TransportOutcome::Failed(message) => ProbeReport::Unreachable { message: message.clone() },
    }
}

fn error_field(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

fn failure_alert(report: &ProbeReport, message: &str) -> String {
    let checklist = match report {
        ProbeReport::Unreachable { .. } => {
            "• Internet connection\n\
             • Endpoint URL is accessible\n\
             • CORS is configured to allow your origin\n\
             • Cloudflare Function is deployed"
        }
        _ => {
            "• Endpoint URL is correct\n\
             • Password matches SAVE_PASSWORD in Cloudflare\n\
             • Environment variables are configured\n\
             • Cloudflare Function is deployed"
        }
    };
    format!("Test failed\n\nError: {message}\n\nPlease check:\n{checklist}")
}

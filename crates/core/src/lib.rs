//! # wikisave Core
//!
//! Pure save orchestration logic - no HTTP, filesystem or UI code.
//!
//! This crate contains:
//! - Port interfaces (traits) for every external collaborator
//! - Config resolution, credential caching and error classification
//! - The retry state machine and the save orchestrator
//! - The connection probe used by the diagnostic path
//!
//! ## Architecture Principles
//! - Only depends on `wikisave-domain`
//! - All external effects go through traits in [`save::ports`]
//! - Timers are injected so retry schedules are testable without waiting

pub mod diagnostics;
pub mod save;

// Re-export specific items to avoid ambiguity
pub use diagnostics::{ConnectionProbe, ProbeCollaborators, ProbeReport};
pub use save::classifier::{classify, classify_outcome};
pub use save::config_resolver::ConfigResolver;
pub use save::credentials::{ClearCredential, CredentialCache};
pub use save::ports::{
    AlertSink, BackoffTimer, ConfigStore, CredentialPrompt, Notifier, SaveTransport, StatsStore,
    TokioBackoffTimer,
};
pub use save::retry::{backoff_delay, SaveState, SaveStateMachine, Step};
pub use save::service::{SaveCollaborators, SaveOutcome, SaveService};
pub use save::stats::StatsRecorder;

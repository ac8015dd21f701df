//! # wikisave Infrastructure
//!
//! Infrastructure implementations of core save ports.
//!
//! This crate contains:
//! - The reqwest-backed save transport
//! - Config store and file/environment loader
//! - Stats stores (JSON file, in-memory)
//! - Credential prompts, notifiers and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `wikisave-core`
//! - Contains all "impure" code (I/O, network, terminal)

pub mod config;
pub mod errors;
pub mod http;
pub mod logging;
pub mod notify;
pub mod prompt;
pub mod stats;

// Re-export commonly used items
pub use config::MapConfigStore;
pub use errors::InfraError;
pub use http::{HttpSaveTransport, HttpSaveTransportBuilder};
pub use notify::{TracingAlertSink, TracingNotifier};
pub use prompt::{StaticCredentialPrompt, TerminalCredentialPrompt};
pub use stats::{InMemoryStatsStore, JsonFileStatsStore};

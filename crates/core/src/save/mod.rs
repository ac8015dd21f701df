//! Remote save orchestration
//!
//! A save flows through the modules in this order: the config resolver
//! decides eligibility, the credential cache supplies the secret, the service
//! drives HTTP attempts through the retry state machine, the classifier
//! interprets failures and the stats recorder persists the outcome.

pub mod classifier;
pub mod config_resolver;
pub mod credentials;
pub mod ports;
pub mod retry;
pub mod service;
pub mod stats;

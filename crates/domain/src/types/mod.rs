//! Domain types and models

pub mod classified;
pub mod config;
pub mod credential;
pub mod payload;
pub mod saver;
pub mod stats;

pub use classified::{ClassifiedError, ErrorKind};
pub use config::SaveConfig;
pub use credential::Credential;
pub use payload::{SavePayload, SaveReceipt, TransportOutcome};
pub use saver::{AlertSeverity, SaveMethod, SaverInfo};
pub use stats::{LastSaveStatus, SaveStats};

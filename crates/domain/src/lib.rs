//! # wikisave Domain
//!
//! Data types shared by every layer of the remote saver.
//!
//! This crate contains:
//! - The typed save configuration and option keys it is resolved from
//! - The session credential and the wire payload
//! - Classified save errors and the error taxonomy
//! - Persisted save statistics
//!
//! ## Architecture
//! - No dependencies on other wikisave crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;

//! Diagnostic path: one-shot connection test against the save endpoint.

pub mod probe;

pub use probe::{ConnectionProbe, ProbeCollaborators, ProbeReport};

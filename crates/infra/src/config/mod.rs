//! Configuration loading and management
//!
//! This module provides the in-memory option store and utilities for
//! filling it from environment variables and files.

pub mod loader;
pub mod store;

// Re-export commonly used items
pub use loader::{
    apply_env_overrides, load, load_from_env, load_from_file, normalize_key, probe_config_paths,
};
pub use store::MapConfigStore;

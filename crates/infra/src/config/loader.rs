//! Configuration loader
//!
//! Fills a [`MapConfigStore`] from a config file and environment variables.
//!
//! ## Loading Strategy
//! 1. Probe multiple paths for a config file (optional)
//! 2. Parse it as JSON or TOML, detected by extension
//! 3. Apply environment variable overrides on top
//!
//! ## Environment Variables
//! - `WIKISAVE_ENABLED`: Whether the saver is active (yes/no)
//! - `WIKISAVE_ENDPOINT`: Save function URL
//! - `WIKISAVE_TIMEOUT`: Per-attempt timeout in seconds
//! - `WIKISAVE_NOTIFICATIONS`: Show save notifications (yes/no)
//! - `WIKISAVE_AUTO_RETRY`: Retry transient failures (yes/no)
//! - `WIKISAVE_REMEMBER_PASSWORD`: Keep the password for the session (yes/no)
//! - `WIKISAVE_DEBUG`: Verbose save logging (yes/no)
//!
//! Boolean variables also accept `1`/`0`, `true`/`false` and `on`/`off`.
//!
//! ## File Format
//! A flat table. Keys are either full option keys
//! (`$:/config/cloudflare-saver/endpoint`) or their short suffix
//! (`endpoint`, `auto-retry`, `auto_retry`). Booleans become `yes`/`no`,
//! numbers their decimal form.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./wikisave.toml` or `./wikisave.json` (current working directory)
//! 2. `../wikisave.toml` or `../wikisave.json` (parent directory)
//! 3. Relative to executable location

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use wikisave_domain::constants::{
    AFFIRMATIVE, CONFIG_AUTO_RETRY, CONFIG_DEBUG, CONFIG_ENABLED, CONFIG_ENDPOINT,
    CONFIG_NOTIFICATIONS, CONFIG_PREFIX, CONFIG_REMEMBER_PASSWORD, CONFIG_TIMEOUT,
};
use wikisave_domain::{Result, WikiSaveError};

use super::store::MapConfigStore;
use crate::errors::InfraError;

const FILE_STEM: &str = "wikisave";

/// Environment variable, option key, whether the value is a yes/no flag.
const ENV_OPTIONS: [(&str, &str, bool); 7] = [
    ("WIKISAVE_ENABLED", CONFIG_ENABLED, true),
    ("WIKISAVE_ENDPOINT", CONFIG_ENDPOINT, false),
    ("WIKISAVE_TIMEOUT", CONFIG_TIMEOUT, false),
    ("WIKISAVE_NOTIFICATIONS", CONFIG_NOTIFICATIONS, true),
    ("WIKISAVE_AUTO_RETRY", CONFIG_AUTO_RETRY, true),
    ("WIKISAVE_REMEMBER_PASSWORD", CONFIG_REMEMBER_PASSWORD, true),
    ("WIKISAVE_DEBUG", CONFIG_DEBUG, true),
];

/// Load configuration from the first config file found, then environment.
///
/// A missing file is not an error: unset options keep their defaults.
///
/// # Errors
/// Returns `WikiSaveError::Config` if a config file exists but cannot be
/// read or parsed.
pub fn load() -> Result<MapConfigStore> {
    let store = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            debug!("no config file found, using environment and defaults");
            MapConfigStore::new()
        }
    };

    apply_env_overrides(&store);
    Ok(store)
}

/// Load only the options set through environment variables.
pub fn load_from_env() -> MapConfigStore {
    let store = MapConfigStore::new();
    apply_env_overrides(&store);
    store
}

/// Overwrite options in `store` with any set environment variables.
pub fn apply_env_overrides(store: &MapConfigStore) {
    for (var, key, is_flag) in ENV_OPTIONS {
        let Ok(raw) = std::env::var(var) else {
            continue;
        };
        let value = if is_flag { env_flag(&raw) } else { raw };
        debug!(variable = var, "config option overridden from environment");
        store.set(key, value);
    }
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
///
/// # Errors
/// Returns `WikiSaveError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid or holds nested values
pub fn load_from_file(path: Option<PathBuf>) -> Result<MapConfigStore> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WikiSaveError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            WikiSaveError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WikiSaveError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, format chosen by extension.
fn parse_config(contents: &str, path: &Path) -> Result<MapConfigStore> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let entries = match extension {
        "toml" => {
            let table: toml::Table =
                toml::from_str(contents).map_err(|e| WikiSaveError::from(InfraError::from(e)))?;
            table
                .into_iter()
                .map(|(key, value)| Ok((normalize_key(&key), toml_value(&key, value)?)))
                .collect::<Result<Vec<_>>>()?
        }
        "json" => {
            let object: serde_json::Map<String, serde_json::Value> =
                serde_json::from_str(contents)
                    .map_err(|e| WikiSaveError::Config(format!("Invalid JSON format: {e}")))?;
            object
                .into_iter()
                .map(|(key, value)| Ok((normalize_key(&key), json_value(&key, value)?)))
                .collect::<Result<Vec<_>>>()?
        }
        _ => {
            return Err(WikiSaveError::Config(format!("Unsupported config format: {extension}")))
        }
    };

    Ok(MapConfigStore::from_pairs(entries))
}

/// Expand a short option name to its full key.
///
/// `endpoint`, `auto_retry` and `$:/config/cloudflare-saver/auto-retry` all
/// name the same option.
pub fn normalize_key(key: &str) -> String {
    let key = key.trim();
    if key.starts_with(CONFIG_PREFIX) {
        key.to_string()
    } else {
        format!("{CONFIG_PREFIX}{}", key.replace('_', "-"))
    }
}

fn toml_value(key: &str, value: toml::Value) -> Result<String> {
    match value {
        toml::Value::String(text) => Ok(text),
        toml::Value::Boolean(flag) => Ok(flag_text(flag)),
        toml::Value::Integer(number) => Ok(number.to_string()),
        toml::Value::Float(number) => Ok(number.to_string()),
        _ => Err(nested_value(key)),
    }
}

fn json_value(key: &str, value: serde_json::Value) -> Result<String> {
    match value {
        serde_json::Value::String(text) => Ok(text),
        serde_json::Value::Bool(flag) => Ok(flag_text(flag)),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        _ => Err(nested_value(key)),
    }
}

fn nested_value(key: &str) -> WikiSaveError {
    WikiSaveError::Config(format!("Option `{key}` must be a string, number or boolean"))
}

fn flag_text(flag: bool) -> String {
    let text = if flag { AFFIRMATIVE } else { "no" };
    text.to_string()
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory
/// 2. Parent directory
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd.clone());
        roots.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .into_iter()
        .flat_map(|root| {
            ["toml", "json"].map(|ext| root.join(format!("{FILE_STEM}.{ext}")))
        })
        .find(|path| path.exists())
}

/// Map the usual boolean spellings onto `yes`/`no`; anything else is kept.
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_flag(raw: &str) -> String {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => flag_text(true),
        "0" | "false" | "no" | "off" => flag_text(false),
        _ => raw.to_string(),
    }
}

//! Saver descriptor and host-facing enums

use serde::{Deserialize, Serialize};

use crate::constants::{SAVER_NAME, SAVER_PRIORITY};
use crate::impl_domain_status_conversions;

/// How the host asked for the save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMethod {
    /// Explicit user save
    Save,
    /// Periodic background save
    Autosave,
    /// Download to a local file; never handled by the remote saver
    Download,
}

impl_domain_status_conversions!(SaveMethod {
    Save => "save",
    Autosave => "autosave",
    Download => "download",
});

/// Severity of a modal alert on the diagnostic path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Success,
    Error,
    Info,
}

impl_domain_status_conversions!(AlertSeverity {
    Success => "success",
    Error => "error",
    Info => "info",
});

impl AlertSeverity {
    /// Modal title matching the severity.
    pub fn title(self) -> &'static str {
        match self {
            Self::Success => "Test Successful",
            Self::Error => "Test Failed",
            Self::Info => "Test Cancelled",
        }
    }
}

/// Registration record the host uses to pick a saver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaverInfo {
    pub name: String,
    /// Higher wins when several savers are eligible
    pub priority: u32,
    pub capabilities: Vec<SaveMethod>,
}

impl SaverInfo {
    pub fn supports(&self, method: SaveMethod) -> bool {
        self.capabilities.contains(&method)
    }
}

impl Default for SaverInfo {
    fn default() -> Self {
        Self {
            name: SAVER_NAME.to_string(),
            priority: SAVER_PRIORITY,
            capabilities: vec![SaveMethod::Save, SaveMethod::Autosave],
        }
    }
}

//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use wikisave_domain::WikiSaveError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub WikiSaveError);

impl From<InfraError> for WikiSaveError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<WikiSaveError> for InfraError {
    fn from(value: WikiSaveError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoWikiSaveError {
    fn into_wikisave(self) -> WikiSaveError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → WikiSaveError */
/* -------------------------------------------------------------------------- */

impl IntoWikiSaveError for HttpError {
    fn into_wikisave(self) -> WikiSaveError {
        if self.is_timeout() {
            return WikiSaveError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return WikiSaveError::Network(format!("HTTP connection failure: {}", root_cause(&self)));
        }

        if self.is_builder() {
            return WikiSaveError::Config(format!("invalid HTTP request: {self}"));
        }

        WikiSaveError::Network(root_cause(&self))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_wikisave())
    }
}

/// Innermost error message; reqwest wraps the interesting part.
fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → WikiSaveError */
/* -------------------------------------------------------------------------- */

impl IntoWikiSaveError for IoError {
    fn into_wikisave(self) -> WikiSaveError {
        match self.kind() {
            std::io::ErrorKind::NotFound => WikiSaveError::NotFound(self.to_string()),
            _ => WikiSaveError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_wikisave())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / toml → WikiSaveError */
/* -------------------------------------------------------------------------- */

impl IntoWikiSaveError for JsonError {
    fn into_wikisave(self) -> WikiSaveError {
        WikiSaveError::Serialization(format!("invalid JSON: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_wikisave())
    }
}

impl IntoWikiSaveError for toml::de::Error {
    fn into_wikisave(self) -> WikiSaveError {
        WikiSaveError::Config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(value.into_wikisave())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

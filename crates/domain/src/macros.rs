//! Macro for implementing Display and FromStr for wire-level enums
//!
//! Several small enums (save status, save method, alert severity) travel as
//! lowercase strings through the stats store, the CLI and the logs. This
//! macro gives each of them a single mapping for both directions.
//!
//! # Example
//!
//! ```rust
//! use wikisave_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Outcome {
//!     Success,
//!     Failure,
//! }
//!
//! impl_domain_status_conversions!(Outcome {
//!     Success => "success",
//!     Failure => "failure",
//! });
//! ```

/// Implements Display and FromStr traits for string-mapped enums
///
/// Parsing is case-insensitive; display is always the canonical lowercase
/// form given in the mapping.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

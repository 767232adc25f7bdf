//! Configuration error types.

use thiserror::Error;

use crate::scoring::ScoringError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Confidence threshold string could not be parsed as a number.
    #[error("failed to parse confidence threshold '{value}': {source}")]
    ThresholdParseError {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Confidence threshold is outside `(0, 1)`.
    #[error(transparent)]
    InvalidThreshold(#[from] ScoringError),

    /// Log level is not one of the recognized names.
    #[error("invalid log level '{value}': expected trace, debug, info, warning or error")]
    InvalidLogLevel { value: String },

    /// A setting that must not be blank was empty.
    #[error("{name} must not be empty")]
    EmptyValue { name: &'static str },
}

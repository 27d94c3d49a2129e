//! Core error types for weatherdash-core.
//!
//! Selection input is never rejected with an error: out-of-range and
//! misordered instants are clamped, malformed field text is ignored. The
//! errors below only cover configuration, construction of bounds, and
//! payloads handed to us by collaborators.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for weatherdash-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Collaborator series payload errors
    #[error("Series error: {0}")]
    Series(#[from] SeriesError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed base URL for a collaborator request
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: upper bound ({upper}) must be after lower bound ({lower})")]
    InvalidTimeRange {
        lower: chrono::DateTime<chrono::Utc>,
        upper: chrono::DateTime<chrono::Utc>,
    },
}

/// Errors in an hourly series payload.
#[derive(Error, Debug)]
pub enum SeriesError {
    /// Payload has no `hourly` block
    #[error("Payload has no hourly block")]
    MissingHourly,

    /// `hourly` block lacks the requested variable
    #[error("Payload has no hourly '{0}' values")]
    MissingVariable(String),

    /// `time` and value arrays disagree in length
    #[error("Series length mismatch: {times} timestamps, {values} values")]
    LengthMismatch { times: usize, values: usize },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Config(err.into())
    }
}

impl From<toml::ser::Error> for CoreError {
    fn from(err: toml::ser::Error) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

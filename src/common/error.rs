//! Error types for the application.

use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Errors raised while interpreting C-Gate lines.
///
/// These are never fatal: callers log the offending line and keep the
/// session going.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid object path '{path}'")]
    BadAddress { path: String },

    #[error("Invalid status record '{record}'")]
    BadStatus { record: String },

    #[error("Invalid event line '{line}'")]
    BadEvent { line: String },

    #[error("Invalid tree markup: {message}")]
    BadMarkup { message: String },
}

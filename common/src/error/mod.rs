//! Error types for the crypto tracker
//!
//! This module provides a unified error handling system for all crates in the
//! workspace. Fetch failures are folded into a single human-readable message
//! by the refresh controller; everything else travels as `Error`.

use std::fmt::Display;
use thiserror::Error;

/// Crypto tracker error type
#[derive(Debug, Error)]
pub enum Error {
    /// The market-data endpoint could not be reached
    #[error("Network error: {0}")]
    Transport(String),

    /// The market-data endpoint answered with a non-success status
    #[error("HTTP error! status: {0}")]
    UpstreamStatus(u16),

    /// The market-data endpoint answered with an unexpected payload
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Error when a market entry cannot be found
    #[error("Market entry not found: {0}")]
    NotFound(String),

    /// Generic validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Decimal conversion error
    #[error("Decimal conversion error: {0}")]
    DecimalError(String),
}

impl Error {
    /// Whether this error came from talking to the upstream feed
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::UpstreamStatus(_) | Error::MalformedResponse(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait to add context to error results
pub trait ErrorExt<T> {
    /// Add context information to an error
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display;
}

impl<T> ErrorExt<T> for Result<T> {
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display,
    {
        self.map_err(|e| {
            let context = context_fn().to_string();
            match e {
                Error::Transport(msg) => Error::Transport(format!("{}: {}", context, msg)),
                Error::MalformedResponse(msg) => Error::MalformedResponse(format!("{}: {}", context, msg)),
                Error::NotFound(msg) => Error::NotFound(format!("{}: {}", context, msg)),
                Error::ValidationError(msg) => Error::ValidationError(format!("{}: {}", context, msg)),
                Error::ConfigurationError(msg) => Error::ConfigurationError(format!("{}: {}", context, msg)),
                Error::Internal(msg) => Error::Internal(format!("{}: {}", context, msg)),
                Error::DecimalError(msg) => Error::DecimalError(format!("{}: {}", context, msg)),
                // Status codes and serde errors carry no free-form text to prefix
                Error::UpstreamStatus(code) => Error::UpstreamStatus(code),
                Error::Serialization(e) => Error::Serialization(e),
            }
        })
    }
}

/// Trait for converting other error types to our Error type
pub trait IntoError {
    /// Convert to Error
    fn into_error(self, message: &str) -> Error;
}

impl<E: std::error::Error> IntoError for E {
    fn into_error(self, message: &str) -> Error {
        Error::Internal(format!("{}: {}", message, self))
    }
}

/// Convert string messages into an error
impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Internal(message)
    }
}

/// Convert static string references into an error
impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::Internal(message.to_string())
    }
}

/// From rust_decimal::Error
impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::DecimalError(err.to_string())
    }
}

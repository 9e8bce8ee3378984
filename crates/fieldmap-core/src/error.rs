//! Error types for the Fieldmap core library
//!
//! This module defines the error handling system for Fieldmap,
//! using thiserror for ergonomic error definitions and anyhow for flexible error contexts.

use thiserror::Error;

/// Main error type for Fieldmap operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid mapping rule configuration (missing required options, etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        rule_id: Option<String>,
    },

    /// Expression compilation or evaluation failed
    #[error("Expression error: {message}")]
    Expression {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Declarative validation rules rejected a value
    #[error("Validation failed for '{field}': {}", .violations.join("; "))]
    Validation {
        field: String,
        violations: Vec<String>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for an expression failure without an underlying source
    pub fn expression(message: impl Into<String>) -> Self {
        Error::Expression {
            message: message.into(),
            source: None,
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

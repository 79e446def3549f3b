//! Centralized error types for minimem
//!
//! Library code returns [`MemoryError`]; the binary wraps it with `anyhow`
//! for context at the edges.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for session store and configuration operations
#[derive(Error, Debug)]
pub enum MemoryError {
    /// Store construction rejected its parameters
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Caller supplied a value the store cannot interpret
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// IO errors with path context
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl MemoryError {
    /// Create an invalid configuration error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Returns true if the caller can reasonably retry or correct and continue
    pub fn is_recoverable(&self) -> bool {
        match self {
            // A store built from bad parameters never comes into existence
            MemoryError::InvalidConfiguration { .. } => false,
            MemoryError::InvalidInput { .. } => true,
            MemoryError::Io { .. } => true,
            // Usually a hand-edited config file with broken JSON
            MemoryError::Serialization { .. } => false,
        }
    }

    /// Returns the error severity level for logging
    pub fn severity(&self) -> tracing::Level {
        match self {
            MemoryError::InvalidConfiguration { .. } => tracing::Level::ERROR,
            MemoryError::Serialization { .. } => tracing::Level::ERROR,
            MemoryError::Io { .. } => tracing::Level::WARN,
            MemoryError::InvalidInput { .. } => tracing::Level::INFO,
        }
    }
}

/// Result type alias using MemoryError
pub type Result<T> = std::result::Result<T, MemoryError>;

impl From<serde_json::Error> for MemoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_display() {
        let err = MemoryError::invalid_configuration("max_history must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: max_history must be positive"
        );
        assert!(!err.is_recoverable());
        assert_eq!(err.severity(), tracing::Level::ERROR);
    }

    #[test]
    fn test_invalid_input_is_recoverable() {
        let err = MemoryError::invalid_input("unknown role 'tool'");
        assert!(err.to_string().contains("unknown role"));
        assert!(err.is_recoverable());
        assert_eq!(err.severity(), tracing::Level::INFO);
    }

    #[test]
    fn test_io_error_keeps_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = MemoryError::io("/tmp/config.json", source);
        assert!(err.to_string().contains("/tmp/config.json"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: MemoryError = json_err.into();
        assert!(matches!(err, MemoryError::Serialization { .. }));
    }
}

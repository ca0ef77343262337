//! Error types for the logging subsystem

use thiserror::Error;

/// Errors that can occur in the logging subsystem
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoggingError {
    /// A global subscriber is already installed, or the filter is malformed
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// Level string not recognised
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),
}

//! Custom error types for zborg
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for zborg operations
#[derive(Error, Debug)]
pub enum ZborgError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration values that parse but are not acceptable
    #[error("Validation error: {0}")]
    Validation(String),

    /// Passphrase file missing, unreadable or empty
    #[error("Passphrase error: {0}")]
    Passphrase(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// An external program could not be started at all
    #[error("Failed to start '{program}': {reason}")]
    Spawn { program: String, reason: String },

    /// An external program ran and reported failure
    #[error("'{command}' failed with {status}: {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    /// Mount point handling errors
    #[error("Mount error: {0}")]
    Mount(String),

    /// The process lacks the privilege needed for the requested operation
    #[error("Permission denied: {0}")]
    Privilege(String),
}

impl ZborgError {
    /// Create a command failure from a rendered command line and its exit status
    pub fn command_failed(
        command: impl Into<String>,
        status: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::Command {
            command: command.into(),
            status: status.into(),
            stderr: stderr.into(),
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for ZborgError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ZborgError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for ZborgError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for zborg operations
pub type ZborgResult<T> = Result<T, ZborgError>;

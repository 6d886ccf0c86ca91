//! Error types for the trade-ledger system.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the trade-ledger system.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The extraction service call failed.
    #[error("Extraction service error: {0}")]
    Service(String),

    /// The extraction service answered with something that is not a transfer list.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A checkpoint artifact could not be read or written.
    #[error("Checkpoint error at {path}: {message}")]
    Checkpoint { path: PathBuf, message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parse error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an extraction service error.
    pub fn service(msg: impl Into<String>) -> Self {
        Error::Service(msg.into())
    }

    /// Create a schema error.
    pub fn schema(msg: impl Into<String>) -> Self {
        Error::Schema(msg.into())
    }

    /// Create a checkpoint error for the given artifact path.
    pub fn checkpoint(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Error::Checkpoint {
            path: path.into(),
            message: msg.into(),
        }
    }
}

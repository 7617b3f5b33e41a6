//! Error types for ratingsync-core

use thiserror::Error;

/// Result type alias using ratingsync-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ratingsync-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

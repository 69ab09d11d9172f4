//! Error types for sqldelta

use thiserror::Error;

/// Core error type for sqldelta operations
#[derive(Error, Debug)]
pub enum SqlDeltaError {
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

/// Result type alias for sqldelta operations
pub type Result<T> = std::result::Result<T, SqlDeltaError>;

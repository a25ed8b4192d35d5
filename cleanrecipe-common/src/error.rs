//! Common error types for CleanRecipe

use thiserror::Error;

/// Common result type for CleanRecipe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across CleanRecipe crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding of a persisted blob failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key-value backend rejected a read or write
    #[error("Storage error: {0}")]
    Storage(String),

    /// Store operation attempted before the initial load finished
    #[error("Recipe store is still loading")]
    NotReady,

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

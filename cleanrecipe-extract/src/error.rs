//! Error types for recipe extraction

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Link is not an absolute http(s) URL; rejected before any network call
    #[error("Invalid recipe URL: {0}")]
    InvalidUrl(String),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

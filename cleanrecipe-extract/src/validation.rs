//! Recipe link validation

use crate::{ExtractError, Result};
use reqwest::Url;

/// Parse a user-submitted link, accepting only absolute http/https URLs
pub fn validate_recipe_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| ExtractError::InvalidUrl(format!("{}: {}", trimmed, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ExtractError::InvalidUrl(format!(
            "unsupported protocol '{}', use http:// or https://",
            other
        ))),
    }
}

//! Extraction client contract

use crate::validation::validate_recipe_url;
use crate::Result;
use async_trait::async_trait;
use cleanrecipe_common::ExtractedRecipe;
use reqwest::Url;
use tracing::debug;

/// Turns a validated recipe link into a draft recipe
#[async_trait]
pub trait RecipeExtractor: Send + Sync {
    /// Extractor identifier for logs
    fn source_id(&self) -> &'static str;

    /// Produce a draft for `url`
    ///
    /// # Returns
    /// * `Ok(ExtractedRecipe)` - draft echoing `url` as its source link
    /// * `Err(_)` - extraction failed; callers show a generic retry message
    async fn extract(&self, url: &Url) -> Result<ExtractedRecipe>;
}

/// Validate `raw` and run the extractor on it
///
/// Invalid links fail with [`crate::ExtractError::InvalidUrl`] without any
/// network traffic.
pub async fn extract_recipe_from_url(
    extractor: &dyn RecipeExtractor,
    raw: &str,
) -> Result<ExtractedRecipe> {
    let url = validate_recipe_url(raw)?;
    debug!("Extracting recipe from {} via {}", url, extractor.source_id());
    extractor.extract(&url).await
}

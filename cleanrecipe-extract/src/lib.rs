//! cleanrecipe-extract - recipe drafts from web links
//!
//! Callers validate the submitted link with [`validate_recipe_url`] (or use
//! [`extract_recipe_from_url`], which does it for them) before any network
//! traffic happens. Extractors keep a bounded probe timeout so a slow site
//! never stalls the caller indefinitely.

pub mod error;
pub mod extractor;
pub mod mock;
pub mod validation;

pub use error::{ExtractError, Result};
pub use extractor::{extract_recipe_from_url, RecipeExtractor};
pub use mock::MockRecipeExtractor;
pub use validation::validate_recipe_url;

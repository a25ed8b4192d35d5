//! Recipe data model
//!
//! Persisted JSON uses camelCase field names and omits absent optional fields,
//! so blobs stay readable by earlier clients of the same storage keys.

use crate::labels::{normalize_optional_label, unique_labels};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved recipe
///
/// Never mutated in place by callers; the store replaces whole records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Opaque unique identity, assigned once at creation
    pub id: String,
    pub title: String,
    /// Source link the recipe was extracted from
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Ingredient lines in display order
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Preparation steps in display order (numbered from 1 when shown)
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// De-duplicated tag labels
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    /// Build a new record from a draft, normalizing its labels
    ///
    /// The category override wins over the extracted category; a blank result
    /// leaves the recipe uncategorized. Tags are trimmed and de-duplicated in
    /// order of first occurrence.
    pub fn from_draft(draft: RecipeDraft, id: String, created_at: DateTime<Utc>) -> Self {
        let RecipeDraft {
            recipe,
            category,
            tags,
        } = draft;

        let category = normalize_optional_label(category.or(recipe.category).as_deref());
        let tags = unique_labels(tags.unwrap_or(recipe.tags));

        Self {
            id,
            title: recipe.title,
            url: recipe.url,
            image_url: recipe.image_url,
            ingredients: recipe.ingredients,
            steps: recipe.steps,
            category,
            tags,
            cook_time: recipe.cook_time,
            servings: recipe.servings,
            created_at,
        }
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.category.as_deref() == Some(name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }
}

/// Registered labels, independent of recipe usage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeMetadata {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RecipeMetadata {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.tags.is_empty()
    }
}

/// Recipe content returned by an extraction client, before it has an identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecipe {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
}

/// Input to `add_recipe`: extracted content plus the user's label choices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    pub recipe: ExtractedRecipe,
    /// Replaces the extracted category when set
    pub category: Option<String>,
    /// Replaces the extracted tags when set
    pub tags: Option<Vec<String>>,
}

impl RecipeDraft {
    /// Draft that keeps the extracted category and tags
    pub fn new(recipe: ExtractedRecipe) -> Self {
        Self {
            recipe,
            category: None,
            tags: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

impl From<ExtractedRecipe> for RecipeDraft {
    fn from(recipe: ExtractedRecipe) -> Self {
        Self::new(recipe)
    }
}

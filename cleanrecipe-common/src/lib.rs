//! # CleanRecipe Common Library
//!
//! Shared code for the CleanRecipe crates including:
//! - Recipe data model and metadata registry types
//! - Label normalization helpers
//! - Store events (StoreEvent enum) and EventBus
//! - Bootstrap configuration and logging setup
//! - Timestamp and identity utilities

pub mod config;
pub mod error;
pub mod events;
pub mod labels;
pub mod models;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use models::{ExtractedRecipe, Recipe, RecipeDraft, RecipeMetadata};

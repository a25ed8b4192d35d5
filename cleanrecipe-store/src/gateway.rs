//! Persistence gateway
//!
//! Loads are fail-soft: missing or malformed data yields empty defaults and a
//! warning, never an error. Loaded labels are trimmed, emptied entries dropped
//! and duplicates collapsed, so stored data compares like fresh input. Saves serialize the entire blob and propagate any
//! backend failure to the caller.

use crate::kv::{KeyValueStore, StorageKeys};
use async_trait::async_trait;
use cleanrecipe_common::labels::{normalize_optional_label, unique_labels};
use cleanrecipe_common::{Recipe, RecipeMetadata, Result};
use serde_json::Value;
use tracing::{debug, warn};

/// Durable load/save of the recipe collection and the label registry
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Stored recipes, or an empty list when absent or unreadable
    async fn load_recipes(&self) -> Vec<Recipe>;

    /// Replace the stored collection
    async fn save_recipes(&self, recipes: &[Recipe]) -> Result<()>;

    /// Stored registry; each field falls back to empty independently
    async fn load_metadata(&self) -> RecipeMetadata;

    /// Replace the stored registry
    async fn save_metadata(&self, metadata: &RecipeMetadata) -> Result<()>;
}

/// Gateway over any [`KeyValueStore`], storing JSON under namespaced keys
#[derive(Debug)]
pub struct KeyValueGateway<K> {
    kv: K,
    keys: StorageKeys,
}

impl<K: KeyValueStore> KeyValueGateway<K> {
    /// Gateway using the default `cleanrecipe:` key namespace
    pub fn new(kv: K) -> Self {
        Self::with_keys(kv, StorageKeys::default())
    }

    pub fn with_keys(kv: K, keys: StorageKeys) -> Self {
        Self { kv, keys }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn backend(&self) -> &K {
        &self.kv
    }

    /// Raw stored JSON for `key`, `None` when absent, blank or unreadable
    async fn read_json(&self, key: &str) -> Option<Value> {
        let raw = match self.kv.get(key).await {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => {
                debug!("No stored value under {}", key);
                return None;
            }
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding malformed JSON under {}: {}", key, e);
                None
            }
        }
    }
}

/// Decode an array of recipes, skipping records that don't parse
fn decode_recipes(key: &str, value: Value) -> Vec<Recipe> {
    let Value::Array(items) = value else {
        warn!("Stored value under {} is not an array, ignoring it", key);
        return Vec::new();
    };

    let total = items.len();
    let recipes: Vec<Recipe> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(recipe) => Some(normalize_recipe_labels(recipe)),
            Err(e) => {
                warn!("Skipping malformed recipe #{} under {}: {}", index, key, e);
                None
            }
        })
        .collect();

    if recipes.len() != total {
        warn!("Recovered {} of {} stored recipes", recipes.len(), total);
    }
    recipes
}

fn normalize_recipe_labels(mut recipe: Recipe) -> Recipe {
    recipe.category = normalize_optional_label(recipe.category.as_deref());
    recipe.tags = unique_labels(&recipe.tags);
    recipe
}

/// Normalized string entries of `field` if it is an array, otherwise nothing
fn decode_label_field(object: &serde_json::Map<String, Value>, field: &str) -> Vec<String> {
    match object.get(field) {
        Some(Value::Array(items)) => unique_labels(items.iter().filter_map(Value::as_str)),
        Some(_) => {
            warn!("Metadata field '{}' is not an array, resetting it", field);
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn decode_metadata(key: &str, value: Value) -> RecipeMetadata {
    let Value::Object(object) = value else {
        warn!("Stored value under {} is not an object, ignoring it", key);
        return RecipeMetadata::default();
    };

    RecipeMetadata {
        categories: decode_label_field(&object, "categories"),
        tags: decode_label_field(&object, "tags"),
    }
}

#[async_trait]
impl<K: KeyValueStore> PersistenceGateway for KeyValueGateway<K> {
    async fn load_recipes(&self) -> Vec<Recipe> {
        let key = self.keys.recipes();
        match self.read_json(key).await {
            Some(value) => decode_recipes(key, value),
            None => Vec::new(),
        }
    }

    async fn save_recipes(&self, recipes: &[Recipe]) -> Result<()> {
        let json = serde_json::to_string(recipes)?;
        self.kv.set(self.keys.recipes(), &json).await?;
        debug!("Saved {} recipes", recipes.len());
        Ok(())
    }

    async fn load_metadata(&self) -> RecipeMetadata {
        let key = self.keys.metadata();
        match self.read_json(key).await {
            Some(value) => decode_metadata(key, value),
            None => RecipeMetadata::default(),
        }
    }

    async fn save_metadata(&self, metadata: &RecipeMetadata) -> Result<()> {
        let json = serde_json::to_string(metadata)?;
        self.kv.set(self.keys.metadata(), &json).await?;
        debug!(
            "Saved metadata ({} categories, {} tags)",
            metadata.categories.len(),
            metadata.tags.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKeyValueStore;
    use chrono::{TimeZone, Utc};

    fn sample_recipe(id: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            title: "Żurek".to_string(),
            url: "https://example.com/zurek".to_string(),
            image_url: Some("https://example.com/zurek.jpg".to_string()),
            ingredients: vec!["zakwas".to_string(), "kiełbasa".to_string()],
            steps: vec!["Zagotuj".to_string(), "Dodaj zakwas".to_string()],
            category: Some("Zupy".to_string()),
            tags: vec!["polskie".to_string()],
            cook_time: Some("45 min".to_string()),
            servings: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    fn gateway_with(entries: Vec<(&str, &str)>) -> KeyValueGateway<MemoryKeyValueStore> {
        KeyValueGateway::new(MemoryKeyValueStore::with_entries(entries))
    }

    #[tokio::test]
    async fn test_recipes_round_trip_field_for_field() {
        let gateway = KeyValueGateway::new(MemoryKeyValueStore::new());
        let recipes = vec![sample_recipe("b"), sample_recipe("a")];

        gateway.save_recipes(&recipes).await.unwrap();
        assert_eq!(gateway.load_recipes().await, recipes);
    }

    #[tokio::test]
    async fn test_metadata_round_trip() {
        let gateway = KeyValueGateway::new(MemoryKeyValueStore::new());
        let metadata = RecipeMetadata {
            categories: vec!["Obiad".to_string(), "Deser".to_string()],
            tags: vec!["quick".to_string()],
        };

        gateway.save_metadata(&metadata).await.unwrap();
        assert_eq!(gateway.load_metadata().await, metadata);
    }

    #[tokio::test]
    async fn test_missing_keys_yield_empty_defaults() {
        let gateway = KeyValueGateway::new(MemoryKeyValueStore::new());
        assert!(gateway.load_recipes().await.is_empty());
        assert!(gateway.load_metadata().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_yields_empty_defaults() {
        let gateway = gateway_with(vec![
            ("cleanrecipe:recipes", "{not json"),
            ("cleanrecipe:metadata", "[[["),
        ]);
        assert!(gateway.load_recipes().await.is_empty());
        assert_eq!(gateway.load_metadata().await, RecipeMetadata::default());
    }

    #[tokio::test]
    async fn test_non_array_recipes_yield_empty() {
        let gateway = gateway_with(vec![("cleanrecipe:recipes", r#"{"id":"x"}"#)]);
        assert!(gateway.load_recipes().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_recipe_records_are_skipped() {
        let good = serde_json::to_value(sample_recipe("keep")).unwrap();
        let raw = serde_json::json!([good, {"title": "no id"}, 42]).to_string();
        let gateway = gateway_with(vec![("cleanrecipe:recipes", raw.as_str())]);

        let recipes = gateway.load_recipes().await;
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].id, "keep");
    }

    #[tokio::test]
    async fn test_metadata_partial_recovery() {
        let gateway = gateway_with(vec![(
            "cleanrecipe:metadata",
            r#"{"categories": "oops", "tags": ["quick", 7, "vege"]}"#,
        )]);

        let metadata = gateway.load_metadata().await;
        assert!(metadata.categories.is_empty());
        assert_eq!(metadata.tags, vec!["quick", "vege"]);
    }

    #[tokio::test]
    async fn test_loaded_labels_are_trimmed_and_deduplicated() {
        let mut stored = serde_json::to_value(sample_recipe("padded")).unwrap();
        stored["category"] = serde_json::json!(" Dinner ");
        stored["tags"] = serde_json::json!(["quick ", "quick", "  "]);
        let raw = serde_json::json!([stored]).to_string();
        let gateway = gateway_with(vec![
            ("cleanrecipe:recipes", raw.as_str()),
            (
                "cleanrecipe:metadata",
                r#"{"categories": [" Lunch ", "", "Lunch"], "tags": ["quick "]}"#,
            ),
        ]);

        let recipes = gateway.load_recipes().await;
        assert_eq!(recipes[0].category.as_deref(), Some("Dinner"));
        assert_eq!(recipes[0].tags, vec!["quick"]);

        let metadata = gateway.load_metadata().await;
        assert_eq!(metadata.categories, vec!["Lunch"]);
        assert_eq!(metadata.tags, vec!["quick"]);
    }

    #[tokio::test]
    async fn test_blank_stored_category_loads_as_none() {
        let mut stored = serde_json::to_value(sample_recipe("blank")).unwrap();
        stored["category"] = serde_json::json!("   ");
        let raw = serde_json::json!([stored]).to_string();
        let gateway = gateway_with(vec![("cleanrecipe:recipes", raw.as_str())]);

        assert_eq!(gateway.load_recipes().await[0].category, None);
    }

    #[tokio::test]
    async fn test_custom_key_prefix_does_not_collide() {
        let kv = std::sync::Arc::new(MemoryKeyValueStore::new());
        let a = KeyValueGateway::with_keys(kv.clone(), StorageKeys::new("a"));
        let b = KeyValueGateway::with_keys(kv.clone(), StorageKeys::new("b"));

        a.save_recipes(&[sample_recipe("only-a")]).await.unwrap();
        assert_eq!(a.load_recipes().await.len(), 1);
        assert!(b.load_recipes().await.is_empty());
    }
}

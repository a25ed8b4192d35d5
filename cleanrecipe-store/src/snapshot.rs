//! Read views over store state
//!
//! A snapshot is immutable; the store swaps in a new one after every
//! mutation. Effective label lists are derived on demand and never stored.

use cleanrecipe_common::labels::unique_labels;
use cleanrecipe_common::{Recipe, RecipeMetadata};
use serde::Serialize;

/// Store lifecycle
///
/// `Loading` until the initial load completes, then `Ready` for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LifecycleState {
    Loading,
    Ready,
}

/// How many recipes currently carry a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelUsage {
    pub name: String,
    pub count: usize,
}

/// Point-in-time view of the recipe collection and label registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub(crate) lifecycle: LifecycleState,
    pub(crate) recipes: Vec<Recipe>,
    pub(crate) metadata: RecipeMetadata,
}

impl StoreSnapshot {
    pub(crate) fn loading() -> Self {
        Self {
            lifecycle: LifecycleState::Loading,
            recipes: Vec::new(),
            metadata: RecipeMetadata::default(),
        }
    }

    pub(crate) fn ready(recipes: Vec<Recipe>, metadata: RecipeMetadata) -> Self {
        Self {
            lifecycle: LifecycleState::Ready,
            recipes,
            metadata,
        }
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.lifecycle
    }

    pub fn is_loading(&self) -> bool {
        self.lifecycle == LifecycleState::Loading
    }

    /// Saved recipes, newest first
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Explicitly registered labels only
    pub fn metadata(&self) -> &RecipeMetadata {
        &self.metadata
    }

    /// Registered categories followed by categories in use, de-duplicated
    pub fn effective_categories(&self) -> Vec<String> {
        let used = self.recipes.iter().filter_map(|r| r.category.as_deref());
        unique_labels(
            self.metadata
                .categories
                .iter()
                .map(String::as_str)
                .chain(used),
        )
    }

    /// Registered tags followed by tags in use, de-duplicated
    pub fn effective_tags(&self) -> Vec<String> {
        let used = self.recipes.iter().flat_map(|r| r.tags.iter());
        unique_labels(self.metadata.tags.iter().chain(used))
    }

    /// Look up a recipe by identity
    pub fn get_recipe_by_id(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn recipes_in_category<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Recipe> + 'a {
        self.recipes.iter().filter(move |r| r.has_category(name))
    }

    pub fn recipes_with_tag<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Recipe> + 'a {
        self.recipes.iter().filter(move |r| r.has_tag(name))
    }

    /// Usage count for every effective category, zero for unused registered ones
    pub fn category_usage(&self) -> Vec<LabelUsage> {
        self.effective_categories()
            .into_iter()
            .map(|name| {
                let count = self.recipes_in_category(&name).count();
                LabelUsage { name, count }
            })
            .collect()
    }

    /// Usage count for every effective tag, zero for unused registered ones
    pub fn tag_usage(&self) -> Vec<LabelUsage> {
        self.effective_tags()
            .into_iter()
            .map(|name| {
                let count = self.recipes_with_tag(&name).count();
                LabelUsage { name, count }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn recipe(id: &str, category: Option<&str>, tags: &[&str]) -> Recipe {
        Recipe {
            id: id.to_string(),
            title: id.to_string(),
            url: format!("https://example.com/{}", id),
            image_url: None,
            ingredients: Vec::new(),
            steps: Vec::new(),
            category: category.map(str::to_string),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            cook_time: None,
            servings: None,
            created_at: Utc::now(),
        }
    }

    fn snapshot() -> StoreSnapshot {
        StoreSnapshot::ready(
            vec![
                recipe("1", Some("Obiad"), &["quick", "it"]),
                recipe("2", Some("Deser"), &["quick"]),
                recipe("3", None, &[]),
            ],
            RecipeMetadata {
                categories: vec!["Śniadanie".to_string(), "Obiad".to_string()],
                tags: vec!["vege".to_string()],
            },
        )
    }

    #[test]
    fn test_effective_categories_registered_first_then_used() {
        assert_eq!(
            snapshot().effective_categories(),
            vec!["Śniadanie", "Obiad", "Deser"]
        );
    }

    #[test]
    fn test_effective_tags_registered_first_then_used() {
        assert_eq!(snapshot().effective_tags(), vec!["vege", "quick", "it"]);
    }

    #[test]
    fn test_effective_lists_are_supersets() {
        let snap = snapshot();
        let categories = snap.effective_categories();
        let tags = snap.effective_tags();

        for c in &snap.metadata().categories {
            assert!(categories.contains(c));
        }
        for t in &snap.metadata().tags {
            assert!(tags.contains(t));
        }
        for r in snap.recipes() {
            if let Some(c) = &r.category {
                assert!(categories.contains(c));
            }
            for t in &r.tags {
                assert!(tags.contains(t));
            }
        }
    }

    #[test]
    fn test_get_recipe_by_id() {
        let snap = snapshot();
        assert_eq!(snap.get_recipe_by_id("2").map(|r| r.title.as_str()), Some("2"));
        assert!(snap.get_recipe_by_id("nonexistent").is_none());
    }

    #[test]
    fn test_usage_counts_include_unused_registered_labels() {
        let snap = snapshot();
        assert_eq!(
            snap.category_usage(),
            vec![
                LabelUsage { name: "Śniadanie".to_string(), count: 0 },
                LabelUsage { name: "Obiad".to_string(), count: 1 },
                LabelUsage { name: "Deser".to_string(), count: 1 },
            ]
        );
        let quick = snap.tag_usage().into_iter().find(|u| u.name == "quick").unwrap();
        assert_eq!(quick.count, 2);
    }

    #[test]
    fn test_filters() {
        let snap = snapshot();
        assert_eq!(snap.recipes_with_tag("quick").count(), 2);
        assert_eq!(snap.recipes_in_category("Deser").count(), 1);
        assert_eq!(snap.recipes_in_category("Missing").count(), 0);
    }

    #[test]
    fn test_loading_snapshot_is_empty() {
        let snap = StoreSnapshot::loading();
        assert!(snap.is_loading());
        assert!(snap.recipes().is_empty());
        assert!(snap.effective_tags().is_empty());
    }
}

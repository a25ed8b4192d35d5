//! Recipe store
//!
//! Single authoritative holder of saved recipes and the label registry.
//!
//! Every mutation runs under one async gate, so read-modify-write cycles never
//! interleave. A mutation computes the complete next state, publishes it in
//! memory, then writes the affected blobs. If a write fails the caller gets
//! the error and in-memory state keeps the attempted update; durability is
//! only guaranteed for calls that return `Ok`.
//!
//! Recipes and metadata live under separate keys with no multi-key
//! transaction. A failure between the two writes can leave the registry
//! stale relative to the recipes; effective label lists stay correct because
//! recipe-derived labels are recomputed from the recipes themselves.

use crate::gateway::PersistenceGateway;
use crate::snapshot::{LifecycleState, StoreSnapshot};
use cleanrecipe_common::events::{EventBus, StoreEvent};
use cleanrecipe_common::labels::{normalize_label, unique_labels};
use cleanrecipe_common::{time, uuid_utils, Error, Recipe, RecipeDraft, RecipeMetadata, Result};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, error, info, warn};

/// Shared recipe store, injected into whatever presents it
pub struct RecipeStore {
    gateway: Arc<dyn PersistenceGateway>,
    events: EventBus,
    state: RwLock<Arc<StoreSnapshot>>,
    mutation_gate: Mutex<()>,
}

impl RecipeStore {
    /// Create a store in the `Loading` state; call [`initialize`](Self::initialize) next
    pub fn new(gateway: Arc<dyn PersistenceGateway>, events: EventBus) -> Self {
        Self {
            gateway,
            events,
            state: RwLock::new(Arc::new(StoreSnapshot::loading())),
            mutation_gate: Mutex::new(()),
        }
    }

    /// Create a store and wait for its initial load
    pub async fn open(gateway: Arc<dyn PersistenceGateway>, events: EventBus) -> Self {
        let store = Self::new(gateway, events);
        store.initialize().await;
        store
    }

    /// Load both persisted blobs concurrently and switch to `Ready`
    ///
    /// Loads never fail (corrupt data degrades to empty defaults). Runs once;
    /// later calls return immediately.
    pub async fn initialize(&self) {
        let _gate = self.mutation_gate.lock().await;

        if !self.state.read().await.is_loading() {
            debug!("Recipe store already initialized");
            return;
        }

        let (recipes, metadata) = tokio::join!(
            self.gateway.load_recipes(),
            self.gateway.load_metadata()
        );

        info!(
            "Recipe store ready: {} recipes, {} categories, {} tags registered",
            recipes.len(),
            metadata.categories.len(),
            metadata.tags.len()
        );

        let recipe_count = recipes.len();
        self.publish(StoreSnapshot::ready(recipes, metadata)).await;
        self.events.emit_lossy(StoreEvent::Loaded {
            recipe_count,
            timestamp: time::now(),
        });
    }

    // ------------------------------------------------------------------
    // Reads (never touch persistence)
    // ------------------------------------------------------------------

    /// Current immutable state
    pub async fn snapshot(&self) -> Arc<StoreSnapshot> {
        self.state.read().await.clone()
    }

    pub async fn lifecycle(&self) -> LifecycleState {
        self.state.read().await.lifecycle()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading()
    }

    /// Saved recipes, newest first
    pub async fn recipes(&self) -> Vec<Recipe> {
        self.state.read().await.recipes().to_vec()
    }

    /// Registered labels only
    pub async fn metadata(&self) -> RecipeMetadata {
        self.state.read().await.metadata().clone()
    }

    /// Effective categories (registered + in use)
    pub async fn categories(&self) -> Vec<String> {
        self.state.read().await.effective_categories()
    }

    /// Effective tags (registered + in use)
    pub async fn tags(&self) -> Vec<String> {
        self.state.read().await.effective_tags()
    }

    /// Look up a recipe; `None` is a normal outcome, not an error
    pub async fn get_recipe_by_id(&self, id: &str) -> Option<Recipe> {
        self.state.read().await.get_recipe_by_id(id).cloned()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Save a new recipe at the front of the collection
    ///
    /// Writes the recipe collection first, then the metadata registry with
    /// the recipe's category and tags merged in.
    pub async fn add_recipe(&self, draft: RecipeDraft) -> Result<Recipe> {
        let _gate = self.mutation_gate.lock().await;
        let current = self.ready_snapshot().await?;

        let id = fresh_id(&current);
        let recipe = Recipe::from_draft(draft, id, time::now());

        let mut recipes = Vec::with_capacity(current.recipes.len() + 1);
        recipes.push(recipe.clone());
        recipes.extend(current.recipes.iter().cloned());

        let metadata = RecipeMetadata {
            categories: unique_labels(current.metadata.categories.iter().chain(recipe.category.iter())),
            tags: unique_labels(current.metadata.tags.iter().chain(recipe.tags.iter())),
        };

        let next = StoreSnapshot::ready(recipes, metadata);
        self.publish(next.clone()).await;

        if let Err(e) = self.gateway.save_recipes(&next.recipes).await {
            return Err(self.persistence_failed("add_recipe", e));
        }
        if let Err(e) = self.gateway.save_metadata(&next.metadata).await {
            warn!(
                "Recipe {} saved but metadata registry was not updated",
                recipe.id
            );
            return Err(self.persistence_failed("add_recipe", e));
        }

        debug!("Added recipe {} ({})", recipe.id, recipe.title);
        self.events.emit_lossy(StoreEvent::RecipeAdded {
            recipe_id: recipe.id.clone(),
            timestamp: time::now(),
        });
        Ok(recipe)
    }

    /// Register a category; blank names and existing names are no-ops
    pub async fn add_category(&self, name: &str) -> Result<()> {
        let name = normalize_label(name);
        if name.is_empty() {
            return Ok(());
        }

        let _gate = self.mutation_gate.lock().await;
        let current = self.ready_snapshot().await?;

        if current.metadata.categories.contains(&name) {
            debug!("Category '{}' already registered", name);
            return Ok(());
        }

        let mut metadata = current.metadata.clone();
        metadata.categories.push(name.clone());
        self.commit_metadata("add_category", &current, metadata).await?;

        self.events.emit_lossy(StoreEvent::CategoryAdded {
            name,
            timestamp: time::now(),
        });
        Ok(())
    }

    /// Unregister a category and clear it from every recipe using it
    pub async fn remove_category(&self, name: &str) -> Result<()> {
        let name = normalize_label(name);

        let _gate = self.mutation_gate.lock().await;
        let current = self.ready_snapshot().await?;

        let mut metadata = current.metadata.clone();
        metadata.categories.retain(|c| *c != name);

        let mut affected = 0;
        let recipes: Vec<Recipe> = current
            .recipes
            .iter()
            .map(|r| {
                if r.has_category(&name) {
                    affected += 1;
                    Recipe {
                        category: None,
                        ..r.clone()
                    }
                } else {
                    r.clone()
                }
            })
            .collect();

        if affected == 0 && metadata == current.metadata {
            debug!("Category '{}' not registered or used, nothing to remove", name);
            return Ok(());
        }

        self.commit_both("remove_category", StoreSnapshot::ready(recipes, metadata))
            .await?;

        debug!("Removed category '{}' from {} recipes", name, affected);
        self.events.emit_lossy(StoreEvent::CategoryRemoved {
            name,
            affected_recipes: affected,
            timestamp: time::now(),
        });
        Ok(())
    }

    /// Register a tag; blank names and existing names are no-ops
    pub async fn add_tag(&self, name: &str) -> Result<()> {
        let name = normalize_label(name);
        if name.is_empty() {
            return Ok(());
        }

        let _gate = self.mutation_gate.lock().await;
        let current = self.ready_snapshot().await?;

        if current.metadata.tags.contains(&name) {
            debug!("Tag '{}' already registered", name);
            return Ok(());
        }

        let mut metadata = current.metadata.clone();
        metadata.tags.push(name.clone());
        self.commit_metadata("add_tag", &current, metadata).await?;

        self.events.emit_lossy(StoreEvent::TagAdded {
            name,
            timestamp: time::now(),
        });
        Ok(())
    }

    /// Unregister a tag and strip it from every recipe's tag set
    pub async fn remove_tag(&self, name: &str) -> Result<()> {
        let name = normalize_label(name);

        let _gate = self.mutation_gate.lock().await;
        let current = self.ready_snapshot().await?;

        let mut metadata = current.metadata.clone();
        metadata.tags.retain(|t| *t != name);

        let mut affected = 0;
        let recipes: Vec<Recipe> = current
            .recipes
            .iter()
            .map(|r| {
                if r.has_tag(&name) {
                    affected += 1;
                    Recipe {
                        tags: r.tags.iter().filter(|t| **t != name).cloned().collect(),
                        ..r.clone()
                    }
                } else {
                    r.clone()
                }
            })
            .collect();

        if affected == 0 && metadata == current.metadata {
            debug!("Tag '{}' not registered or used, nothing to remove", name);
            return Ok(());
        }

        self.commit_both("remove_tag", StoreSnapshot::ready(recipes, metadata))
            .await?;

        debug!("Removed tag '{}' from {} recipes", name, affected);
        self.events.emit_lossy(StoreEvent::TagRemoved {
            name,
            affected_recipes: affected,
            timestamp: time::now(),
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn ready_snapshot(&self) -> Result<Arc<StoreSnapshot>> {
        let snapshot = self.snapshot().await;
        if snapshot.is_loading() {
            return Err(Error::NotReady);
        }
        Ok(snapshot)
    }

    async fn publish(&self, next: StoreSnapshot) {
        *self.state.write().await = Arc::new(next);
    }

    async fn commit_metadata(
        &self,
        operation: &str,
        current: &StoreSnapshot,
        metadata: RecipeMetadata,
    ) -> Result<()> {
        let next = StoreSnapshot::ready(current.recipes.clone(), metadata);
        self.publish(next.clone()).await;

        self.gateway
            .save_metadata(&next.metadata)
            .await
            .map_err(|e| self.persistence_failed(operation, e))
    }

    /// Write both blobs concurrently; the first failure wins
    async fn commit_both(&self, operation: &str, next: StoreSnapshot) -> Result<()> {
        self.publish(next.clone()).await;

        let (metadata_result, recipes_result) = tokio::join!(
            self.gateway.save_metadata(&next.metadata),
            self.gateway.save_recipes(&next.recipes)
        );

        match (metadata_result, recipes_result) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(e), Ok(())) => {
                warn!("{}: recipes saved but metadata write failed", operation);
                Err(self.persistence_failed(operation, e))
            }
            (Ok(()), Err(e)) => {
                warn!("{}: metadata saved but recipes write failed", operation);
                Err(self.persistence_failed(operation, e))
            }
            (Err(e), Err(other)) => {
                error!("{}: recipes write also failed: {}", operation, other);
                Err(self.persistence_failed(operation, e))
            }
        }
    }

    fn persistence_failed(&self, operation: &str, e: Error) -> Error {
        error!("{} failed to persist: {}", operation, e);
        self.events.emit_lossy(StoreEvent::PersistenceFailed {
            operation: operation.to_string(),
            message: e.to_string(),
            timestamp: time::now(),
        });
        e
    }
}

/// New identity not used by any recipe in `snapshot`
fn fresh_id(snapshot: &StoreSnapshot) -> String {
    loop {
        let id = uuid_utils::new_recipe_id();
        if snapshot.get_recipe_by_id(&id).is_none() {
            return id;
        }
    }
}

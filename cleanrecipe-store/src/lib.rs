//! cleanrecipe-store - saved recipe collection and label registry
//!
//! Layers, leaf first:
//! - [`kv`]: opaque get/set-by-key primitive (memory and SQLite backends)
//! - [`gateway`]: fail-soft load / full-blob save of recipes and metadata
//! - [`store`]: the authoritative in-memory state with serialized mutations
//! - [`snapshot`]: immutable read views with derived label lists

pub mod gateway;
pub mod kv;
pub mod snapshot;
pub mod store;

pub use gateway::{KeyValueGateway, PersistenceGateway};
pub use kv::{KeyValueStore, MemoryKeyValueStore, StorageKeys};
#[cfg(feature = "sqlite")]
pub use kv::sqlite::SqliteKeyValueStore;
pub use snapshot::{LabelUsage, LifecycleState, StoreSnapshot};
pub use store::RecipeStore;

//! Key-value persistence primitive
//!
//! The store treats storage as opaque string values addressed by key. Each
//! save replaces the whole value; there are no partial updates.

use async_trait::async_trait;
use cleanrecipe_common::config::DEFAULT_KEY_PREFIX;
use cleanrecipe_common::Result;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Get/set-by-key backend
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing was ever written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Namespaced storage keys for the two persisted blobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    recipes: String,
    metadata: String,
}

impl StorageKeys {
    pub fn new(prefix: &str) -> Self {
        Self {
            recipes: format!("{}:recipes", prefix),
            metadata: format!("{}:metadata", prefix),
        }
    }

    pub fn recipes(&self) -> &str {
        &self.recipes
    }

    pub fn metadata(&self) -> &str {
        &self.metadata
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}

/// In-process backend, contents are lost on drop
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with raw values, e.g. to simulate existing data
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }
}

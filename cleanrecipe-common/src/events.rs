//! Event types for the recipe store
//!
//! Provides StoreEvent definitions and the EventBus the store publishes on.
//! Presentation layers subscribe to learn when to re-read store state.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Store event types
///
/// Events carry identities and labels only; subscribers read the current
/// state from the store itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoreEvent {
    /// Initial load finished, store is ready for mutations
    Loaded {
        recipe_count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A recipe was created and prepended to the collection
    RecipeAdded {
        recipe_id: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A category was registered
    CategoryAdded {
        name: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A category was unregistered and cleared from recipes using it
    CategoryRemoved {
        name: String,
        /// Number of recipes that lost the category
        affected_recipes: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A tag was registered
    TagAdded {
        name: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A tag was unregistered and stripped from every recipe
    TagRemoved {
        name: String,
        affected_recipes: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A mutation was applied in memory but could not be written
    ///
    /// In-memory state reflects the attempted update, not what is on disk.
    PersistenceFailed {
        operation: String,
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl StoreEvent {
    /// Event type name as serialized in the `type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            StoreEvent::Loaded { .. } => "Loaded",
            StoreEvent::RecipeAdded { .. } => "RecipeAdded",
            StoreEvent::CategoryAdded { .. } => "CategoryAdded",
            StoreEvent::CategoryRemoved { .. } => "CategoryRemoved",
            StoreEvent::TagAdded { .. } => "TagAdded",
            StoreEvent::TagRemoved { .. } => "TagRemoved",
            StoreEvent::PersistenceFailed { .. } => "PersistenceFailed",
        }
    }
}

/// Default channel capacity for the store event bus
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Central event distribution bus
///
/// The EventBus uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block the store)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use cleanrecipe_common::events::{EventBus, StoreEvent};
/// use std::sync::Arc;
///
/// let event_bus = Arc::new(EventBus::new(100));
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit(StoreEvent::TagAdded {
///     name: "quick".to_string(),
///     timestamp: chrono::Utc::now(),
/// }).ok();
///
/// assert_eq!(rx.try_recv().unwrap().event_type(), "TagAdded");
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StoreEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// `capacity` is the number of events buffered before the oldest are
    /// dropped for lagging subscribers. Zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: StoreEvent,
    ) -> Result<usize, broadcast::error::SendError<StoreEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: StoreEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

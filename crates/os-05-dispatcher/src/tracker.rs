use serde_json::Value;
use shared_bus::{BroadcastError, Emitter, Topic};
use tracing::{debug, info};

/// An accepted order or stream message waiting for its block to commit.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedItem {
    pub topic: Topic,
    pub id: String,
    pub poster: String,
    pub payload: Value,
}

impl TrackedItem {
    /// The message delivered to subscribers.
    pub fn to_message(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "poster": self.poster,
            "data": self.payload,
        })
    }
}

/// Per-block buffer of accepted items, flushed at commit.
#[derive(Debug, Default)]
pub struct OrderTracker {
    items: Vec<TrackedItem>,
}

impl OrderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: TrackedItem) {
        debug!(topic = %item.topic, id = %item.id, "Tracked for broadcast");
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[TrackedItem] {
        &self.items
    }

    /// Emit every buffered item in insertion order and empty the buffer.
    ///
    /// The buffer is taken before emission. If an emission fails the
    /// remaining items are dropped with it and the error is returned.
    pub fn trigger_broadcast(&mut self, emitter: &dyn Emitter) -> Result<usize, BroadcastError> {
        let items = std::mem::take(&mut self.items);
        if items.is_empty() {
            return Ok(0);
        }

        let count = items.len();
        for item in items {
            emitter.emit(item.topic, &item.to_message())?;
        }

        info!(count, "Block orders broadcast");
        Ok(count)
    }
}

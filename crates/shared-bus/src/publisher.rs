//! # Order Publisher
//!
//! The emitting side of the bus.

use crate::events::{BroadcastEvent, Topic, TopicFilter};
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Fatal emission failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    /// A subscriber's queue is full; delivering would mean dropping orders.
    #[error("Subscriber {subscriber} lagging: queue of {capacity} events is full")]
    SubscriberLagging {
        /// Subscriber id.
        subscriber: u64,
        /// Queue capacity.
        capacity: usize,
    },

    /// The subscriber registry lock was poisoned.
    #[error("Subscriber registry poisoned")]
    LockPoisoned,
}

/// Emission port used by the commit hook.
pub trait Emitter: Send + Sync {
    /// Emit one item on a topic.
    ///
    /// # Returns
    ///
    /// The number of subscribers the item was queued for.
    fn emit(&self, topic: Topic, payload: &Value) -> Result<usize, BroadcastError>;
}

struct SubscriberSlot {
    id: u64,
    filter: TopicFilter,
    sender: mpsc::Sender<BroadcastEvent>,
}

/// In-process broadcast bus with one bounded queue per subscriber.
pub struct OrderBus {
    /// Registered subscribers.
    subscribers: RwLock<Vec<SubscriberSlot>>,

    /// Per-subscriber queue capacity.
    capacity: usize,

    /// Next subscriber id.
    next_id: AtomicU64,

    /// Total items emitted (sequence counter).
    events_emitted: AtomicU64,
}

impl OrderBus {
    /// Create a new bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new bus with the given per-subscriber capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            capacity: capacity.max(1),
            next_id: AtomicU64::new(1),
            events_emitted: AtomicU64::new(0),
        }
    }

    /// Subscribe to events matching a filter.
    pub fn subscribe(&self, filter: TopicFilter) -> Result<Subscription, BroadcastError> {
        let (sender, receiver) = mpsc::channel(self.capacity);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let mut subscribers = self
            .subscribers
            .write()
            .map_err(|_| BroadcastError::LockPoisoned)?;
        subscribers.push(SubscriberSlot {
            id,
            filter: filter.clone(),
            sender,
        });

        debug!(subscriber = id, topics = ?filter.topics, "New subscription created");
        Ok(Subscription::new(id, receiver, filter))
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .map(|subs| subs.iter().filter(|s| !s.sender.is_closed()).count())
            .unwrap_or(0)
    }

    /// Per-subscriber capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total items emitted.
    #[must_use]
    pub fn events_emitted(&self) -> u64 {
        self.events_emitted.load(Ordering::Relaxed)
    }
}

impl Default for OrderBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter for OrderBus {
    fn emit(&self, topic: Topic, payload: &Value) -> Result<usize, BroadcastError> {
        let mut subscribers = self
            .subscribers
            .write()
            .map_err(|_| BroadcastError::LockPoisoned)?;

        let sequence = self.events_emitted.fetch_add(1, Ordering::Relaxed) + 1;
        let event = BroadcastEvent {
            topic,
            sequence,
            payload: payload.clone(),
        };

        let mut delivered = 0;
        let mut closed = Vec::new();
        for slot in subscribers.iter().filter(|s| s.filter.matches(topic)) {
            match slot.sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Closed(_)) => closed.push(slot.id),
                Err(TrySendError::Full(_)) => {
                    warn!(subscriber = slot.id, %topic, sequence, "Subscriber queue full");
                    return Err(BroadcastError::SubscriberLagging {
                        subscriber: slot.id,
                        capacity: self.capacity,
                    });
                }
            }
        }

        if !closed.is_empty() {
            subscribers.retain(|s| !closed.contains(&s.id));
            debug!(pruned = closed.len(), "Closed subscriptions pruned");
        }

        debug!(%topic, sequence, receivers = delivered, "Event emitted");
        Ok(delivered)
    }
}

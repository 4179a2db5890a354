//! # Broadcast Events
//!
//! Topics and the event record handed to subscribers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Broadcast topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    /// Accepted orders.
    Order,
    /// Accepted stream messages.
    Stream,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Stream => "stream",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One emitted item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastEvent {
    /// Topic the item was emitted on.
    pub topic: Topic,
    /// Bus-wide emission sequence number, starting at 1.
    pub sequence: u64,
    /// Item body.
    pub payload: Value,
}

/// Topic filter for subscriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<Topic>,
}

impl TopicFilter {
    /// Create a filter that accepts all topics.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    /// Check if a topic passes this filter.
    #[must_use]
    pub fn matches(&self, topic: Topic) -> bool {
        self.topics.is_empty() || self.topics.contains(&topic)
    }
}

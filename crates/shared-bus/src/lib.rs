//! # Shared Bus - Order Broadcast
//!
//! Delivers accepted orders and stream messages to external listeners once the
//! block that contains them commits.
//!
//! ## Delivery Rules
//!
//! - Subscribers register a topic filter before block processing begins and
//!   receive events over their own bounded channel.
//! - Events reach each subscriber in emission order, at most once.
//! - A subscriber that dropped its receiver is pruned silently.
//! - A subscriber whose queue is full fails the emission: the commit hook
//!   treats that as fatal rather than silently losing orders.
//!
//! ```text
//! commit() ──trigger_broadcast()──→ OrderBus ──emit()──→ [sub A] [sub B] ...
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{BroadcastEvent, Topic, TopicFilter};
pub use publisher::{BroadcastError, Emitter, OrderBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events queued per subscriber before emission fails.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

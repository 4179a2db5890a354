//! # Order Subscriber
//!
//! The receiving side of the bus.

use crate::events::{BroadcastEvent, TopicFilter};
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The bus was dropped.
    #[error("Order bus closed")]
    Closed,
}

/// A subscription handle for receiving events.
///
/// Dropping it closes the queue; the bus prunes it on the next emission.
pub struct Subscription {
    id: u64,
    receiver: mpsc::Receiver<BroadcastEvent>,
    filter: TopicFilter,
}

impl Subscription {
    pub(crate) fn new(
        id: u64,
        receiver: mpsc::Receiver<BroadcastEvent>,
        filter: TopicFilter,
    ) -> Self {
        Self {
            id,
            receiver,
            filter,
        }
    }

    /// Receive the next event.
    ///
    /// # Returns
    ///
    /// - `Some(event)` - The next event for this subscription
    /// - `None` - The bus was dropped
    pub async fn recv(&mut self) -> Option<BroadcastEvent> {
        self.receiver.recv().await
    }

    /// Try to receive the next event without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(event))` - An event was available
    /// - `Ok(None)` - Nothing queued
    /// - `Err(SubscriptionError::Closed)` - The bus was dropped
    pub fn try_recv(&mut self) -> Result<Option<BroadcastEvent>, SubscriptionError> {
        match self.receiver.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SubscriptionError::Closed),
        }
    }

    /// Subscriber id assigned by the bus.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &TopicFilter {
        &self.filter
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        debug!(subscriber = self.id, "Subscription dropped");
    }
}

/// A stream wrapper for subscriptions.
///
/// Implements `tokio_stream::Stream` for use with stream combinators.
pub struct EventStream {
    subscription: Subscription,
}

impl EventStream {
    /// Create a new event stream from a subscription.
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }

    /// Get the filter for this stream.
    #[must_use]
    pub fn filter(&self) -> &TopicFilter {
        self.subscription.filter()
    }
}

impl Stream for EventStream {
    type Item = BroadcastEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.subscription.receiver.poll_recv(cx)
    }
}

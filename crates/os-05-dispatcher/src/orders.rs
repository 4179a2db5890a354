//! Order and stream handlers.
//!
//! Both spend one unit of the poster's per-round bandwidth and queue the item
//! for broadcast when the block commits.

use crate::tracker::{OrderTracker, TrackedItem};
use os_02_state_store::State;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use shared_bus::Topic;
use shared_types::{canonical_bytes, Address, DecodeError, OrderPayload, StreamPayload, Vote};

pub fn check_order(order: &OrderPayload, poster: &Address, state: &State) -> Vote {
    if order.sub_contract.is_empty() || order.maker.is_empty() {
        return Vote::invalid("order requires subContract and maker");
    }
    check_bandwidth(Topic::Order, poster, state)
}

pub fn deliver_order(
    order: &OrderPayload,
    poster: &Address,
    state: &mut State,
    tracker: &mut OrderTracker,
) -> Vote {
    match check_order(order, poster, state) {
        Vote::Valid(_) => accept(Topic::Order, order, poster, state, tracker),
        rejected => rejected,
    }
}

pub fn check_stream(message: &StreamPayload, poster: &Address, state: &State) -> Vote {
    if message.channel.is_empty() {
        return Vote::invalid("stream requires channel");
    }
    check_bandwidth(Topic::Stream, poster, state)
}

pub fn deliver_stream(
    message: &StreamPayload,
    poster: &Address,
    state: &mut State,
    tracker: &mut OrderTracker,
) -> Vote {
    match check_stream(message, poster, state) {
        Vote::Valid(_) => accept(Topic::Stream, message, poster, state, tracker),
        rejected => rejected,
    }
}

/// Identifier of an accepted item: `hex(sha256(canonical(payload) || counter))`.
pub fn order_id(payload: &Value, counter: u64) -> Result<String, DecodeError> {
    let mut hasher = Sha256::new();
    hasher.update(canonical_bytes(payload)?);
    hasher.update(counter.to_be_bytes());
    Ok(hex::encode(hasher.finalize()))
}

fn remaining(topic: Topic, poster: &Address, state: &State) -> Option<u64> {
    state.limits.get(poster).map(|limits| match topic {
        Topic::Order => limits.order_limit,
        Topic::Stream => limits.stream_limit,
    })
}

fn check_bandwidth(topic: Topic, poster: &Address, state: &State) -> Vote {
    match remaining(topic, poster, state) {
        None => Vote::invalid("poster has no bandwidth this round"),
        Some(0) => Vote::invalid(format!("{topic} limit exhausted")),
        Some(_) => Vote::valid(format!("{topic} accepted")),
    }
}

fn accept<P: Serialize>(
    topic: Topic,
    payload: &P,
    poster: &Address,
    state: &mut State,
    tracker: &mut OrderTracker,
) -> Vote {
    let body = match serde_json::to_value(payload) {
        Ok(body) => body,
        Err(e) => return Vote::invalid(format!("unencodable {topic} payload: {e}")),
    };
    let counter = state.order_counter.saturating_add(1);
    let id = match order_id(&body, counter) {
        Ok(id) => id,
        Err(e) => return Vote::invalid(e.to_string()),
    };

    if let Some(limits) = state.limits.get_mut(poster) {
        let slot = match topic {
            Topic::Order => &mut limits.order_limit,
            Topic::Stream => &mut limits.stream_limit,
        };
        *slot = slot.saturating_sub(1);
    }
    state.order_counter = counter;

    tracker.add(TrackedItem {
        topic,
        id: id.clone(),
        poster: poster.clone(),
        payload: body,
    });
    Vote::valid(format!("{topic} {id} accepted"))
}

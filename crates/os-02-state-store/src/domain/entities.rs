//! Network state entities.

use crate::domain::errors::StoreError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{hash_hex, Address, Amount, EventKind, Hash, Limits, StakerId, WitnessEvent};
use std::collections::{BTreeMap, BTreeSet};

/// The current staking epoch.
///
/// `number` is 0 before the first rebalance and then grows by exactly one per
/// accepted rebalance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub number: u64,
    pub starts_at: u64,
    pub ends_at: u64,
    /// Total order bandwidth shared among stakers each round.
    pub limit: u64,
    /// Total stream bandwidth shared among stakers each round.
    pub stream_limit: u64,
}

/// An external event awaiting quorum.
///
/// INVARIANT: `confirmations == voters.len()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingWitness {
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub confirmations: u64,
    /// Validators whose attestation has been counted.
    pub voters: BTreeSet<Address>,
}

impl PendingWitness {
    /// A witness with no votes yet.
    pub fn new(kind: EventKind, amount: Amount) -> Self {
        Self {
            amount,
            kind,
            confirmations: 0,
            voters: BTreeSet::new(),
        }
    }

    /// True if `event` reports the same parameters as the first attestation.
    pub fn matches(&self, event: &WitnessEvent) -> bool {
        self.amount == event.amount && self.kind == event.kind
    }

    /// Count a vote. Returns false if `voter` was already counted.
    pub fn record_vote(&mut self, voter: &Address) -> bool {
        if !self.voters.insert(voter.clone()) {
            return false;
        }
        self.confirmations = self.voters.len() as u64;
        true
    }
}

/// Highest external block height applied, per event type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastEvent {
    pub add: u64,
    pub remove: u64,
}

impl LastEvent {
    pub fn get(&self, kind: EventKind) -> u64 {
        match kind {
            EventKind::Add => self.add,
            EventKind::Remove => self.remove,
        }
    }

    /// Record an applied event; heights only move forward.
    pub fn record(&mut self, kind: EventKind, block: u64) {
        let slot = match kind {
            EventKind::Add => &mut self.add,
            EventKind::Remove => &mut self.remove,
        };
        *slot = (*slot).max(block);
    }
}

/// One snapshot of network state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub round: Round,
    /// Pending witnesses by external block, then staker.
    pub events: BTreeMap<u64, BTreeMap<StakerId, PendingWitness>>,
    /// Confirmed stake.
    pub balances: BTreeMap<StakerId, Amount>,
    /// Remaining bandwidth this round.
    pub limits: BTreeMap<StakerId, Limits>,
    pub last_event: LastEvent,
    /// (block, staker) pairs already applied. Never pruned: a pair that left
    /// this set could be witnessed and applied a second time.
    pub settled: BTreeMap<u64, BTreeSet<StakerId>>,
    /// Active validator set. Empty admits any signer.
    pub validators: BTreeSet<Address>,
    /// Orders and stream messages accepted since genesis.
    pub order_counter: u64,
    pub last_block_height: u64,
    #[serde(with = "hash_hex")]
    pub last_block_app_hash: Hash,
}

impl State {
    /// Empty pre-genesis state with the given per-round bandwidth.
    pub fn new(order_bandwidth: u64, stream_bandwidth: u64) -> Self {
        Self {
            round: Round {
                limit: order_bandwidth,
                stream_limit: stream_bandwidth,
                ..Round::default()
            },
            ..Self::default()
        }
    }

    /// True if `signer` may submit witness and rebalance transactions.
    pub fn is_validator(&self, signer: &Address) -> bool {
        self.validators.is_empty() || self.validators.contains(signer)
    }

    /// Confirmed balance, zero if unknown.
    pub fn balance_of(&self, staker: &str) -> Amount {
        self.balances.get(staker).copied().unwrap_or_default()
    }

    /// Sum of all confirmed balances.
    pub fn total_staked(&self) -> Amount {
        self.balances
            .values()
            .fold(Amount::ZERO, |acc, b| acc.saturating_add(*b))
    }

    pub fn pending(&self, block: u64, staker: &str) -> Option<&PendingWitness> {
        self.events.get(&block).and_then(|m| m.get(staker))
    }

    /// True if the (block, staker) event has already been applied.
    pub fn is_settled(&self, block: u64, staker: &str) -> bool {
        self.settled
            .get(&block)
            .is_some_and(|stakers| stakers.contains(staker))
    }

    /// Number of (block, staker) witnesses awaiting quorum.
    pub fn pending_count(&self) -> usize {
        self.events.values().map(BTreeMap::len).sum()
    }

    /// Deterministic digest of this snapshot.
    ///
    /// Covers every field except `last_block_app_hash` itself.
    pub fn app_hash(&self) -> Result<Hash, StoreError> {
        let view = (
            &self.round,
            &self.events,
            &self.balances,
            &self.limits,
            &self.last_event,
            &self.settled,
            &self.validators,
            self.order_counter,
            self.last_block_height,
        );
        let bytes =
            serde_json::to_vec(&view).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(Sha256::digest(&bytes).into())
    }
}

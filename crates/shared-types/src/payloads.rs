//! # Typed Payloads
//!
//! Per-type payload shapes and the [`Payload`] tagged union the dispatcher
//! matches on exhaustively.

use crate::amount::Amount;
use crate::entities::{EventKind, Limits, StakerId};
use crate::envelope::TxKind;
use crate::errors::DecodeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A validator's attestation of an external staking event.
///
/// Exactly four fields; anything else is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WitnessEvent {
    /// Staker the event concerns.
    pub staker: StakerId,
    /// Deposit or withdrawal.
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// External chain block height that emitted the event.
    pub block: u64,
    /// Amount moved. A JSON number or a decimal string.
    pub amount: Amount,
}

/// Round window proposed by a rebalance transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProposedRound {
    pub number: u64,
    pub starts_at: u64,
    pub ends_at: u64,
}

/// Proposal to advance the staking round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RebalanceProposal {
    pub round: ProposedRound,
    /// Bandwidth table the proposer computed; must match the local one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<BTreeMap<StakerId, Limits>>,
}

/// An order posted to the network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    /// Settlement contract the order targets.
    pub sub_contract: String,
    /// Maker address on the settlement chain.
    pub maker: String,
    /// Maker-side order values.
    #[serde(default)]
    pub maker_values: Map<String, Value>,
    /// Any further order fields, carried through to subscribers untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A message on a named stream channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamPayload {
    pub channel: String,
    pub data: Value,
}

/// Decoded transaction payload, one variant per transaction type.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Order(OrderPayload),
    Stream(StreamPayload),
    Witness(WitnessEvent),
    Rebalance(RebalanceProposal),
}

impl Payload {
    /// Decode envelope data according to its declared type.
    pub fn decode(kind: TxKind, data: &Value) -> Result<Self, DecodeError> {
        let payload = match kind {
            TxKind::Order => from_data(kind, data).map(Self::Order),
            TxKind::Stream => from_data(kind, data).map(Self::Stream),
            TxKind::Witness => from_data(kind, data).map(Self::Witness),
            TxKind::Rebalance => from_data(kind, data).map(Self::Rebalance),
        }?;
        Ok(payload)
    }
}

fn from_data<T: serde::de::DeserializeOwned>(kind: TxKind, data: &Value) -> Result<T, DecodeError> {
    T::deserialize(data).map_err(|e| DecodeError::Payload {
        kind,
        reason: e.to_string(),
    })
}

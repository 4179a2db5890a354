//! # Signed Transaction Envelope
//!
//! The wire format consumed by the dispatcher:
//!
//! ```text
//! { "type":  "order" | "stream" | "witness" | "rebalance",
//!   "data":  <type-specific payload>,
//!   "proof": { "from": base64(32-byte pubkey), "signature": base64(64-byte sig) } }
//! ```
//!
//! The `type` field is kept as a string on decode so that an unknown type is
//! distinguishable from a malformed envelope: routing happens only after the
//! signature has been checked.

use crate::errors::DecodeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Transaction types the dispatcher routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TxKind {
    Order,
    Stream,
    Witness,
    Rebalance,
}

impl TxKind {
    /// Wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Stream => "stream",
            Self::Witness => "witness",
            Self::Rebalance => "rebalance",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order" => Ok(Self::Order),
            "stream" => Ok(Self::Stream),
            "witness" => Ok(Self::Witness),
            "rebalance" => Ok(Self::Rebalance),
            other => Err(DecodeError::UnknownType(other.to_string())),
        }
    }
}

/// Detached signature over the canonical encoding of `data`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Proof {
    /// Base64 Ed25519 public key of the signer.
    pub from: String,
    /// Base64 Ed25519 signature.
    pub signature: String,
}

/// A signed transaction as received from the consensus engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignedTransaction {
    /// Declared type; validated during routing.
    #[serde(rename = "type")]
    pub kind: String,
    /// Type-specific payload.
    pub data: Value,
    /// Signature proof.
    pub proof: Proof,
}

impl SignedTransaction {
    /// Decode raw transaction bytes.
    pub fn decode(raw: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(raw).map_err(|e| DecodeError::Malformed(e.to_string()))
    }

    /// Encode to the wire format.
    pub fn encode(&self) -> Result<Vec<u8>, DecodeError> {
        serde_json::to_vec(self).map_err(|e| DecodeError::Malformed(e.to_string()))
    }

    /// Parse the declared type.
    pub fn tx_kind(&self) -> Result<TxKind, DecodeError> {
        self.kind.parse()
    }
}

/// Canonical byte encoding of a payload: compact JSON with object keys in
/// lexicographic order.
///
/// `serde_json::Value` keeps objects in a `BTreeMap`, so re-serializing a
/// parsed value always yields sorted keys regardless of the sender's order.
pub fn canonical_bytes(data: &Value) -> Result<Vec<u8>, DecodeError> {
    serde_json::to_vec(data).map_err(|e| DecodeError::Malformed(e.to_string()))
}

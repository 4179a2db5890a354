//! # Core Domain Entities
//!
//! Identifiers and plain records referenced by payloads and by network state.

use serde::{Deserialize, Serialize};

// Re-export U256 from primitive-types for use across all crates
pub use primitive_types::U256;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// A 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// Hex-encoded 20-byte validator/poster address.
///
/// Derived as the first 20 bytes of `sha256(pubkey)`.
pub type Address = String;

/// Identifier of a staker as reported by the external chain.
pub type StakerId = String;

/// Direction of an external staking event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Stake deposited on the external chain.
    Add,
    /// Stake withdrawn on the external chain.
    Remove,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// Per-staker bandwidth for the current round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    /// Orders the staker may still post this round.
    pub order_limit: u64,
    /// Stream messages the staker may still post this round.
    pub stream_limit: u64,
}

/// Serde helper encoding a [`Hash`] as a lowercase hex string.
pub mod hash_hex {
    use super::Hash;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash, D::Error> {
        let text = String::deserialize(deserializer)?;
        let bytes = hex::decode(&text).map_err(D::Error::custom)?;
        <Hash>::try_from(bytes.as_slice())
            .map_err(|_| D::Error::custom(format!("expected 32 bytes, got {}", bytes.len())))
    }
}

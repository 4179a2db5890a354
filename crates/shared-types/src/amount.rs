//! # Stake Amounts
//!
//! Balances and witnessed amounts are unsigned 256-bit integers. On the wire
//! they are accepted either as JSON numbers (up to `u64::MAX`) or as decimal
//! strings, and always written back as decimal strings so that no JSON
//! consumer loses precision.

use primitive_types::U256;
use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Non-negative stake amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount(pub U256);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(U256::zero());

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Addition clamped at `U256::MAX`.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtraction clamped at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Subtraction that fails instead of going negative.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Parse a decimal string.
    pub fn from_dec_str(text: &str) -> Option<Self> {
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        U256::from_dec_str(text).ok().map(Self)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawAmount {
            Number(u64),
            Text(String),
        }

        match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(value) => Ok(Self::from(value)),
            RawAmount::Text(text) => Self::from_dec_str(&text)
                .ok_or_else(|| D::Error::custom(format!("invalid decimal amount: {text:?}"))),
        }
    }
}

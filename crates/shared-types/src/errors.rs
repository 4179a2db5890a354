//! # Error Types
//!
//! Decoding failures for envelopes and payloads.

use crate::envelope::TxKind;
use thiserror::Error;

/// Raised when raw bytes or envelope data cannot be turned into typed values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The raw bytes are not a well-formed envelope.
    #[error("malformed transaction: {0}")]
    Malformed(String),

    /// The envelope declares a type no handler exists for.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// The envelope data does not match the shape its type requires.
    #[error("malformed {kind} payload: {reason}")]
    Payload {
        /// Declared transaction type.
        kind: TxKind,
        /// Decoder diagnostic.
        reason: String,
    },
}

//! # Shared Types Crate
//!
//! Wire formats and small value types shared by every OrderStream crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the transaction envelope, typed payloads and
//!   the accept/reject `Vote` are defined once, here.
//! - **Deterministic Encoding**: every map is ordered and the signed message is
//!   the canonical JSON encoding of the payload, so all validators hash and
//!   verify identical bytes.
//! - **Tagged Payloads**: untyped envelope data is decoded into [`Payload`], a
//!   variant per transaction type, before any handler sees it.

pub mod amount;
pub mod entities;
pub mod envelope;
pub mod errors;
pub mod payloads;
pub mod vote;

pub use amount::Amount;
pub use entities::*;
pub use envelope::{canonical_bytes, Proof, SignedTransaction, TxKind};
pub use errors::DecodeError;
pub use payloads::*;
pub use vote::Vote;

//! # OS-01 Crypto Envelope
//!
//! Signs and verifies transaction envelopes with detached Ed25519 signatures
//! and derives the canonical validator/poster address from a public key.
//!
//! ## Contract
//!
//! | Operation | Behavior |
//! |-----------|----------|
//! | `sign(kind, data, signer)` | Signs the canonical encoding of `data` only |
//! | `verify(tx)` | `true` iff the proof signs `data`; never panics, never errors |
//! | `derive_address(pubkey)` | `hex(sha256(pubkey)[..20])` |
//! | `Signer::from_keypair_bytes` | Fails on a keypair that is not 64 consistent bytes |
//!
//! Verification failures are ordinary per-transaction outcomes. Signer
//! construction failures are bootstrap errors: a validator with a broken key
//! must not start.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod envelope;
pub mod errors;
pub mod signer;

// Re-exports
pub use address::{address_from_base64, address_from_proof, derive_address};
pub use envelope::{sign, verify};
pub use errors::CryptoError;
pub use signer::{Signer, KEYPAIR_LENGTH, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! # OS-05 Dispatcher
//!
//! Routes raw transactions to the right handler for the phase the consensus
//! engine is in.
//!
//! ## Pipeline
//!
//! ```text
//! raw bytes ─→ decode ─→ verify proof ─→ route by type ─→ decode payload
//!                                                             │
//!            Vote ←─ handler(phase snapshot) ←─ authorize ←───┘
//! ```
//!
//! | Step | Failure vote |
//! |------|--------------|
//! | decode envelope | `malformed transaction` |
//! | verify proof | `bad signature` |
//! | route | `unknown type` |
//! | decode payload | `malformed <type> payload: ...` |
//! | authorize witness/rebalance | `signer is not an active validator` |
//!
//! The check phase reads the check snapshot and never writes it. Every
//! failure is a vote; nothing here returns an error or panics on input.

pub mod dispatcher;
pub mod orders;
pub mod tracker;

pub use dispatcher::{Dispatcher, DispatcherConfig, Phase};
pub use orders::{check_order, check_stream, deliver_order, deliver_stream, order_id};
pub use tracker::{OrderTracker, TrackedItem};

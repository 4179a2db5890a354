//! # OS-03 Witness Confirmation
//!
//! Turns validator attestations of an external staking event into exactly one
//! balance mutation.
//!
//! ## Lifecycle of an Event
//!
//! ```text
//! (block, staker) unseen ──first vote──→ pending (1 vote)
//!                                          │
//!                       matching vote from a new validator
//!                                          ↓
//!                                pending (n votes) ──n == quorum──→ applied
//!                                                                   │
//!                                   later votes: "event already applied"
//! ```
//!
//! | Attestation | Result |
//! |-------------|--------|
//! | (block, staker) already applied | Valid, no change |
//! | same validator votes twice | Valid, no change |
//! | amount or type differs from the first vote | Invalid, no change |
//! | quorum reached | balance updated, pending entry removed |

pub mod config;
pub mod engine;

pub use config::{WitnessConfig, DEFAULT_QUORUM};
pub use engine::{check_stake, deliver_stake, WitnessOutcome};

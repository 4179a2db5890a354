//! # Genesis Module
//!
//! The initial network state used when no committed snapshot exists.
//!
//! ## Genesis File
//!
//! ```json
//! {
//!   "chain_id": "orderstream-devnet",
//!   "validators": ["<base64 Ed25519 public key>"],
//!   "balances": {"0xStaker": "1000"},
//!   "round_limit": 1000,
//!   "stream_limit": 1000
//! }
//! ```
//!
//! Genesis state is at round 0, height 0, with limits generated from the
//! listed balances. An empty validator list admits any signer for witness
//! and rebalance transactions (development networks).

pub mod builder;

pub use builder::{
    GenesisBuilder, GenesisConfig, GenesisError, DEFAULT_ROUND_LIMIT, DEFAULT_STREAM_LIMIT,
};

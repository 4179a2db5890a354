//! # OS-04 Rebalance
//!
//! Advances the staking round and recomputes every staker's bandwidth.
//!
//! A proposal for round `N + 1` is the only one accepted while the network is
//! in round `N`. Its window must be non-empty, must not start before round `N`
//! ends and, if it carries a limits table, that table must equal the one this node generates from its own
//! balances. Check and deliver share one predicate, so a proposal admitted to
//! the mempool is accepted at delivery unless another rebalance lands first.

pub mod limits;
pub mod machine;

pub use limits::generate_limits;
pub use machine::{check_rebalance, deliver_rebalance, validate_proposal, RebalanceRejection};

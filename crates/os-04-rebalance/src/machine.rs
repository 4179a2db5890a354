use crate::limits::generate_limits;
use os_02_state_store::State;
use shared_types::{Limits, RebalanceProposal, StakerId, Vote};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

/// Why a rebalance proposal was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RebalanceRejection {
    #[error("unexpected round number: expected {expected}, proposed {proposed}")]
    UnexpectedRound { expected: u64, proposed: u64 },

    #[error("empty round window: starts at {starts_at}, ends at {ends_at}")]
    EmptyWindow { starts_at: u64, ends_at: u64 },

    #[error("round window overlaps the current round: starts at {starts_at}, current ends at {current_end}")]
    OverlappingWindow { starts_at: u64, current_end: u64 },

    #[error("proposed limits differ from locally generated limits")]
    LimitsMismatch,
}

/// Validate `proposal` against `state`, returning the limits the new round
/// will use.
pub fn validate_proposal(
    proposal: &RebalanceProposal,
    state: &State,
) -> Result<BTreeMap<StakerId, Limits>, RebalanceRejection> {
    let proposed = proposal.round.number;
    if state.round.number.checked_add(1) != Some(proposed) {
        return Err(RebalanceRejection::UnexpectedRound {
            expected: state.round.number.saturating_add(1),
            proposed,
        });
    }

    let window = proposal.round;
    if window.ends_at <= window.starts_at {
        return Err(RebalanceRejection::EmptyWindow {
            starts_at: window.starts_at,
            ends_at: window.ends_at,
        });
    }
    if window.starts_at < state.round.ends_at {
        return Err(RebalanceRejection::OverlappingWindow {
            starts_at: window.starts_at,
            current_end: state.round.ends_at,
        });
    }

    let limits = generate_limits(state);
    if let Some(claimed) = &proposal.limits {
        if *claimed != limits {
            return Err(RebalanceRejection::LimitsMismatch);
        }
    }
    Ok(limits)
}

/// Mempool admission for a rebalance proposal. Never mutates.
pub fn check_rebalance(proposal: &RebalanceProposal, state: &State) -> Vote {
    match validate_proposal(proposal, state) {
        Ok(_) => Vote::valid(format!("rebalance to round {} accepted", proposal.round.number)),
        Err(rejection) => {
            debug!(%rejection, round = state.round.number, "Rebalance rejected in check");
            Vote::invalid(rejection.to_string())
        }
    }
}

/// Apply a rebalance proposal to the commit snapshot.
pub fn deliver_rebalance(proposal: &RebalanceProposal, state: &mut State) -> Vote {
    let limits = match validate_proposal(proposal, state) {
        Ok(limits) => limits,
        Err(rejection) => {
            debug!(%rejection, round = state.round.number, "Rebalance rejected");
            return Vote::invalid(rejection.to_string());
        }
    };

    state.round.number = proposal.round.number;
    state.round.starts_at = proposal.round.starts_at;
    state.round.ends_at = proposal.round.ends_at;
    state.limits = limits;

    info!(
        round = state.round.number,
        starts_at = state.round.starts_at,
        ends_at = state.round.ends_at,
        stakers = state.limits.len(),
        "Round advanced"
    );
    Vote::valid(format!("round {} started", state.round.number))
}

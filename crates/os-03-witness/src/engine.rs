use crate::config::WitnessConfig;
use os_02_state_store::{PendingWitness, State};
use shared_types::{Address, Amount, EventKind, Vote, WitnessEvent};
use tracing::{debug, info, warn};

/// What a delivered attestation did to the state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WitnessOutcome {
    /// Vote counted, quorum not yet reached.
    Recorded { confirmations: u64, quorum: u64 },
    /// Quorum reached; the balance mutation has been applied.
    Applied { balance: Amount },
    /// The event was applied earlier.
    AlreadyApplied,
    /// This validator's vote was counted earlier.
    DuplicateVote,
    /// Amount or type differ from the pending attestation.
    Disagreement,
    /// The event fails the shape checks.
    Malformed(String),
}

impl From<WitnessOutcome> for Vote {
    fn from(outcome: WitnessOutcome) -> Self {
        match outcome {
            WitnessOutcome::Recorded {
                confirmations,
                quorum,
            } => Vote::valid(format!("witness recorded ({confirmations}/{quorum})")),
            WitnessOutcome::Applied { balance } => {
                Vote::valid(format!("event applied, balance {balance}"))
            }
            WitnessOutcome::AlreadyApplied => Vote::valid("event already applied"),
            WitnessOutcome::DuplicateVote => Vote::valid("duplicate vote ignored"),
            WitnessOutcome::Disagreement => Vote::invalid("disagreement about event parameters"),
            WitnessOutcome::Malformed(reason) => Vote::Invalid(reason),
        }
    }
}

/// Mempool admission for a witness event. Never mutates.
///
/// Field presence and types are enforced when the payload is decoded.
pub fn check_stake(event: &WitnessEvent, _state: &State) -> Vote {
    if event.staker.is_empty() {
        return Vote::invalid("witness staker is empty");
    }
    if event.amount.is_zero() {
        return Vote::invalid("witness amount must be positive");
    }
    Vote::valid("witness accepted")
}

/// Count `voter`'s attestation of `event` against the commit snapshot.
pub fn deliver_stake(
    event: &WitnessEvent,
    voter: &Address,
    state: &mut State,
    config: &WitnessConfig,
) -> WitnessOutcome {
    if let Vote::Invalid(reason) = check_stake(event, state) {
        return WitnessOutcome::Malformed(reason);
    }

    if state.is_settled(event.block, &event.staker) {
        debug!(staker = %event.staker, block = event.block, "Witness for applied event");
        return WitnessOutcome::AlreadyApplied;
    }

    let confirmations = {
        let pending = state
            .events
            .entry(event.block)
            .or_default()
            .entry(event.staker.clone())
            .or_insert_with(|| PendingWitness::new(event.kind, event.amount));

        if !pending.matches(event) {
            warn!(
                staker = %event.staker,
                block = event.block,
                %voter,
                pending_amount = %pending.amount,
                pending_kind = %pending.kind,
                amount = %event.amount,
                kind = %event.kind,
                "Witness disagrees with pending event"
            );
            return WitnessOutcome::Disagreement;
        }
        if !pending.record_vote(voter) {
            return WitnessOutcome::DuplicateVote;
        }
        pending.confirmations
    };

    if confirmations < config.quorum {
        debug!(
            staker = %event.staker,
            block = event.block,
            confirmations,
            quorum = config.quorum,
            "Witness recorded"
        );
        return WitnessOutcome::Recorded {
            confirmations,
            quorum: config.quorum,
        };
    }

    remove_pending(state, event.block, &event.staker);
    let balance = apply_event(state, event);
    state.last_event.record(event.kind, event.block);
    state
        .settled
        .entry(event.block)
        .or_default()
        .insert(event.staker.clone());

    info!(
        staker = %event.staker,
        block = event.block,
        kind = %event.kind,
        amount = %event.amount,
        %balance,
        "Witness quorum reached"
    );
    WitnessOutcome::Applied { balance }
}

fn remove_pending(state: &mut State, block: u64, staker: &str) {
    if let Some(stakers) = state.events.get_mut(&block) {
        stakers.remove(staker);
        if stakers.is_empty() {
            state.events.remove(&block);
        }
    }
}

fn apply_event(state: &mut State, event: &WitnessEvent) -> Amount {
    let current = state.balance_of(&event.staker);
    let updated = match event.kind {
        EventKind::Add => current.saturating_add(event.amount),
        EventKind::Remove => current.checked_sub(event.amount).unwrap_or_else(|| {
            warn!(
                staker = %event.staker,
                block = event.block,
                balance = %current,
                amount = %event.amount,
                "Withdrawal exceeds balance, clamping at zero"
            );
            Amount::ZERO
        }),
    };

    if updated.is_zero() {
        state.balances.remove(&event.staker);
    } else {
        state.balances.insert(event.staker.clone(), updated);
    }
    updated
}

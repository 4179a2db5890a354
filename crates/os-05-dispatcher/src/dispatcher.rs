use crate::orders::{check_order, check_stream, deliver_order, deliver_stream};
use crate::tracker::OrderTracker;
use os_01_crypto_envelope::{address_from_proof, verify};
use os_02_state_store::{State, StateStore};
use os_03_witness::{check_stake, deliver_stake, WitnessConfig};
use os_04_rebalance::{check_rebalance, deliver_rebalance};
use shared_types::{Address, Payload, SignedTransaction, Vote};
use std::fmt;
use tracing::debug;

/// Which consensus callback a transaction arrived through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Mempool admission against the check snapshot.
    Check,
    /// Block execution against the commit snapshot.
    Deliver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Check => "check",
            Self::Deliver => "deliver",
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub witness: WitnessConfig,
}

/// Routes raw transactions to their handlers.
#[derive(Clone, Debug, Default)]
pub struct Dispatcher {
    config: DispatcherConfig,
}

/// A verified, decoded and authorized transaction.
struct Admitted {
    signer: Address,
    payload: Payload,
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Run `raw` through `phase` against the matching snapshot of `store`.
    pub fn dispatch(
        &self,
        phase: Phase,
        raw: &[u8],
        store: &mut StateStore,
        tracker: &mut OrderTracker,
    ) -> Vote {
        match phase {
            Phase::Check => self.check(raw, store.check()),
            Phase::Deliver => self.deliver(raw, store.commit_mut(), tracker),
        }
    }

    /// Decide admission of `raw` without mutating `state`.
    pub fn check(&self, raw: &[u8], state: &State) -> Vote {
        let vote = match self.admit(raw, state) {
            Ok(Admitted { signer, payload }) => match &payload {
                Payload::Order(order) => check_order(order, &signer, state),
                Payload::Stream(message) => check_stream(message, &signer, state),
                Payload::Witness(event) => check_stake(event, state),
                Payload::Rebalance(proposal) => check_rebalance(proposal, state),
            },
            Err(vote) => vote,
        };
        debug!(phase = %Phase::Check, code = vote.code(), log = vote.log(), "Transaction processed");
        vote
    }

    /// Apply `raw` to `state`, queueing accepted orders on `tracker`.
    pub fn deliver(&self, raw: &[u8], state: &mut State, tracker: &mut OrderTracker) -> Vote {
        let vote = match self.admit(raw, state) {
            Ok(Admitted { signer, payload }) => match &payload {
                Payload::Order(order) => deliver_order(order, &signer, state, tracker),
                Payload::Stream(message) => deliver_stream(message, &signer, state, tracker),
                Payload::Witness(event) => {
                    deliver_stake(event, &signer, state, &self.config.witness).into()
                }
                Payload::Rebalance(proposal) => deliver_rebalance(proposal, state),
            },
            Err(vote) => vote,
        };
        debug!(phase = %Phase::Deliver, code = vote.code(), log = vote.log(), "Transaction processed");
        vote
    }

    fn admit(&self, raw: &[u8], state: &State) -> Result<Admitted, Vote> {
        let tx = SignedTransaction::decode(raw).map_err(|e| {
            debug!(error = %e, "Undecodable transaction");
            Vote::invalid("malformed transaction")
        })?;

        if !verify(&tx) {
            return Err(Vote::invalid("bad signature"));
        }
        let signer = address_from_proof(&tx.proof).map_err(|_| Vote::invalid("bad signature"))?;

        let kind = tx.tx_kind().map_err(|_| Vote::invalid("unknown type"))?;
        let payload = Payload::decode(kind, &tx.data).map_err(|e| Vote::invalid(e.to_string()))?;

        if matches!(payload, Payload::Witness(_) | Payload::Rebalance(_))
            && !state.is_validator(&signer)
        {
            debug!(%signer, %kind, "Unauthorized validator transaction");
            return Err(Vote::invalid("signer is not an active validator"));
        }

        Ok(Admitted { signer, payload })
    }
}

use os_02_state_store::State;
use primitive_types::{U256, U512};
use shared_types::{Amount, Limits, StakerId};
use std::collections::BTreeMap;

/// Per-staker bandwidth for the current balances and round parameters.
///
/// Each staker with a non-zero balance receives
/// `floor(balance * bandwidth / total_staked)` of the order and stream
/// bandwidth. A share that rounds down to zero still gets an entry.
pub fn generate_limits(state: &State) -> BTreeMap<StakerId, Limits> {
    let total = state.total_staked();
    if total.is_zero() {
        return BTreeMap::new();
    }

    state
        .balances
        .iter()
        .filter(|(_, balance)| !balance.is_zero())
        .map(|(staker, balance)| {
            let limits = Limits {
                order_limit: share(*balance, state.round.limit, total),
                stream_limit: share(*balance, state.round.stream_limit, total),
            };
            (staker.clone(), limits)
        })
        .collect()
}

// Widened to U512 so the product cannot overflow. balance <= total keeps the
// quotient within u64.
fn share(balance: Amount, bandwidth: u64, total: Amount) -> u64 {
    let scaled = balance.0.full_mul(U256::from(bandwidth)) / U512::from(total.0);
    scaled.low_u64()
}

//! # Test Fixtures
//!
//! Deterministic validator sets, signed transaction builders and a
//! pre-wired application.

use std::sync::Arc;

use node_runtime::{Application, GenesisBuilder, GenesisConfig};
use os_01_crypto_envelope::{sign, Signer};
use os_02_state_store::{InMemorySnapshotStorage, SnapshotStorage, State};
use os_05_dispatcher::Dispatcher;
use serde_json::{json, Value};
use shared_bus::OrderBus;
use shared_types::{Amount, StakerId, TxKind};

/// Validators derived from fixed seeds so every replica agrees on them.
pub fn validators(count: u8) -> Vec<Signer> {
    (1..=count).map(|i| Signer::from_seed([i; 32])).collect()
}

/// Genesis with `validators` registered and the given starting balances.
pub fn genesis(validators: &[Signer], balances: &[(&str, u64)]) -> State {
    let config = GenesisConfig {
        chain_id: "orderstream-itest".to_string(),
        validators: validators.iter().map(Signer::public_key_base64).collect(),
        balances: balances
            .iter()
            .map(|(staker, amount)| (StakerId::from(*staker), Amount::from(*amount)))
            .collect(),
        ..GenesisConfig::default()
    };
    GenesisBuilder::new(config)
        .build()
        .expect("fixture genesis is valid")
}

/// Application over in-memory storage, with the bus it broadcasts on.
pub fn application(state: State) -> (Application, Arc<OrderBus>) {
    application_with_storage(state, Arc::new(InMemorySnapshotStorage::new()))
}

pub fn application_with_storage(
    state: State,
    storage: Arc<dyn SnapshotStorage>,
) -> (Application, Arc<OrderBus>) {
    let bus = Arc::new(OrderBus::new());
    let app = Application::new(state, Dispatcher::default(), bus.clone(), storage);
    (app, bus)
}

/// Sign and encode an arbitrary payload.
pub fn signed(kind: TxKind, data: Value, signer: &Signer) -> Vec<u8> {
    sign(kind, data, signer)
        .expect("fixture payload signs")
        .encode()
        .expect("fixture envelope encodes")
}

pub fn witness_tx(signer: &Signer, staker: &str, kind: &str, block: u64, amount: u64) -> Vec<u8> {
    signed(
        TxKind::Witness,
        json!({"staker": staker, "type": kind, "block": block, "amount": amount}),
        signer,
    )
}

pub fn rebalance_tx(signer: &Signer, number: u64, starts_at: u64, ends_at: u64) -> Vec<u8> {
    signed(
        TxKind::Rebalance,
        json!({"round": {"number": number, "startsAt": starts_at, "endsAt": ends_at}}),
        signer,
    )
}

pub fn order_tx(signer: &Signer, maker: &str) -> Vec<u8> {
    signed(
        TxKind::Order,
        json!({"subContract": "0x5c1f", "maker": maker, "makerValues": {"price": "10"}}),
        signer,
    )
}

pub fn stream_tx(signer: &Signer, channel: &str, data: Value) -> Vec<u8> {
    signed(
        TxKind::Stream,
        json!({"channel": channel, "data": data}),
        signer,
    )
}

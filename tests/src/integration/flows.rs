//! # Integration Test Flows
//!
//! Full block lifecycles through the validator application:
//!
//! 1. **Witness → balance**: validator attestations reach quorum and move stake
//! 2. **Rebalance → limits**: a new round turns stake into posting bandwidth
//! 3. **Order → broadcast**: delivered orders reach subscribers at commit
//! 4. **Admission**: check never mutates, non-validators are refused

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use os_01_crypto_envelope::Signer;
    use serde_json::json;
    use shared_bus::{Topic, TopicFilter};
    use shared_types::{Amount, TxKind};
    use tokio::time::timeout;

    use crate::fixtures::{
        application, genesis, order_tx, rebalance_tx, signed, stream_tx, validators, witness_tx,
    };
    use node_runtime::{GenesisBuilder, GenesisConfig};

    fn trader() -> Signer {
        Signer::from_seed([0xEE; 32])
    }

    // =============================================================================
    // WITNESS FLOW
    // =============================================================================

    #[test]
    fn test_five_attestations_apply_deposit() {
        let validators = validators(6);
        let trader = trader();
        let (app, _bus) = application(genesis(&validators, &[]));

        app.begin_block(1);
        for (i, validator) in validators.iter().take(4).enumerate() {
            let response = app.deliver_tx(&witness_tx(validator, &trader.address(), "add", 10, 100));
            assert!(response.is_ok(), "vote {i}: {}", response.log);
        }
        app.commit().unwrap();
        assert!(app.committed_state().balance_of(&trader.address()).is_zero());

        app.begin_block(2);
        let fifth = app.deliver_tx(&witness_tx(&validators[4], &trader.address(), "add", 10, 100));
        assert!(fifth.is_ok());
        app.commit().unwrap();

        let state = app.committed_state();
        assert_eq!(state.balance_of(&trader.address()), Amount::from(100));
        assert_eq!(state.pending_count(), 0);
        assert_eq!(state.last_event.add, 10);

        app.begin_block(3);
        let sixth = app.deliver_tx(&witness_tx(&validators[5], &trader.address(), "add", 10, 100));
        assert!(sixth.is_ok());
        assert_eq!(sixth.log, "event already applied");
        app.commit().unwrap();
        assert_eq!(
            app.committed_state().balance_of(&trader.address()),
            Amount::from(100)
        );
    }

    #[test]
    fn test_withdrawal_after_deposit() {
        let validators = validators(5);
        let trader = trader();
        let (app, _bus) = application(genesis(&validators, &[]));

        app.begin_block(1);
        for validator in &validators {
            app.deliver_tx(&witness_tx(validator, &trader.address(), "add", 10, 100));
        }
        for validator in &validators {
            app.deliver_tx(&witness_tx(validator, &trader.address(), "remove", 11, 40));
        }
        app.commit().unwrap();

        let state = app.committed_state();
        assert_eq!(state.balance_of(&trader.address()), Amount::from(60));
        assert_eq!(state.last_event.remove, 11);
    }

    #[test]
    fn test_disagreeing_attestation_rejected() {
        let validators = validators(5);
        let trader = trader();
        let (app, _bus) = application(genesis(&validators, &[]));

        app.begin_block(1);
        assert!(app
            .deliver_tx(&witness_tx(&validators[0], &trader.address(), "add", 10, 100))
            .is_ok());
        let response = app.deliver_tx(&witness_tx(&validators[1], &trader.address(), "add", 10, 99));
        assert!(!response.is_ok());
        assert_eq!(response.log, "disagreement about event parameters");
        app.commit().unwrap();

        let pending = app.committed_state();
        let entry = pending.pending(10, &trader.address()).unwrap();
        assert_eq!(entry.confirmations, 1);
    }

    #[test]
    fn test_non_validator_attestation_refused() {
        let validators = validators(5);
        let outsider = Signer::from_seed([0x77; 32]);
        let (app, _bus) = application(genesis(&validators, &[]));

        let response = app.deliver_tx(&witness_tx(&outsider, "0xAA", "add", 10, 100));
        assert!(!response.is_ok());
        assert_eq!(response.log, "signer is not an active validator");

        let response = app.check_tx(&rebalance_tx(&outsider, 1, 0, 100));
        assert_eq!(response.log, "signer is not an active validator");
    }

    // =============================================================================
    // REBALANCE FLOW
    // =============================================================================

    #[test]
    fn test_rebalance_turns_stake_into_bandwidth() {
        let validators = validators(5);
        let trader = trader();
        let (app, _bus) = application(genesis(&validators, &[("0xOTHER", 300)]));

        app.begin_block(1);
        for validator in &validators {
            app.deliver_tx(&witness_tx(validator, &trader.address(), "add", 10, 100));
        }
        app.commit().unwrap();
        assert!(!app.committed_state().limits.contains_key(&trader.address()));

        app.begin_block(2);
        let response = app.deliver_tx(&rebalance_tx(&validators[0], 1, 0, 500));
        assert!(response.is_ok(), "{}", response.log);
        app.commit().unwrap();

        let state = app.committed_state();
        assert_eq!(state.round.number, 1);
        assert_eq!(state.round.ends_at, 500);
        let limits = state.limits[&trader.address()];
        assert_eq!(limits.order_limit, 250);
        assert_eq!(state.limits["0xOTHER"].order_limit, 750);

        app.begin_block(3);
        let replay = app.deliver_tx(&rebalance_tx(&validators[1], 1, 0, 500));
        assert!(!replay.is_ok());
        let skip = app.deliver_tx(&rebalance_tx(&validators[1], 3, 500, 900));
        assert!(!skip.is_ok());
        app.commit().unwrap();
        assert_eq!(app.committed_state().round.number, 1);
    }

    #[test]
    fn test_late_votes_apply_after_rebalances() {
        let validators = validators(5);
        let trader = trader();
        let (app, _bus) = application(genesis(&validators, &[]));

        app.begin_block(1);
        for validator in validators.iter().take(3) {
            assert!(app
                .deliver_tx(&witness_tx(validator, &trader.address(), "add", 150, 100))
                .is_ok());
        }
        app.commit().unwrap();

        for (height, (number, starts_at, ends_at)) in
            (2..).zip([(1, 0, 100), (2, 100, 200), (3, 200, 300)])
        {
            app.begin_block(height);
            let response =
                app.deliver_tx(&rebalance_tx(&validators[0], number, starts_at, ends_at));
            assert!(response.is_ok(), "round {number}: {}", response.log);
            app.commit().unwrap();
        }

        app.begin_block(5);
        for validator in &validators[3..] {
            let response = app.deliver_tx(&witness_tx(validator, &trader.address(), "add", 150, 100));
            assert!(response.is_ok());
            assert_ne!(response.log, "event already applied");
        }
        app.commit().unwrap();

        let state = app.committed_state();
        assert_eq!(state.balance_of(&trader.address()), Amount::from(100));
        assert_eq!(state.pending_count(), 0);
    }

    #[test]
    fn test_far_future_window_blocks_nothing_but_later_rounds() {
        let validators = validators(5);
        let trader = trader();
        let (app, _bus) = application(genesis(&validators, &[]));

        app.begin_block(1);
        let response = app.deliver_tx(&rebalance_tx(&validators[0], 1, u64::MAX - 1, u64::MAX));
        assert!(response.is_ok(), "{}", response.log);
        app.commit().unwrap();

        app.begin_block(2);
        for validator in &validators {
            let response = app.deliver_tx(&witness_tx(validator, &trader.address(), "add", 10, 100));
            assert_ne!(response.log, "event already applied");
        }
        let next = app.deliver_tx(&rebalance_tx(&validators[1], 2, 0, 100));
        assert!(!next.is_ok());
        app.commit().unwrap();

        let state = app.committed_state();
        assert_eq!(state.balance_of(&trader.address()), Amount::from(100));
        assert_eq!(state.round.number, 1);
    }

    #[test]
    fn test_empty_round_window_rejected() {
        let validators = validators(5);
        let (app, _bus) = application(genesis(&validators, &[]));

        let response = app.check_tx(&rebalance_tx(&validators[0], 1, 100, 100));
        assert!(!response.is_ok());
    }

    // =============================================================================
    // ORDER FLOW
    // =============================================================================

    #[tokio::test]
    async fn test_order_broadcast_after_commit() {
        let validators = validators(5);
        let trader = trader();
        let (app, bus) = application(genesis(&validators, &[(trader.address().as_str(), 10)]));
        let mut orders = bus.subscribe(TopicFilter::topics(vec![Topic::Order])).unwrap();

        app.begin_block(1);
        assert!(app.check_tx(&order_tx(&trader, "0xMAKER")).is_ok());
        let response = app.deliver_tx(&order_tx(&trader, "0xMAKER"));
        assert!(response.is_ok(), "{}", response.log);
        assert!(app
            .deliver_tx(&stream_tx(&trader, "quotes", json!({"bid": 1})))
            .is_ok());
        assert!(orders.try_recv().unwrap().is_none());

        app.commit().unwrap();

        let event = timeout(Duration::from_secs(1), orders.recv())
            .await
            .expect("order delivered in time")
            .expect("bus alive");
        assert_eq!(event.topic, Topic::Order);
        assert_eq!(event.payload["poster"], json!(trader.address()));
        assert_eq!(event.payload["data"]["maker"], json!("0xMAKER"));
        assert_eq!(event.payload["id"].as_str().unwrap().len(), 64);

        // Stream items are filtered out of this subscription.
        assert!(orders.try_recv().unwrap().is_none());
    }

    #[test]
    fn test_bandwidth_exhaustion_and_refill() {
        let validators = validators(5);
        let trader = trader();
        let config = GenesisConfig {
            validators: validators.iter().map(Signer::public_key_base64).collect(),
            balances: [(trader.address(), Amount::from(1))].into_iter().collect(),
            ..GenesisConfig::default()
        };
        let state = GenesisBuilder::new(config)
            .with_round_limit(2)
            .build()
            .unwrap();
        let (app, _bus) = application(state);

        app.begin_block(1);
        assert!(app.deliver_tx(&order_tx(&trader, "0x1")).is_ok());
        assert!(app.deliver_tx(&order_tx(&trader, "0x2")).is_ok());
        let exhausted = app.deliver_tx(&order_tx(&trader, "0x3"));
        assert_eq!(exhausted.log, "order limit exhausted");
        app.commit().unwrap();
        assert_eq!(app.committed_state().order_counter, 2);

        app.begin_block(2);
        assert!(app.deliver_tx(&rebalance_tx(&validators[2], 1, 0, 50)).is_ok());
        assert!(app.deliver_tx(&order_tx(&trader, "0x3")).is_ok());
        app.commit().unwrap();
        assert_eq!(app.committed_state().limits[&trader.address()].order_limit, 1);
    }

    #[test]
    fn test_poster_without_stake_refused() {
        let validators = validators(5);
        let (app, _bus) = application(genesis(&validators, &[]));

        let response = app.check_tx(&order_tx(&trader(), "0xMAKER"));
        assert_eq!(response.log, "poster has no bandwidth this round");
    }

    // =============================================================================
    // ADMISSION
    // =============================================================================

    #[test]
    fn test_check_never_mutates() {
        let validators = validators(5);
        let trader = trader();
        let (app, _bus) = application(genesis(&validators, &[(trader.address().as_str(), 10)]));
        let before = app.committed_state();

        for validator in &validators {
            assert!(app
                .check_tx(&witness_tx(validator, &trader.address(), "add", 10, 100))
                .is_ok());
        }
        for _ in 0..5 {
            assert!(app.check_tx(&order_tx(&trader, "0xMAKER")).is_ok());
        }
        assert!(app.check_tx(&rebalance_tx(&validators[0], 1, 0, 10)).is_ok());

        assert_eq!(app.committed_state(), before);
        assert_eq!(app.pending_broadcast(), 0);

        app.begin_block(1);
        app.commit().unwrap();
        let after = app.committed_state();
        assert_eq!(after.balances, before.balances);
        assert_eq!(after.round, before.round);
        assert_eq!(after.order_counter, 0);
    }

    #[test]
    fn test_malformed_and_forged_transactions() {
        let validators = validators(5);
        let (app, _bus) = application(genesis(&validators, &[]));

        let garbage = app.deliver_tx(b"not json at all");
        assert_eq!(garbage.log, "malformed transaction");
        assert_eq!(garbage.code, 1);

        let mut forged: serde_json::Value =
            serde_json::from_slice(&witness_tx(&validators[0], "0xAA", "add", 10, 100)).unwrap();
        forged["data"]["amount"] = json!(1_000_000);
        let forged = serde_json::to_vec(&forged).unwrap();
        assert_eq!(app.deliver_tx(&forged).log, "bad signature");

        let extra = signed(
            TxKind::Witness,
            json!({"staker": "0xAA", "type": "add", "block": 1, "amount": 1, "memo": "x"}),
            &validators[0],
        );
        assert!(app
            .deliver_tx(&extra)
            .log
            .starts_with("malformed witness payload"));
    }
}

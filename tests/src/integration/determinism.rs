//! # Determinism Tests
//!
//! Every replica fed the same blocks must report the same app hash, and a
//! node restarted from its snapshot must continue exactly where it stopped.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use node_runtime::Application;
    use os_01_crypto_envelope::Signer;
    use os_02_state_store::{FileSnapshotStorage, SnapshotStorage, State};
    use os_05_dispatcher::Dispatcher;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use shared_bus::OrderBus;
    use shared_types::Hash;

    use crate::fixtures::{
        application, application_with_storage, genesis, order_tx, rebalance_tx, validators,
        witness_tx,
    };

    /// Three blocks: deposits for two stakers, a rebalance, then orders.
    fn scripted_blocks(validators: &[Signer], traders: &[Signer]) -> Vec<Vec<Vec<u8>>> {
        let mut deposits = Vec::new();
        for (i, trader) in traders.iter().enumerate() {
            for validator in validators {
                deposits.push(witness_tx(
                    validator,
                    &trader.address(),
                    "add",
                    20 + i as u64,
                    100 * (i as u64 + 1),
                ));
            }
        }

        let rebalance = vec![rebalance_tx(&validators[0], 1, 0, 1_000)];

        let orders = traders
            .iter()
            .flat_map(|trader| (0..3).map(move |n| order_tx(trader, &format!("0xM{n}"))))
            .collect();

        vec![deposits, rebalance, orders]
    }

    fn run(app: &Application, blocks: &[Vec<Vec<u8>>], first_height: u64) -> Vec<Hash> {
        blocks
            .iter()
            .zip(first_height..)
            .map(|(txs, height)| {
                app.begin_block(height);
                for tx in txs {
                    app.deliver_tx(tx);
                }
                app.commit().unwrap().last_block_app_hash
            })
            .collect()
    }

    #[test]
    fn test_replicas_agree_on_every_app_hash() {
        let validators = validators(5);
        let traders = vec![Signer::from_seed([0xA1; 32]), Signer::from_seed([0xA2; 32])];
        let blocks = scripted_blocks(&validators, &traders);

        let (first, _) = application(genesis(&validators, &[]));
        let (second, _) = application(genesis(&validators, &[]));

        let a = run(&first, &blocks, 1);
        let b = run(&second, &blocks, 1);
        assert_eq!(a, b);
        assert_eq!(first.committed_state(), second.committed_state());

        // Every block changed the state, so no two hashes repeat.
        assert_ne!(a[0], a[1]);
        assert_ne!(a[1], a[2]);
        assert_eq!(first.committed_state().order_counter, 6);
    }

    #[test]
    fn test_vote_order_does_not_change_outcome() {
        let validators = validators(7);
        let staker = Signer::from_seed([0xB0; 32]).address();
        let mut votes: Vec<Vec<u8>> = validators
            .iter()
            .map(|v| witness_tx(v, &staker, "add", 40, 250))
            .collect();

        let (reference, _) = application(genesis(&validators, &[]));
        reference.begin_block(1);
        for vote in &votes {
            reference.deliver_tx(vote);
        }
        let expected = reference.commit().unwrap().last_block_app_hash;

        let mut rng = StdRng::seed_from_u64(0x05);
        for _ in 0..8 {
            votes.shuffle(&mut rng);
            let (replica, _) = application(genesis(&validators, &[]));
            replica.begin_block(1);
            for vote in &votes {
                replica.deliver_tx(vote);
            }
            assert_eq!(replica.commit().unwrap().last_block_app_hash, expected);
        }
    }

    #[test]
    fn test_different_histories_diverge() {
        let validators = validators(5);
        let staker = "0xCAFE";

        let (first, _) = application(genesis(&validators, &[]));
        let (second, _) = application(genesis(&validators, &[]));

        first.begin_block(1);
        second.begin_block(1);
        for validator in &validators {
            first.deliver_tx(&witness_tx(validator, staker, "add", 5, 10));
            second.deliver_tx(&witness_tx(validator, staker, "add", 5, 11));
        }
        assert_ne!(
            first.commit().unwrap().last_block_app_hash,
            second.commit().unwrap().last_block_app_hash
        );
    }

    #[test]
    fn test_restart_resumes_from_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let validators = validators(5);
        let traders = vec![Signer::from_seed([0xC1; 32])];
        let blocks = scripted_blocks(&validators, &traders);
        let genesis_state = genesis(&validators, &[]);

        let storage: Arc<dyn SnapshotStorage> = Arc::new(FileSnapshotStorage::new(dir.path()));
        let (original, _) = application_with_storage(genesis_state.clone(), storage);
        run(&original, &blocks[..2], 1);
        let before = original.info();
        drop(original);

        let storage: Arc<dyn SnapshotStorage> = Arc::new(FileSnapshotStorage::new(dir.path()));
        let restarted = Application::restore(
            genesis_state.clone(),
            Dispatcher::default(),
            Arc::new(OrderBus::new()),
            storage,
        )
        .unwrap();
        assert_eq!(restarted.info(), before);

        // The restarted node and a node that never stopped agree on the next block.
        let (uninterrupted, _) = application(genesis_state);
        let expected = run(&uninterrupted, &blocks, 1);
        let resumed = run(&restarted, &blocks[2..], 3);
        assert_eq!(resumed[0], expected[2]);
    }

    #[test]
    fn test_snapshot_round_trips_pending_events() {
        let validators = validators(5);
        let storage = Arc::new(os_02_state_store::InMemorySnapshotStorage::new());
        let (app, _) = application_with_storage(genesis(&validators, &[]), storage.clone());

        app.begin_block(1);
        for validator in validators.iter().take(3) {
            app.deliver_tx(&witness_tx(validator, "0xD00D", "add", 9, 77));
        }
        app.commit().unwrap();

        let saved: State = storage.load().unwrap().unwrap();
        assert_eq!(saved, app.committed_state());
        assert_eq!(saved.pending(9, "0xD00D").unwrap().voters.len(), 3);
        assert_eq!(saved.app_hash().unwrap(), saved.last_block_app_hash);
    }
}

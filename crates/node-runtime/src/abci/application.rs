//! # ABCI-style Application
//!
//! The surface the consensus engine drives. Transactions are decided by the
//! dispatcher; this layer owns the snapshots, the per-block order tracker and
//! the two side effects that happen at commit: persistence and broadcast.
//!
//! ## Block Flow
//!
//! ```text
//! begin_block(h) → deliver_tx* → commit()
//!                                   ├─ finalize: height, app hash, check := commit
//!                                   ├─ persist snapshot
//!                                   └─ broadcast tracked orders
//! ```

use crate::abci::responses::{AppError, CommitResponse, InfoResponse, TxResponse};
use os_02_state_store::{SnapshotStorage, State, StateStore};
use os_05_dispatcher::{Dispatcher, OrderTracker, Phase};
use parking_lot::Mutex;
use shared_bus::Emitter;
use std::sync::Arc;
use tracing::{debug, info};

/// Application version reported by `info`.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

struct Inner {
    store: StateStore,
    tracker: OrderTracker,
    /// Height announced by `begin_block`, consumed by `commit`.
    executing_height: Option<u64>,
}

/// The validator application.
pub struct Application {
    inner: Mutex<Inner>,
    dispatcher: Dispatcher,
    emitter: Arc<dyn Emitter>,
    storage: Arc<dyn SnapshotStorage>,
}

impl Application {
    /// Start from `initial` regardless of what `storage` holds.
    pub fn new(
        initial: State,
        dispatcher: Dispatcher,
        emitter: Arc<dyn Emitter>,
        storage: Arc<dyn SnapshotStorage>,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                store: StateStore::new(initial),
                tracker: OrderTracker::new(),
                executing_height: None,
            }),
            dispatcher,
            emitter,
            storage,
        }
    }

    /// Resume from the persisted snapshot, or from `genesis` if none exists.
    pub fn restore(
        genesis: State,
        dispatcher: Dispatcher,
        emitter: Arc<dyn Emitter>,
        storage: Arc<dyn SnapshotStorage>,
    ) -> Result<Self, AppError> {
        let initial = match storage.load()? {
            Some(state) => {
                info!(
                    height = state.last_block_height,
                    app_hash = %hex::encode(state.last_block_app_hash),
                    "Resuming from persisted snapshot"
                );
                state
            }
            None => {
                info!("No persisted snapshot, starting from genesis");
                genesis
            }
        };
        Ok(Self::new(initial, dispatcher, emitter, storage))
    }

    /// Mempool admission against the check snapshot.
    pub fn check_tx(&self, raw: &[u8]) -> TxResponse {
        let mut inner = self.inner.lock();
        let Inner { store, tracker, .. } = &mut *inner;
        self.dispatcher
            .dispatch(Phase::Check, raw, store, tracker)
            .into()
    }

    /// Execute a block transaction against the commit snapshot.
    pub fn deliver_tx(&self, raw: &[u8]) -> TxResponse {
        let mut inner = self.inner.lock();
        let Inner { store, tracker, .. } = &mut *inner;
        self.dispatcher
            .dispatch(Phase::Deliver, raw, store, tracker)
            .into()
    }

    /// Announce the height of the block about to be delivered.
    pub fn begin_block(&self, height: u64) {
        let mut inner = self.inner.lock();
        inner.executing_height = Some(height);
        debug!(height, "Begin block");
    }

    /// Finalize the current block.
    ///
    /// Errors are fatal: the consensus engine must stop rather than continue
    /// with state it could not persist or orders it could not publish. A
    /// failed save leaves the committed height, app hash and pending
    /// broadcast exactly as they were.
    pub fn commit(&self) -> Result<CommitResponse, AppError> {
        let mut inner = self.inner.lock();
        let height = match inner.executing_height.take() {
            Some(height) => height,
            None => inner.store.committed().last_block_height.saturating_add(1),
        };

        let storage = &self.storage;
        let app_hash = inner
            .store
            .finalize_block(height, |state| storage.save(state))?;
        let broadcast = inner.tracker.trigger_broadcast(self.emitter.as_ref())?;

        info!(
            height,
            app_hash = %hex::encode(app_hash),
            broadcast,
            round = inner.store.committed().round.number,
            "Block committed"
        );
        Ok(CommitResponse {
            last_block_height: height,
            last_block_app_hash: app_hash,
        })
    }

    /// Last committed height and app hash.
    pub fn info(&self) -> InfoResponse {
        let inner = self.inner.lock();
        let state = inner.store.committed();
        InfoResponse {
            version: APP_VERSION.to_string(),
            last_block_height: state.last_block_height,
            last_block_app_hash: state.last_block_app_hash,
        }
    }

    /// Write the committed snapshot, e.g. on shutdown.
    pub fn persist(&self) -> Result<(), AppError> {
        let inner = self.inner.lock();
        self.storage.save(inner.store.committed())?;
        Ok(())
    }

    /// Copy of the committed snapshot.
    pub fn committed_state(&self) -> State {
        self.inner.lock().store.committed().clone()
    }

    /// Orders delivered in the current block and not yet broadcast.
    pub fn pending_broadcast(&self) -> usize {
        self.inner.lock().tracker.len()
    }
}

use crate::domain::{entities::State, errors::StoreError};
use shared_types::Hash;
use tracing::debug;

/// Holds the check and commit snapshots.
///
/// `check` answers mempool admission and is never written by a handler.
/// `commit` receives every delivered transaction. At block boundaries
/// [`StateStore::finalize_block`] rebuilds `check` as a deep copy of `commit`.
#[derive(Clone, Debug)]
pub struct StateStore {
    check: State,
    commit: State,
}

impl StateStore {
    pub fn new(initial: State) -> Self {
        Self {
            check: initial.clone(),
            commit: initial,
        }
    }

    pub fn check(&self) -> &State {
        &self.check
    }

    pub fn committed(&self) -> &State {
        &self.commit
    }

    pub fn commit_mut(&mut self) -> &mut State {
        &mut self.commit
    }

    /// Discard check-side divergence and start from the committed state.
    pub fn reset_check(&mut self) {
        self.check = self.commit.clone();
    }

    /// Close out block `height`.
    ///
    /// Records the height and app hash on the commit snapshot, hands it to
    /// `persist`, then resets the check snapshot. If `persist` fails the
    /// height and hash are rolled back and the check snapshot is untouched,
    /// so the block can be finalized again.
    pub fn finalize_block<F>(&mut self, height: u64, persist: F) -> Result<Hash, StoreError>
    where
        F: FnOnce(&State) -> Result<(), StoreError>,
    {
        let last = self.commit.last_block_height;
        if height <= last {
            return Err(StoreError::StaleHeight {
                last,
                attempted: height,
            });
        }

        let previous_hash = self.commit.last_block_app_hash;
        self.commit.last_block_height = height;
        let sealed = self.commit.app_hash().and_then(|hash| {
            self.commit.last_block_app_hash = hash;
            persist(&self.commit).map(|()| hash)
        });
        let hash = match sealed {
            Ok(hash) => hash,
            Err(e) => {
                self.commit.last_block_height = last;
                self.commit.last_block_app_hash = previous_hash;
                return Err(e);
            }
        };
        self.reset_check();

        debug!(height, app_hash = %hex::encode(hash), "Block finalized");
        Ok(hash)
    }
}

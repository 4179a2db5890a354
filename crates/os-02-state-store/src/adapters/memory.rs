use crate::domain::{State, StoreError};
use crate::ports::SnapshotStorage;
use std::sync::RwLock;

/// In-memory implementation of SnapshotStorage for testing
pub struct InMemorySnapshotStorage {
    snapshot: RwLock<Option<State>>,
}

impl InMemorySnapshotStorage {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(None),
        }
    }

    /// Storage that already holds `state`, as if a previous run had saved it.
    pub fn with_state(state: State) -> Self {
        Self {
            snapshot: RwLock::new(Some(state)),
        }
    }
}

impl Default for InMemorySnapshotStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStorage for InMemorySnapshotStorage {
    fn save(&self, state: &State) -> Result<(), StoreError> {
        let mut snapshot = self
            .snapshot
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        *snapshot = Some(state.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<State>, StoreError> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(snapshot.clone())
    }
}

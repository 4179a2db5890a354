use crate::domain::{State, StoreError};

/// Durable home for the committed snapshot.
///
/// `save` is called once per commit with the finalized state. `load` is
/// called at startup; `None` means no snapshot exists yet and the node
/// starts from genesis.
pub trait SnapshotStorage: Send + Sync {
    fn save(&self, state: &State) -> Result<(), StoreError>;
    fn load(&self) -> Result<Option<State>, StoreError>;
}

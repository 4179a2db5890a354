//! JSON snapshot file.
//!
//! The snapshot is written to a sibling temp file and renamed over the
//! target, so a crash mid-write leaves the previous snapshot intact.

use crate::domain::{State, StoreError};
use crate::ports::SnapshotStorage;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name used inside the data directory.
pub const SNAPSHOT_FILE: &str = "state.json";

pub struct FileSnapshotStorage {
    path: PathBuf,
}

impl FileSnapshotStorage {
    /// Storage at `<data_dir>/state.json`. The directory is created on first save.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(SNAPSHOT_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, e: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        }
    }
}

impl SnapshotStorage for FileSnapshotStorage {
    fn save(&self, state: &State) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let bytes = serde_json::to_vec_pretty(state)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        debug!(
            path = %self.path.display(),
            height = state.last_block_height,
            bytes = bytes.len(),
            "Snapshot saved"
        );
        Ok(())
    }

    fn load(&self) -> Result<Option<State>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let state: State = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        info!(
            path = %self.path.display(),
            height = state.last_block_height,
            round = state.round.number,
            "Snapshot loaded"
        );
        Ok(Some(state))
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Snapshot I/O error at {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Snapshot storage lock poisoned")]
    LockPoisoned,

    #[error("Block height {attempted} does not advance past last committed {last}")]
    StaleHeight { last: u64, attempted: u64 },
}

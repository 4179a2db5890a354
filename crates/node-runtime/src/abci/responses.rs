use os_02_state_store::StoreError;
use serde::Serialize;
use shared_bus::BroadcastError;
use shared_types::{hash_hex, Hash, Vote};
use thiserror::Error;

/// Result of `check_tx` / `deliver_tx`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TxResponse {
    pub code: u32,
    pub log: String,
}

impl TxResponse {
    pub fn is_ok(&self) -> bool {
        self.code == Vote::CODE_VALID
    }
}

impl From<Vote> for TxResponse {
    fn from(vote: Vote) -> Self {
        Self {
            code: vote.code(),
            log: vote.log().to_string(),
        }
    }
}

/// Result of a successful `commit`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommitResponse {
    pub last_block_height: u64,
    #[serde(with = "hash_hex")]
    pub last_block_app_hash: Hash,
}

/// Result of `info`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub last_block_height: u64,
    #[serde(with = "hash_hex")]
    pub last_block_app_hash: Hash,
}

/// Failures the consensus engine must treat as fatal.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("State store failure: {0}")]
    Store(#[from] StoreError),

    #[error("Order broadcast failed: {0}")]
    Broadcast(#[from] BroadcastError),
}

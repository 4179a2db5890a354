//! # Genesis State Builder
//!
//! Creates the initial network state from a genesis file.

use os_01_crypto_envelope::address_from_base64;
use os_02_state_store::{State, StoreError};
use os_04_rebalance::generate_limits;
use serde::{Deserialize, Serialize};
use shared_types::{Amount, StakerId};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Default order bandwidth per round.
pub const DEFAULT_ROUND_LIMIT: u64 = 1000;

/// Default stream bandwidth per round.
pub const DEFAULT_STREAM_LIMIT: u64 = 1000;

/// Genesis creation errors.
#[derive(Debug, Error)]
pub enum GenesisError {
    /// The genesis file could not be read.
    #[error("Failed to read genesis file {path}: {reason}")]
    Io { path: String, reason: String },

    /// The genesis file is not valid genesis JSON.
    #[error("Malformed genesis: {0}")]
    Malformed(String),

    /// Invalid genesis configuration.
    #[error("Invalid genesis configuration: {0}")]
    InvalidConfig(String),

    /// A validator entry is not a valid public key.
    #[error("Invalid validator key at index {index}: {reason}")]
    InvalidValidator { index: usize, reason: String },

    /// Hashing the initial state failed.
    #[error("Failed to initialize genesis state: {0}")]
    StateInitFailed(#[from] StoreError),
}

/// Genesis file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisConfig {
    /// Network identifier.
    pub chain_id: String,

    /// Validator public keys, base64.
    #[serde(default)]
    pub validators: Vec<String>,

    /// Confirmed stake at genesis.
    #[serde(default)]
    pub balances: BTreeMap<StakerId, Amount>,

    /// Order bandwidth per round.
    #[serde(default = "default_round_limit")]
    pub round_limit: u64,

    /// Stream bandwidth per round.
    #[serde(default = "default_stream_limit")]
    pub stream_limit: u64,
}

fn default_round_limit() -> u64 {
    DEFAULT_ROUND_LIMIT
}

fn default_stream_limit() -> u64 {
    DEFAULT_STREAM_LIMIT
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            chain_id: "orderstream-devnet".to_string(),
            validators: Vec::new(),
            balances: BTreeMap::new(),
            round_limit: DEFAULT_ROUND_LIMIT,
            stream_limit: DEFAULT_STREAM_LIMIT,
        }
    }
}

impl GenesisConfig {
    /// Parse genesis JSON.
    pub fn from_json(bytes: &[u8]) -> Result<Self, GenesisError> {
        serde_json::from_slice(bytes).map_err(|e| GenesisError::Malformed(e.to_string()))
    }

    /// Read and parse a genesis file.
    pub fn load(path: &Path) -> Result<Self, GenesisError> {
        let bytes = std::fs::read(path).map_err(|e| GenesisError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&bytes)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), GenesisError> {
        if self.chain_id.trim().is_empty() {
            return Err(GenesisError::InvalidConfig(
                "chain_id must not be empty".to_string(),
            ));
        }

        if self.balances.keys().any(|staker| staker.is_empty()) {
            return Err(GenesisError::InvalidConfig(
                "Staker ids must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for the genesis state.
pub struct GenesisBuilder {
    config: GenesisConfig,
}

impl GenesisBuilder {
    /// Create a new genesis builder with configuration.
    pub fn new(config: GenesisConfig) -> Self {
        Self { config }
    }

    /// Override the per-round order bandwidth.
    pub fn with_round_limit(mut self, limit: u64) -> Self {
        self.config.round_limit = limit;
        self
    }

    /// Override the per-round stream bandwidth.
    pub fn with_stream_limit(mut self, limit: u64) -> Self {
        self.config.stream_limit = limit;
        self
    }

    pub fn config(&self) -> &GenesisConfig {
        &self.config
    }

    /// Build the genesis state.
    ///
    /// Round 0 starts with limits generated from the genesis balances, so
    /// genesis stakers can post before the first rebalance.
    pub fn build(self) -> Result<State, GenesisError> {
        self.config.validate()?;

        let mut state = State::new(self.config.round_limit, self.config.stream_limit);

        for (index, key) in self.config.validators.iter().enumerate() {
            let address =
                address_from_base64(key).map_err(|e| GenesisError::InvalidValidator {
                    index,
                    reason: e.to_string(),
                })?;
            if !state.validators.insert(address.clone()) {
                return Err(GenesisError::InvalidConfig(format!(
                    "Duplicate validator {address}"
                )));
            }
        }

        state.balances = self
            .config
            .balances
            .into_iter()
            .filter(|(_, balance)| !balance.is_zero())
            .collect();
        state.limits = generate_limits(&state);
        state.last_block_app_hash = state.app_hash()?;

        Ok(state)
    }
}

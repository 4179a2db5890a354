//! # Node Configuration
//!
//! Defaults for every parameter, overridden from `OS_*` environment
//! variables.
//!
//! ## Security Requirements
//!
//! - The validator key MUST be set in production: a node that signs with an
//!   ephemeral key cannot be recognized by the rest of the validator set.

use os_01_crypto_envelope::{CryptoError, Signer};
use std::path::PathBuf;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Validator identity.
    pub validator: ValidatorConfig,
    /// Consensus-relevant parameters.
    pub consensus: ConsensusConfig,
    /// Order broadcast configuration.
    pub broadcast: BroadcastConfig,
}

impl NodeConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_DATA_DIR) {
            config.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup(ENV_GENESIS) {
            config.storage.genesis_path = Some(PathBuf::from(path));
        }
        if let Some(key) = lookup(ENV_VALIDATOR_KEY) {
            config.validator.key = Some(key);
        }
        if let Some(value) = lookup(ENV_WITNESS_QUORUM) {
            config.consensus.witness_quorum = parse(ENV_WITNESS_QUORUM, &value)?;
        }
        if let Some(value) = lookup(ENV_PERIOD_LIMIT) {
            config.consensus.period_limit = Some(parse(ENV_PERIOD_LIMIT, &value)?);
        }
        if let Some(value) = lookup(ENV_STREAM_LIMIT) {
            config.consensus.stream_limit = Some(parse(ENV_STREAM_LIMIT, &value)?);
        }
        if let Some(value) = lookup(ENV_BROADCAST_CAPACITY) {
            config.broadcast.channel_capacity = parse(ENV_BROADCAST_CAPACITY, &value)?;
        }

        Ok(config)
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the validator key is missing or is not a valid keypair
    /// - the witness quorum or broadcast capacity is zero
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.validator.key.is_none() {
            return Err(ConfigError::MissingValidatorKey);
        }
        self.validator.signer()?;

        if self.consensus.witness_quorum == 0 {
            return Err(ConfigError::ZeroQuorum);
        }
        if self.broadcast.channel_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

pub const ENV_DATA_DIR: &str = "OS_DATA_DIR";
pub const ENV_GENESIS: &str = "OS_GENESIS";
pub const ENV_VALIDATOR_KEY: &str = "OS_VALIDATOR_KEY";
pub const ENV_WITNESS_QUORUM: &str = "OS_WITNESS_QUORUM";
pub const ENV_PERIOD_LIMIT: &str = "OS_PERIOD_LIMIT";
pub const ENV_STREAM_LIMIT: &str = "OS_STREAM_LIMIT";
pub const ENV_BROADCAST_CAPACITY: &str = "OS_BROADCAST_CAPACITY";

fn parse<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// No validator key configured.
    #[error("SECURITY VIOLATION: validator key is not set. Set OS_VALIDATOR_KEY to the base64 64-byte keypair.")]
    MissingValidatorKey,

    /// The validator key is not a usable keypair.
    #[error("Invalid validator key: {0}")]
    InvalidValidatorKey(#[from] CryptoError),

    /// A quorum of zero would apply events without attestation.
    #[error("Witness quorum must be at least 1")]
    ZeroQuorum,

    /// Subscribers need room for at least one event.
    #[error("Broadcast channel capacity must be at least 1")]
    ZeroCapacity,
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding the committed snapshot.
    pub data_dir: PathBuf,
    /// Genesis file. Absent means the built-in development genesis.
    pub genesis_path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            genesis_path: None,
        }
    }
}

/// Validator identity.
#[derive(Clone, Default)]
pub struct ValidatorConfig {
    /// Base64 of the 64-byte Ed25519 keypair.
    pub key: Option<String>,
}

impl ValidatorConfig {
    /// Parse the configured key, if any.
    pub fn signer(&self) -> Result<Option<Signer>, ConfigError> {
        self.key
            .as_deref()
            .map(Signer::from_base64)
            .transpose()
            .map_err(ConfigError::from)
    }
}

impl std::fmt::Debug for ValidatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorConfig")
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Consensus-relevant parameters. Must match across the validator set.
#[derive(Debug, Clone)]
pub struct ConsensusConfig {
    /// Distinct validator attestations needed to apply a witnessed event.
    pub witness_quorum: u64,
    /// Order bandwidth per round; overrides genesis when set.
    pub period_limit: Option<u64>,
    /// Stream bandwidth per round; overrides genesis when set.
    pub stream_limit: Option<u64>,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            witness_quorum: os_03_witness::DEFAULT_QUORUM,
            period_limit: None,
            stream_limit: None,
        }
    }
}

/// Order broadcast configuration.
#[derive(Debug, Clone)]
pub struct BroadcastConfig {
    /// Events queued per subscriber before commit fails.
    pub channel_capacity: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            channel_capacity: shared_bus::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = NodeConfig::default();
        assert_eq!(config.consensus.witness_quorum, 5);
        assert_eq!(config.broadcast.channel_capacity, 1000);
        assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
        assert!(config.storage.genesis_path.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = NodeConfig::from_lookup(lookup(&[
            ("OS_DATA_DIR", "/var/lib/os"),
            ("OS_GENESIS", "/etc/os/genesis.json"),
            ("OS_WITNESS_QUORUM", "7"),
            ("OS_PERIOD_LIMIT", "500"),
            ("OS_STREAM_LIMIT", " 50 "),
            ("OS_BROADCAST_CAPACITY", "64"),
        ]))
        .unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/os"));
        assert_eq!(
            config.storage.genesis_path,
            Some(PathBuf::from("/etc/os/genesis.json"))
        );
        assert_eq!(config.consensus.witness_quorum, 7);
        assert_eq!(config.consensus.period_limit, Some(500));
        assert_eq!(config.consensus.stream_limit, Some(50));
        assert_eq!(config.broadcast.channel_capacity, 64);
    }

    #[test]
    fn test_unparsable_value_is_error() {
        let err = NodeConfig::from_lookup(lookup(&[("OS_WITNESS_QUORUM", "five")])).unwrap_err();
        assert!(err.to_string().contains("OS_WITNESS_QUORUM"));
    }

    #[test]
    fn test_validate_rejects_missing_key() {
        let config = NodeConfig::default();
        assert!(matches!(
            config.validate_for_production(),
            Err(ConfigError::MissingValidatorKey)
        ));
    }

    #[test]
    fn test_validate_rejects_malformed_key() {
        let config =
            NodeConfig::from_lookup(lookup(&[("OS_VALIDATOR_KEY", "c2hvcnQ=")])).unwrap();
        assert!(matches!(
            config.validate_for_production(),
            Err(ConfigError::InvalidValidatorKey(_))
        ));
    }

    #[test]
    fn test_validate_accepts_real_key() {
        let key = Signer::generate().to_base64();
        let config = NodeConfig::from_lookup(lookup(&[("OS_VALIDATOR_KEY", key.as_str())])).unwrap();
        assert!(config.validate_for_production().is_ok());
        assert!(config.validator.signer().unwrap().is_some());
    }

    #[test]
    fn test_validate_rejects_zero_quorum() {
        let key = Signer::generate().to_base64();
        let config = NodeConfig::from_lookup(lookup(&[
            ("OS_VALIDATOR_KEY", key.as_str()),
            ("OS_WITNESS_QUORUM", "0"),
        ]))
        .unwrap();
        assert!(matches!(
            config.validate_for_production(),
            Err(ConfigError::ZeroQuorum)
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ValidatorConfig {
            key: Some("secret".to_string()),
        };
        assert!(!format!("{config:?}").contains("secret"));
    }
}

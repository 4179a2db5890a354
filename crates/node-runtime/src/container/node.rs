//! # Node Container
//!
//! Wires configuration, genesis, storage, the broadcast bus and the
//! application together.
//!
//! ## Bootstrap Order
//!
//! ```text
//! 1. Parse the validator key
//! 2. Load genesis (file or built-in)
//! 3. Open snapshot storage under the data directory
//! 4. Create the order bus
//! 5. Restore the application from the last snapshot, else genesis
//! ```
//!
//! Any failure here is a bootstrap failure and the node must not start.

use std::sync::Arc;

use os_01_crypto_envelope::Signer;
use os_02_state_store::{FileSnapshotStorage, SnapshotStorage};
use os_03_witness::WitnessConfig;
use os_05_dispatcher::{Dispatcher, DispatcherConfig};
use shared_bus::OrderBus;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::abci::{AppError, Application};
use crate::container::config::{ConfigError, NodeConfig};
use crate::genesis::{GenesisBuilder, GenesisConfig, GenesisError};

/// Bootstrap failures.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Genesis(#[from] GenesisError),

    #[error(transparent)]
    Application(#[from] AppError),

    /// More attestations are required than there are validators to give them.
    #[error("Witness quorum {quorum} exceeds the {validators} genesis validators; no staking event could ever apply")]
    QuorumUnreachable { quorum: u64, validators: usize },
}

/// Everything a running validator holds.
pub struct NodeContainer {
    /// Node configuration (immutable after initialization).
    pub config: NodeConfig,
    /// This validator's signing identity.
    pub signer: Signer,
    /// Broadcast bus subscribers attach to.
    pub bus: Arc<OrderBus>,
    /// The application the consensus engine drives.
    pub application: Arc<Application>,
}

impl NodeContainer {
    /// Bootstrap with file-backed snapshots under `config.storage.data_dir`.
    pub fn bootstrap(config: NodeConfig) -> Result<Self, BootstrapError> {
        let storage = Arc::new(FileSnapshotStorage::new(&config.storage.data_dir));
        Self::with_storage(config, storage)
    }

    /// Bootstrap with an explicit snapshot storage.
    #[instrument(name = "node_bootstrap", skip_all)]
    pub fn with_storage(
        config: NodeConfig,
        storage: Arc<dyn SnapshotStorage>,
    ) -> Result<Self, BootstrapError> {
        let signer = match config.validator.signer()? {
            Some(signer) => signer,
            None => {
                warn!("No validator key configured, using an ephemeral key");
                Signer::generate()
            }
        };

        let genesis_config = match &config.storage.genesis_path {
            Some(path) => {
                info!(path = %path.display(), "Loading genesis");
                GenesisConfig::load(path)?
            }
            None => GenesisConfig::default(),
        };
        let chain_id = genesis_config.chain_id.clone();

        let mut builder = GenesisBuilder::new(genesis_config);
        if let Some(limit) = config.consensus.period_limit {
            builder = builder.with_round_limit(limit);
        }
        if let Some(limit) = config.consensus.stream_limit {
            builder = builder.with_stream_limit(limit);
        }
        let genesis = builder.build()?;

        let quorum = config.consensus.witness_quorum;
        let validator_count = genesis.validators.len();
        if validator_count > 0 && quorum > validator_count as u64 {
            return Err(BootstrapError::QuorumUnreachable {
                quorum,
                validators: validator_count,
            });
        }

        let is_validator = genesis.validators.contains(&signer.address());
        if !genesis.validators.is_empty() && !is_validator {
            warn!(address = %signer.address(), "Node key is not in the genesis validator set");
        }

        let bus = Arc::new(OrderBus::with_capacity(config.broadcast.channel_capacity));
        let dispatcher = Dispatcher::new(DispatcherConfig {
            witness: WitnessConfig::with_quorum(config.consensus.witness_quorum),
        });
        let application = Arc::new(Application::restore(
            genesis,
            dispatcher,
            bus.clone(),
            storage,
        )?);

        info!(
            %chain_id,
            address = %signer.address(),
            quorum,
            validators = validator_count,
            "Node container initialized"
        );

        Ok(Self {
            config,
            signer,
            bus,
            application,
        })
    }

    /// Persist the committed snapshot before exit.
    pub fn shutdown(&self) -> Result<(), AppError> {
        info!("Persisting committed state");
        self.application.persist()
    }
}

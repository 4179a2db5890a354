//! # Node Runtime Library
//!
//! The validator application and everything needed to start it. The main
//! entry point is the `main.rs` binary.
//!
//! ## Modules
//!
//! - `abci/` - The application the consensus engine drives
//! - `container/` - Configuration and bootstrap wiring
//! - `genesis/` - Initial network state

#![warn(missing_docs)]
#![allow(missing_docs)] // TODO: document the response and config field types

pub mod abci;
pub mod container;
pub mod genesis;

pub use abci::{AppError, Application, CommitResponse, InfoResponse, TxResponse};
pub use container::{BootstrapError, ConfigError, NodeConfig, NodeContainer};
pub use genesis::{GenesisBuilder, GenesisConfig, GenesisError};

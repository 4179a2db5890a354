//! # Node Container
//!
//! Configuration and the bootstrap that turns it into a running application.

pub mod config;
pub mod node;

pub use config::{ConfigError, NodeConfig};
pub use node::{BootstrapError, NodeContainer};

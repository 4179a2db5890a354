//! # ABCI Surface
//!
//! What the consensus engine sees of the validator: per-transaction votes
//! mapped to response codes, and fatal errors only at commit.

pub mod application;
pub mod responses;

pub use application::{Application, APP_VERSION};
pub use responses::{AppError, CommitResponse, InfoResponse, TxResponse};

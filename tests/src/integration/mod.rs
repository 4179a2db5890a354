//! # Integration Tests
//!
//! Block-level scenarios that exercise every crate through
//! `node_runtime::Application`.

pub mod determinism;
pub mod flows;

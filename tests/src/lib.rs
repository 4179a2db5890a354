//! # OrderStream Test Suite
//!
//! Cross-crate integration flows driven through the validator application.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Signed transaction builders and validator sets
//! └── integration/      # End-to-end block flows
//!     ├── flows.rs      # Witness, rebalance and order lifecycles
//!     └── determinism.rs # Replicas, restarts and app hash agreement
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p os-tests
//! cargo test -p os-tests integration::flows::
//! ```

pub mod fixtures;
pub mod integration;

//! # OS-02 State Store
//!
//! The authoritative network state and the two snapshots the application
//! keeps of it.
//!
//! ## Dual Snapshot Model
//!
//! ```text
//!            genesis / persisted snapshot
//!                       │
//!          ┌────────────┴────────────┐
//!          ↓                         ↓
//!   [check snapshot]          [commit snapshot]
//!   check_tx reads only       deliver_tx mutates
//!          ↑                         │
//!          └──── deep copy ◄── commit() (app hash, persist)
//! ```
//!
//! The snapshots are owned values, never aliased: mutating one cannot affect
//! the other. All maps are ordered so the serialized state, and therefore
//! the app hash, is identical on every validator.
//!
//! ## Module Structure
//!
//! ```text
//! os-02-state-store/
//! ├── domain/    # State, Round, PendingWitness, StateStore, StoreError
//! ├── ports/     # SnapshotStorage
//! └── adapters/  # In-memory and JSON-file snapshot storage
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{FileSnapshotStorage, InMemorySnapshotStorage};
pub use domain::*;
pub use ports::SnapshotStorage;

pub mod storage;

pub use storage::SnapshotStorage;

pub mod file;
pub mod memory;

pub use file::FileSnapshotStorage;
pub use memory::InMemorySnapshotStorage;

//! In-process state backend with optional JSON snapshot persistence

pub mod snapshot;
pub mod store;

pub use snapshot::Snapshot;
pub use store::MemoryStore;

//! State backends for Caretrail.
//!
//! - [`state`] - the [`StateStore`](state::StateStore) trait and factory
//! - [`memory`] - in-process store with optional JSON snapshot
//! - [`postgresql`] - PostgreSQL table store
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind a trait so the ledger core
//! runs unchanged against any backend, including the memory store in tests.
//!
//! ```rust
//! use caretrail::adapters::memory::MemoryStore;
//! use caretrail::adapters::state::{StateStore, WriteBatch};
//!
//! # async fn example() -> caretrail::domain::Result<()> {
//! let store = MemoryStore::new();
//! let mut batch = WriteBatch::new();
//! batch.put("userCollection", "nurseA", b"{}".to_vec());
//! store.apply(batch).await?;
//! assert!(store.get("userCollection", "nurseA").await?.is_some());
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod postgresql;
pub mod state;

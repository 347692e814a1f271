//! Core ledger logic for Caretrail.
//!
//! # Modules
//!
//! - [`keys`] - composite key codec
//! - [`transaction`] / [`store`] - buffered write set and typed record store
//! - [`entities`] - entity creation, validation and secondary indexes
//! - [`authorization`] - actor identity check
//! - [`audit`] - access event logging
//! - [`mutation`] - in-place entity updates
//! - [`history`] - latest-event and access-trail reads
//! - [`command`] - invocation parsing
//! - [`ledger`] - dispatch and transaction boundary
//! - [`response`] - invocation result
//!
//! # Invocation Workflow
//!
//! 1. **Parse**: function name and arguments become a [`Command`]
//! 2. **Begin**: a [`RecordStore`] transaction is opened on the backend
//! 3. **Authorize** (query/modify): the actor's identity record must exist
//! 4. **Audit** (query/modify): the access event and its index marker are written
//! 5. **Effect**: create, read or update the target entity
//! 6. **Commit**: every write lands atomically, or none does
//!
//! # Example
//!
//! ```rust
//! use caretrail::adapters::memory::MemoryStore;
//! use caretrail::config::{CollectionsConfig, DuplicatePolicy};
//! use caretrail::core::Ledger;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let ledger = Ledger::new(
//!     Arc::new(MemoryStore::new()),
//!     CollectionsConfig::default(),
//!     DuplicatePolicy::Upsert,
//! );
//! let args = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
//!
//! ledger.invoke("createUser", args(&["nurseA", "Ann", "41", "555", "Main St"])).await;
//! ledger
//!     .invoke("createPatientInformation", args(&["P1", "INS-1", "med-A", "rec-1", "2024-01-01"]))
//!     .await;
//!
//! let response = ledger
//!     .invoke("query", args(&["nurseA", "P1", "ward-3", "userCollection"]))
//!     .await;
//! assert!(response.is_success());
//! # }
//! ```

pub mod audit;
pub mod authorization;
pub mod command;
pub mod entities;
pub mod history;
pub mod keys;
pub mod ledger;
pub mod mutation;
pub mod response;
pub mod store;
pub mod transaction;

pub use command::Command;
pub use keys::CompositeKey;
pub use ledger::Ledger;
pub use response::Response;
pub use store::RecordStore;

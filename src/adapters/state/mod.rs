//! State store abstraction layer
//!
//! [`StateStore`] is the seam between the ledger core and a durable backend.
//! [`create_state_store`] picks the implementation from configuration.

pub mod factory;
pub mod traits;

pub use factory::create_state_store;
pub use traits::{StateStore, WriteBatch, WriteOp};

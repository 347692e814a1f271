//! PostgreSQL state backend
//!
//! Stores every collection in a single `ledger_state` table keyed by
//! (collection, key).

pub mod adapter;
pub mod client;

pub use adapter::PostgreSQLAdapter;
pub use client::{redact_connection_string, PostgreSQLClient};

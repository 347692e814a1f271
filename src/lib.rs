// Caretrail - Access-audited healthcare record store
// Copyright (c) 2025 Caretrail Contributors
// Licensed under the MIT License

//! # Caretrail - Access-Audited Healthcare Records
//!
//! Caretrail stores patient information, medical records, drug information,
//! hospital fees and actor identities in named collections, and records who
//! read or changed patient data, from where, and why.
//!
//! ## Overview
//!
//! This library provides:
//! - **Creating** entities from positional string arguments, with a
//!   composite secondary index per entity kind
//! - **Authorizing** queries and modifications against a registered identity
//! - **Auditing** every query and modification as an [`domain::AccessEvent`]
//! - **Reading** the latest event per actor, or the full access trail
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Ledger logic (keys, transactions, entities, audit, history)
//! - [`adapters`] - State backends (in-memory with snapshots, PostgreSQL)
//! - [`domain`] - Entities, identifiers, access events and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use caretrail::adapters::state::create_state_store;
//! use caretrail::config::load_config;
//! use caretrail::core::Ledger;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("caretrail.toml")?;
//!     let store = create_state_store(&config).await?;
//!     let ledger = Ledger::from_config(store, &config);
//!
//!     let args = ["nurseA", "P1", "ward-3", "userCollection"]
//!         .iter()
//!         .map(|s| s.to_string())
//!         .collect();
//!     let response = ledger.invoke("query", args).await;
//!     println!("{response}");
//!     Ok(())
//! }
//! ```
//!
//! ## Access Trail
//!
//! Each audit collection keeps the latest event per actor and one index
//! entry per distinct (actor, patient, location, purpose):
//!
//! ```rust,no_run
//! use caretrail::core::{Command, Ledger};
//! use caretrail::domain::{ActorId, Purpose};
//!
//! # async fn example(ledger: &Ledger) -> caretrail::domain::Result<()> {
//! let trail = ledger
//!     .execute(Command::AccessTrail {
//!         actor: ActorId::new("nurseA").map_err(caretrail::domain::CareTrailError::InvalidArgument)?,
//!         purpose: Purpose::Query,
//!         subject: None,
//!     })
//!     .await?;
//! println!("{}", String::from_utf8_lossy(&trail));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is a [`domain::CareTrailError`]; its
//! [`kind`](domain::CareTrailError::kind) is the stable tag returned to
//! callers in [`core::Response::Error`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

//! Domain models and types for Caretrail.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ActorId`], [`RecordId`])
//! - **Entities** ([`PatientInformation`], [`MedicalRecord`], [`DrugInformation`],
//!   [`HospitalFees`], [`User`]) and the [`Entity`] / [`Mutable`] traits
//! - **Access events** ([`AccessEvent`], [`Purpose`])
//! - **Error types** ([`CareTrailError`], [`StoreError`], [`KeyError`])
//! - **Result type alias** ([`Result`])
//!
//! # Entities
//!
//! Entities are built from the positional arguments of their create call:
//!
//! ```rust
//! use caretrail::domain::{Entity, PatientInformation};
//!
//! # fn example() -> caretrail::domain::Result<()> {
//! let fields = ["P1", "INS-1", "med-A", "rec-ref-1", "2024-01-01"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let patient = PatientInformation::from_fields(fields)?;
//! assert_eq!(patient.id(), "P1");
//! assert_eq!(patient.kind_tag(), "PatientInformation");
//! # Ok(())
//! # }
//! ```

pub mod access_event;
pub mod entities;
pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use access_event::{AccessEvent, AccessTrailEntry, Purpose, ACCESS_EVENT_KIND};
pub use entities::{
    DrugInformation, DrugUpdate, Entity, EntityKind, HospitalFees, MedicalRecord, MedicalUpdate,
    Mutable, PatientInformation, PatientUpdate, User,
};
pub use errors::{CareTrailError, ErrorKind, KeyError, StoreError};
pub use ids::{ActorId, RecordId};
pub use result::Result;

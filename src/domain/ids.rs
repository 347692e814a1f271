//! Domain identifier types with validation
//!
//! Newtype wrappers that keep actor identities and record identifiers from
//! being mixed up. Both reject blank input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of the caller performing a query or modification
///
/// The value is opaque: it is whatever key the actor's identity record is
/// stored under in the identity collection.
///
/// # Examples
///
/// ```
/// use caretrail::domain::ids::ActorId;
/// use std::str::FromStr;
///
/// let actor = ActorId::from_str("nurseA").unwrap();
/// assert_eq!(actor.as_str(), "nurseA");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    /// Creates a new ActorId
    ///
    /// # Errors
    ///
    /// Returns `Err` if the id is empty
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.is_empty() {
            return Err("Actor ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the actor ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActorId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ActorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Primary identifier of a stored record (patient id, dispensation id, ...)
///
/// # Examples
///
/// ```
/// use caretrail::domain::ids::RecordId;
///
/// let id = RecordId::new("P1").unwrap();
/// assert_eq!(id.to_string(), "P1");
/// assert!(RecordId::new("").is_err());
/// assert!(RecordId::new("   ").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a new RecordId
    ///
    /// # Errors
    ///
    /// Returns `Err` if the id is empty
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.is_empty() {
            return Err("Record ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the record ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

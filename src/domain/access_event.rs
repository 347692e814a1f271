//! Access event domain model
//!
//! An access event records who touched which patient's data, from where,
//! when, and why. Events are appended on every query and modification.

use super::ids::{ActorId, RecordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind tag written into every serialized access event
pub const ACCESS_EVENT_KIND: &str = "Query";

/// Why patient data was accessed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    /// Read of patient data
    Query,
    /// Overwrite of patient data
    Modify,
}

impl Purpose {
    /// Wire name of the purpose
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Modify => "modify",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Purpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(Self::Query),
            "modify" => Ok(Self::Modify),
            other => Err(format!(
                "Invalid purpose '{other}'. Must be one of: query, modify"
            )),
        }
    }
}

/// Immutable record of a single access
///
/// # Examples
///
/// ```
/// use caretrail::domain::access_event::{AccessEvent, Purpose};
/// use caretrail::domain::ids::{ActorId, RecordId};
///
/// let event = AccessEvent::new(
///     ActorId::new("nurseA").unwrap(),
///     RecordId::new("P1").unwrap(),
///     "ward-3",
///     Purpose::Query,
/// );
/// assert_eq!(event.purpose, Purpose::Query);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEvent {
    /// Kind tag, always [`ACCESS_EVENT_KIND`]
    #[serde(rename = "docType")]
    pub object_type: String,

    /// Actor who performed the access
    #[serde(rename = "userid")]
    pub actor: ActorId,

    /// Patient whose data was accessed
    #[serde(rename = "patientid")]
    pub subject: RecordId,

    /// Caller-reported location
    pub location: String,

    /// Wall-clock time captured when the access was logged
    pub time: DateTime<Utc>,

    /// Query or modify
    pub purpose: Purpose,
}

impl AccessEvent {
    /// Creates an event stamped with the current time
    pub fn new(
        actor: ActorId,
        subject: RecordId,
        location: impl Into<String>,
        purpose: Purpose,
    ) -> Self {
        Self::at(actor, subject, location, purpose, Utc::now())
    }

    /// Creates an event with an explicit timestamp
    pub fn at(
        actor: ActorId,
        subject: RecordId,
        location: impl Into<String>,
        purpose: Purpose,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            object_type: ACCESS_EVENT_KIND.to_string(),
            actor,
            subject,
            location: location.into(),
            time,
            purpose,
        }
    }
}

/// One decoded entry of the actor × subject access index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTrailEntry {
    pub actor: String,
    pub subject: String,
    pub location: String,
    pub purpose: Purpose,
}

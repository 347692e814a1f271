//! Audit logger
//!
//! Every query and modification of patient data is recorded before the data
//! effect happens. An event is written twice:
//!
//! - as JSON under the actor id in the purpose's collection, overwriting the
//!   actor's previous event (latest-only lookup), and
//! - as a `0x00` marker under the `userid~patientid` composite key
//!   (actor, subject, location, purpose), which accumulates across calls and
//!   backs the access trail.

use crate::config::CollectionsConfig;
use crate::core::keys::CompositeKey;
use crate::core::store::RecordStore;
use crate::domain::{AccessEvent, ActorId, Purpose, RecordId, Result};

/// Index name of the access trail
pub const ACCESS_INDEX: &str = "userid~patientid";

/// Composite key recording that `actor` accessed `subject` from `location`
pub fn access_key(
    actor: &ActorId,
    subject: &RecordId,
    location: &str,
    purpose: Purpose,
) -> Result<CompositeKey> {
    CompositeKey::new(
        ACCESS_INDEX,
        [actor.as_str(), subject.as_str(), location, purpose.as_str()],
    )
}

/// Writes access events into the per-purpose audit collections
#[derive(Debug, Clone)]
pub struct AuditLogger {
    collections: CollectionsConfig,
}

impl AuditLogger {
    pub fn new(collections: &CollectionsConfig) -> Self {
        Self {
            collections: collections.clone(),
        }
    }

    /// Records one access stamped with the current UTC time
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the location contains a reserved character, or
    /// a serialization error; nothing is written in either case.
    pub fn log_access(
        &self,
        store: &mut RecordStore,
        actor: &ActorId,
        subject: &RecordId,
        location: &str,
        purpose: Purpose,
    ) -> Result<AccessEvent> {
        let key = access_key(actor, subject, location, purpose)?;
        let event = AccessEvent::new(actor.clone(), subject.clone(), location, purpose);
        let collection = self.collections.for_purpose(purpose);

        store.put_json(collection, actor.as_str(), &event)?;
        store.put_marker(collection, &key);

        tracing::info!(
            actor = %actor,
            subject = %subject,
            location = %location,
            purpose = %purpose,
            "Access recorded"
        );

        Ok(event)
    }
}

//! Access history reader
//!
//! Two views over the audit collections:
//!
//! - the latest event per actor and purpose (single-key read), and
//! - the access trail: every distinct (actor, subject, location, purpose)
//!   tuple recorded in the composite index, in key order.

use crate::config::CollectionsConfig;
use crate::core::audit::ACCESS_INDEX;
use crate::core::keys::CompositeKey;
use crate::core::store::RecordStore;
use crate::domain::{
    AccessTrailEntry, ActorId, CareTrailError, Purpose, RecordId, Result, StoreError,
};

#[derive(Debug, Clone)]
pub struct HistoryReader {
    collections: CollectionsConfig,
}

impl HistoryReader {
    pub fn new(collections: &CollectionsConfig) -> Self {
        Self {
            collections: collections.clone(),
        }
    }

    /// Serialized latest event of `purpose` for `actor`
    ///
    /// Earlier events of the same actor and purpose are overwritten at the
    /// primary key; use [`access_trail`](Self::access_trail) for the series.
    ///
    /// # Errors
    ///
    /// [`CareTrailError::NotFound`] if the actor has no recorded event.
    pub async fn read_access_history(
        &self,
        store: &RecordStore,
        purpose: Purpose,
        actor: &ActorId,
    ) -> Result<Vec<u8>> {
        let collection = self.collections.for_purpose(purpose);
        store
            .get(collection, actor.as_str())
            .await?
            .ok_or_else(|| CareTrailError::NotFound(format!("{purpose} history for '{actor}'")))
    }

    /// Distinct accesses of `purpose` by `actor`, optionally narrowed to one subject
    ///
    /// The index key carries no timestamp, so repeated identical accesses
    /// appear once.
    pub async fn access_trail(
        &self,
        store: &RecordStore,
        purpose: Purpose,
        actor: &ActorId,
        subject: Option<&RecordId>,
    ) -> Result<Vec<AccessTrailEntry>> {
        let mut prefix_fields = vec![actor.as_str()];
        if let Some(subject) = subject {
            prefix_fields.push(subject.as_str());
        }
        let prefix = CompositeKey::partial(ACCESS_INDEX, prefix_fields)?;

        let collection = self.collections.for_purpose(purpose);
        let rows = store.scan_prefix(collection, prefix.as_str()).await?;

        let entries = rows
            .into_iter()
            .map(|(key, _)| decode_trail_entry(key))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            actor = %actor,
            purpose = %purpose,
            entries = entries.len(),
            "Access trail read"
        );
        Ok(entries)
    }
}

fn decode_trail_entry(key: String) -> Result<AccessTrailEntry> {
    let key = CompositeKey::parse(key)?;
    let (index_name, fields) = key.split();

    match (index_name, fields.as_slice()) {
        (ACCESS_INDEX, [actor, subject, location, purpose]) => Ok(AccessTrailEntry {
            actor: actor.to_string(),
            subject: subject.to_string(),
            location: location.to_string(),
            purpose: purpose
                .parse::<Purpose>()
                .map_err(|e: String| StoreError::Corrupted(format!("access index entry {key}: {e}")))?,
        }),
        _ => Err(StoreError::Corrupted(format!("unexpected access index entry {key}")).into()),
    }
}

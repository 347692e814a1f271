//! Access authorization check
//!
//! An actor may read or modify patient data only if an identity record for
//! them exists in the collection named by the caller. The check is
//! existence-only; the record's contents are not inspected.

use crate::core::store::RecordStore;
use crate::domain::{ActorId, CareTrailError, Result};

/// Fails with `UnknownActor` unless `actor` has a record in `collection`
///
/// # Errors
///
/// - [`CareTrailError::UnknownActor`] when the identity record is absent
/// - storage errors from the underlying read
pub async fn authorize(store: &RecordStore, collection: &str, actor: &ActorId) -> Result<()> {
    if store.exists(collection, actor.as_str()).await? {
        return Ok(());
    }

    tracing::warn!(
        actor = %actor,
        collection = %collection,
        "Access denied: unknown actor"
    );
    Err(CareTrailError::UnknownActor {
        actor: actor.to_string(),
        collection: collection.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::adapters::state::StateStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_registered_actor_is_authorized() {
        let backend: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let mut store = RecordStore::begin(backend);
        store.put("userCollection", "nurseA", b"{}".to_vec());

        let actor = ActorId::new("nurseA").unwrap();
        assert!(authorize(&store, "userCollection", &actor).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_actor() {
        let backend: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let mut store = RecordStore::begin(backend);
        store.put("otherCollection", "ghost", b"{}".to_vec());

        let actor = ActorId::new("ghost").unwrap();
        let err = authorize(&store, "userCollection", &actor).await.unwrap_err();
        match err {
            CareTrailError::UnknownActor { actor, collection } => {
                assert_eq!(actor, "ghost");
                assert_eq!(collection, "userCollection");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

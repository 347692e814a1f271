//! Mutation applier
//!
//! Loads an existing entity, overwrites its mutable fields from an update,
//! and stores it back under the same id. The kind tag and id never change;
//! the secondary index marker follows the new field values.

use crate::core::entities::reindex;
use crate::core::store::RecordStore;
use crate::domain::{CareTrailError, Mutable, Result};

/// Applies field overwrites to any [`Mutable`] entity kind
#[derive(Debug, Clone, Copy, Default)]
pub struct MutationApplier;

impl MutationApplier {
    pub fn new() -> Self {
        Self
    }

    /// Overwrites the entity `id` in `collection` with `update`
    ///
    /// # Errors
    ///
    /// - [`CareTrailError::NotFound`] if no entity is stored under `id`
    /// - `Serialization` if the stored record is not an `E`
    pub async fn apply<E: Mutable>(
        &self,
        store: &mut RecordStore,
        collection: &str,
        id: &str,
        update: &E::Update,
    ) -> Result<E> {
        let previous: E = store
            .get_entity(collection, id)
            .await?
            .ok_or_else(|| CareTrailError::NotFound(format!("{} '{id}'", E::KIND)))?;

        let mut current = previous.clone();
        current.apply_update(update);

        store.put_entity(collection, &current)?;
        reindex(store, collection, Some(&previous), &current)?;

        tracing::debug!(kind = %E::KIND, id = %id, collection = %collection, "Entity updated");
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::adapters::state::StateStore;
    use crate::config::DuplicatePolicy;
    use crate::core::entities::{index_key, EntityManager};
    use crate::domain::{DrugInformation, Entity};
    use std::sync::Arc;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_apply_overwrites_fields_and_index() {
        let backend: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let mut store = RecordStore::begin(backend);
        let c = "DrugInformationCollection";

        let original =
            DrugInformation::from_fields(strings(&["P1", "Jane", "aspirin", "2025-12", "30", "dr-a"]))
                .unwrap();
        EntityManager::new(DuplicatePolicy::Upsert)
            .insert(&mut store, c, &original)
            .await
            .unwrap();

        let update =
            DrugInformation::update_from_fields(strings(&["Jane", "ibuprofen", "2026-01", "10", "dr-b"]))
                .unwrap();
        let updated = MutationApplier::new()
            .apply::<DrugInformation>(&mut store, c, "P1", &update)
            .await
            .unwrap();

        assert_eq!(updated.id(), "P1");
        assert_eq!(updated.kind_tag(), "DrugInformation");
        assert_eq!(updated.drug_name, "ibuprofen");

        let stored: DrugInformation = store.get_entity(c, "P1").await.unwrap().unwrap();
        assert_eq!(stored, updated);
        assert!(!store.exists(c, index_key(&original).unwrap().as_str()).await.unwrap());
        assert!(store.exists(c, index_key(&updated).unwrap().as_str()).await.unwrap());
    }

    #[tokio::test]
    async fn test_apply_missing_entity() {
        let backend: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let mut store = RecordStore::begin(backend);

        let update =
            DrugInformation::update_from_fields(strings(&["a", "b", "c", "d", "e"])).unwrap();
        let err = MutationApplier::new()
            .apply::<DrugInformation>(&mut store, "DrugInformationCollection", "P9", &update)
            .await
            .unwrap_err();
        assert!(matches!(err, CareTrailError::NotFound(_)));
        assert_eq!(err.to_string(), "DrugInformation 'P9' does not exist");
    }
}

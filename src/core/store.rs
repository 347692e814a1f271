//! Typed record store
//!
//! Wraps one [`Transaction`] with the operations the ledger needs: raw
//! get/put/exists/scan against named collections, JSON entity storage with a
//! kind-tag check, and secondary index markers.

use crate::adapters::state::StateStore;
use crate::core::keys::CompositeKey;
use crate::core::transaction::Transaction;
use crate::domain::{CareTrailError, Entity, Result};
use serde::Serialize;
use std::sync::Arc;

/// Value stored under every secondary index key
pub const INDEX_MARKER: [u8; 1] = [0x00];

/// Record store scoped to a single invocation
pub struct RecordStore {
    tx: Transaction,
}

impl RecordStore {
    /// Opens a fresh transaction on `store`
    pub fn begin(store: Arc<dyn StateStore>) -> Self {
        Self {
            tx: Transaction::begin(store),
        }
    }

    /// Raw value under `key`; `None` when unset
    pub async fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>> {
        self.tx.get(collection, key).await
    }

    pub async fn exists(&self, collection: &str, key: &str) -> Result<bool> {
        Ok(self.get(collection, key).await?.is_some())
    }

    /// Unconditional overwrite
    pub fn put(&mut self, collection: &str, key: &str, value: Vec<u8>) {
        self.tx.put(collection, key, value);
    }

    pub fn delete(&mut self, collection: &str, key: &str) {
        self.tx.delete(collection, key);
    }

    pub async fn scan_prefix(&self, collection: &str, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        self.tx.scan_prefix(collection, prefix).await
    }

    /// Serializes `value` as JSON under `key`
    pub fn put_json<T: Serialize>(&mut self, collection: &str, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.put(collection, key, bytes);
        Ok(())
    }

    /// Loads and decodes an entity, checking its kind tag
    ///
    /// # Errors
    ///
    /// Returns [`CareTrailError::Serialization`] if the stored bytes are not a
    /// record of kind `E`.
    pub async fn get_entity<E: Entity>(&self, collection: &str, id: &str) -> Result<Option<E>> {
        let Some(bytes) = self.get(collection, id).await? else {
            return Ok(None);
        };

        let entity: E = serde_json::from_slice(&bytes).map_err(|e| {
            CareTrailError::Serialization(format!(
                "record '{id}' in {collection} is not a valid {}: {e}",
                E::KIND
            ))
        })?;

        if entity.kind_tag() != E::KIND.as_str() {
            return Err(CareTrailError::Serialization(format!(
                "record '{id}' in {collection} has kind '{}', expected '{}'",
                entity.kind_tag(),
                E::KIND
            )));
        }

        Ok(Some(entity))
    }

    /// Stores an entity under its primary id
    pub fn put_entity<E: Entity>(&mut self, collection: &str, entity: &E) -> Result<()> {
        self.put_json(collection, entity.id(), entity)
    }

    pub fn put_marker(&mut self, collection: &str, key: &CompositeKey) {
        self.put(collection, key.as_str(), INDEX_MARKER.to_vec());
    }

    pub fn delete_marker(&mut self, collection: &str, key: &CompositeKey) {
        self.delete(collection, key.as_str());
    }

    /// Commits every write made through this store
    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::{DrugInformation, PatientInformation};

    fn patient() -> PatientInformation {
        PatientInformation::from_fields(
            ["P1", "INS-1", "med-A", "rec-ref-1", "2024-01-01"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_entity_roundtrip() {
        let backend: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let mut store = RecordStore::begin(backend.clone());

        store.put_entity("PatientInformationCollection", &patient()).unwrap();
        store.commit().await.unwrap();

        let store = RecordStore::begin(backend);
        let loaded: PatientInformation = store
            .get_entity("PatientInformationCollection", "P1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, patient());
        assert!(store.exists("PatientInformationCollection", "P1").await.unwrap());
        assert!(!store.exists("PatientInformationCollection", "P2").await.unwrap());
    }

    #[tokio::test]
    async fn test_kind_mismatch_is_rejected() {
        let backend: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let mut store = RecordStore::begin(backend);
        store.put_entity("shared", &patient()).unwrap();

        let err = store
            .get_entity::<DrugInformation>("shared", "P1")
            .await
            .unwrap_err();
        assert!(matches!(err, CareTrailError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_marker_value() {
        let backend: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let mut store = RecordStore::begin(backend);
        let key = CompositeKey::new("id~name", ["u1", "Ann"]).unwrap();

        store.put_marker("userCollection", &key);
        assert_eq!(
            store.get("userCollection", key.as_str()).await.unwrap(),
            Some(vec![0x00])
        );

        store.delete_marker("userCollection", &key);
        assert!(!store.exists("userCollection", key.as_str()).await.unwrap());
    }
}

//! In-process state store
//!
//! Collections are ordered maps behind a single async `RwLock`. When a
//! snapshot is attached, every applied batch is persisted before it becomes
//! visible, so a failed save leaves both memory and disk unchanged.

use super::snapshot::{Collections, Snapshot};
use crate::adapters::state::{StateStore, WriteBatch, WriteOp};
use crate::domain::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Memory-backed [`StateStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
    snapshot: Option<Snapshot>,
}

impl MemoryStore {
    /// Creates an empty, non-persistent store
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a store persisted to `path`, loading existing state if present
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let snapshot = Snapshot::new(path);
        let collections = snapshot.load().await?;

        tracing::debug!(
            path = %snapshot.path().display(),
            collections = collections.len(),
            "Loaded state snapshot"
        );

        Ok(Self {
            collections: RwLock::new(collections),
            snapshot: Some(snapshot),
        })
    }

    /// Number of keys currently held in `collection`
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, |entries| entries.len())
    }
}

fn apply_ops(collections: &mut Collections, batch: WriteBatch) {
    for op in batch {
        match op {
            WriteOp::Put {
                collection,
                key,
                value,
            } => {
                collections.entry(collection).or_default().insert(key, value);
            }
            WriteOp::Delete { collection, key } => {
                if let Some(entries) = collections.get_mut(&collection) {
                    entries.remove(&key);
                }
            }
        }
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn scan_prefix(&self, collection: &str, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let collections = self.collections.read().await;
        let Some(entries) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    async fn apply(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut collections = self.collections.write().await;
        match self.snapshot {
            Some(ref snapshot) => {
                let mut next = collections.clone();
                apply_ops(&mut next, batch);
                snapshot.save(&next).await?;
                *collections = next;
            }
            None => apply_ops(&mut collections, batch),
        }
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

//! Buffered write set over a [`StateStore`]
//!
//! Writes are held in memory until [`Transaction::commit`] hands them to the
//! backend as one [`WriteBatch`]. Reads consult the buffered writes first, so
//! an invocation observes its own effects. Dropping a transaction without
//! committing discards every buffered write.

use crate::adapters::state::{StateStore, WriteBatch};
use crate::domain::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Pending value for a key: `Some` for a put, `None` for a delete
type Pending = Option<Vec<u8>>;

/// One invocation's view of the state
pub struct Transaction {
    store: Arc<dyn StateStore>,
    writes: BTreeMap<String, BTreeMap<String, Pending>>,
}

impl Transaction {
    pub fn begin(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            writes: BTreeMap::new(),
        }
    }

    /// Reads a key, preferring this transaction's own writes
    pub async fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(pending) = self.writes.get(collection).and_then(|w| w.get(key)) {
            return Ok(pending.clone());
        }
        self.store.get(collection, key).await
    }

    /// Prefix scan merging committed state with buffered writes, in key order
    pub async fn scan_prefix(&self, collection: &str, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let mut merged: BTreeMap<String, Vec<u8>> = self
            .store
            .scan_prefix(collection, prefix)
            .await?
            .into_iter()
            .collect();

        if let Some(writes) = self.writes.get(collection) {
            for (key, pending) in writes
                .range(prefix.to_string()..)
                .take_while(|(key, _)| key.starts_with(prefix))
            {
                match pending {
                    Some(value) => {
                        merged.insert(key.clone(), value.clone());
                    }
                    None => {
                        merged.remove(key);
                    }
                }
            }
        }

        Ok(merged.into_iter().collect())
    }

    pub fn put(&mut self, collection: &str, key: &str, value: Vec<u8>) {
        self.writes
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), Some(value));
    }

    pub fn delete(&mut self, collection: &str, key: &str) {
        self.writes
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), None);
    }

    /// Number of distinct keys written so far
    pub fn pending_writes(&self) -> usize {
        self.writes.values().map(BTreeMap::len).sum()
    }

    /// Applies every buffered write atomically
    ///
    /// A read-only transaction commits without touching the backend.
    ///
    /// # Errors
    ///
    /// Propagates the backend's commit failure; nothing is applied in that case.
    pub async fn commit(self) -> Result<()> {
        if self.pending_writes() == 0 {
            return Ok(());
        }

        let mut batch = WriteBatch::new();
        for (collection, writes) in self.writes {
            for (key, pending) in writes {
                match pending {
                    Some(value) => batch.put(collection.clone(), key, value),
                    None => batch.delete(collection.clone(), key),
                }
            }
        }

        let count = batch.len();
        self.store.apply(batch).await?;
        tracing::trace!(
            writes = count,
            backend = self.store.backend_name(),
            "Transaction committed"
        );
        Ok(())
    }
}

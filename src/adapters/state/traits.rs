//! State store abstraction traits
//!
//! This module defines the trait a key-value backend must implement to hold
//! Caretrail's collections. The backend provides durability and applies a
//! whole batch of writes atomically; everything else (typing, indexing,
//! auditing) lives in [`crate::core`].

use crate::domain::Result;
use async_trait::async_trait;

/// A single write inside a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Set `key` in `collection` to `value`, replacing any previous value
    Put {
        collection: String,
        key: String,
        value: Vec<u8>,
    },

    /// Remove `key` from `collection`; removing an absent key is a no-op
    Delete { collection: String, key: String },
}

impl WriteOp {
    /// Collection the write targets
    pub fn collection(&self) -> &str {
        match self {
            Self::Put { collection, .. } | Self::Delete { collection, .. } => collection,
        }
    }

    /// Key the write targets
    pub fn key(&self) -> &str {
        match self {
            Self::Put { key, .. } | Self::Delete { key, .. } => key,
        }
    }
}

/// Ordered set of writes committed as one unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Creates an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a put
    pub fn put(&mut self, collection: impl Into<String>, key: impl Into<String>, value: Vec<u8>) {
        self.ops.push(WriteOp::Put {
            collection: collection.into(),
            key: key.into(),
            value,
        });
    }

    /// Appends a delete
    pub fn delete(&mut self, collection: impl Into<String>, key: impl Into<String>) {
        self.ops.push(WriteOp::Delete {
            collection: collection.into(),
            key: key.into(),
        });
    }

    /// Number of writes in the batch
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the batch holds no writes
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterates the writes in order
    pub fn iter(&self) -> std::slice::Iter<'_, WriteOp> {
        self.ops.iter()
    }
}

impl IntoIterator for WriteBatch {
    type Item = WriteOp;
    type IntoIter = std::vec::IntoIter<WriteOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

/// Key-value state backend with named collections
///
/// Implementations must:
/// - return `Ok(None)` from `get` for an unset key (never an error), keeping an
///   empty stored value distinguishable from absence;
/// - apply every write of a batch or none of them;
/// - surface backend failures as [`crate::domain::StoreError`] without retrying.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Test the backend connection
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable.
    async fn test_connection(&self) -> Result<()>;

    /// Read a single key
    ///
    /// # Returns
    ///
    /// `Ok(Some(bytes))` if the key is set, `Ok(None)` otherwise.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Read every key in `collection` starting with `prefix`, in key order
    async fn scan_prefix(&self, collection: &str, prefix: &str) -> Result<Vec<(String, Vec<u8>)>>;

    /// Atomically apply a batch of writes
    ///
    /// # Errors
    ///
    /// Returns an error if the batch could not be committed; in that case no
    /// write of the batch is visible.
    async fn apply(&self, batch: WriteBatch) -> Result<()>;

    /// Short backend name for logging
    fn backend_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_batch_preserves_order() {
        let mut batch = WriteBatch::new();
        batch.put("a", "k1", vec![1]);
        batch.delete("a", "k0");
        batch.put("b", "k2", vec![]);

        assert_eq!(batch.len(), 3);
        let keys: Vec<&str> = batch.iter().map(WriteOp::key).collect();
        assert_eq!(keys, vec!["k1", "k0", "k2"]);
        assert_eq!(batch.iter().nth(2).unwrap().collection(), "b");
    }

    #[test]
    fn test_empty_batch() {
        assert!(WriteBatch::new().is_empty());
    }
}

//! JSON snapshot persistence for the memory backend
//!
//! Values are arbitrary bytes, so they are stored base64-encoded. Writes go to
//! a sibling temp file that is then renamed over the target, so a crash leaves
//! either the previous snapshot or the new one.

use crate::domain::{Result, StoreError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Collection name -> ordered key/value map
pub type Collections = BTreeMap<String, BTreeMap<String, Vec<u8>>>;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    collections: BTreeMap<String, BTreeMap<String, String>>,
}

/// Snapshot file location
#[derive(Debug, Clone)]
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot; a missing file yields empty collections
    pub async fn load(&self) -> Result<Collections> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Collections::new()),
            Err(e) => {
                return Err(StoreError::Snapshot(format!(
                    "Failed to read snapshot {}: {}",
                    self.path.display(),
                    e
                ))
                .into())
            }
        };

        let file: SnapshotFile = serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::Corrupted(format!(
                "Snapshot {} is not valid JSON: {}",
                self.path.display(),
                e
            ))
        })?;

        if file.version != SNAPSHOT_VERSION {
            return Err(StoreError::Corrupted(format!(
                "Unsupported snapshot version {} in {}",
                file.version,
                self.path.display()
            ))
            .into());
        }

        let mut collections = Collections::new();
        for (collection, entries) in file.collections {
            let mut decoded = BTreeMap::new();
            for (key, value) in entries {
                let bytes = STANDARD.decode(value).map_err(|e| {
                    StoreError::Corrupted(format!(
                        "Invalid value for key {key:?} in collection {collection}: {e}"
                    ))
                })?;
                decoded.insert(key, bytes);
            }
            collections.insert(collection, decoded);
        }

        Ok(collections)
    }

    /// Writes the snapshot through a temp file and rename
    pub async fn save(&self, collections: &Collections) -> Result<()> {
        let file = SnapshotFile {
            version: SNAPSHOT_VERSION,
            collections: collections
                .iter()
                .map(|(name, entries)| {
                    let encoded = entries
                        .iter()
                        .map(|(key, value)| (key.clone(), STANDARD.encode(value)))
                        .collect();
                    (name.clone(), encoded)
                })
                .collect(),
        };

        let json = serde_json::to_vec_pretty(&file)
            .map_err(|e| StoreError::Snapshot(format!("Failed to encode snapshot: {e}")))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    StoreError::Snapshot(format!(
                        "Failed to create snapshot directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, &json).await.map_err(|e| {
            StoreError::Snapshot(format!(
                "Failed to write snapshot {}: {}",
                tmp_path.display(),
                e
            ))
        })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            StoreError::Snapshot(format!(
                "Failed to replace snapshot {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }
}

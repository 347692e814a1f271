//! State store factory
//!
//! Builds the configured [`StateStore`] backend.

use crate::adapters::memory::MemoryStore;
use crate::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
use crate::adapters::state::StateStore;
use crate::config::schema::{CareTrailConfig, StoreBackend};
use crate::domain::{CareTrailError, Result};
use std::sync::Arc;

/// Create a state store based on the configuration
///
/// The memory backend is loaded from `store.snapshot_path` when set. The
/// PostgreSQL backend connects and applies the schema migration before
/// returning.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be read, the PostgreSQL section
/// is missing, or the database is unreachable.
pub async fn create_state_store(config: &CareTrailConfig) -> Result<Arc<dyn StateStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            let store = match config.store.snapshot_path {
                Some(ref path) => {
                    tracing::info!(path = %path, "Opening memory state store from snapshot");
                    MemoryStore::open(path).await?
                }
                None => {
                    tracing::info!("Creating ephemeral memory state store");
                    MemoryStore::new()
                }
            };
            Ok(Arc::new(store) as Arc<dyn StateStore>)
        }
        StoreBackend::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                CareTrailError::Configuration(
                    "postgresql configuration is required when store.backend = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL state store");
            let client = PostgreSQLClient::new(pg_config.clone()).await?;
            client.ensure_schema().await?;

            Ok(Arc::new(PostgreSQLAdapter::new(client)) as Arc<dyn StateStore>)
        }
    }
}

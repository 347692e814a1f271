//! PostgreSQL adapter implementing [`StateStore`]
//!
//! All collections live in the single `ledger_state` table. A batch runs in
//! one SQL transaction with a local statement timeout.

use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::state::{StateStore, WriteBatch, WriteOp};
use crate::domain::{CareTrailError, Result, StoreError};
use async_trait::async_trait;
use std::sync::Arc;

const SELECT_ONE: &str = "SELECT value FROM ledger_state WHERE collection = $1 AND key = $2";

const SELECT_RANGE: &str = r#"
    SELECT key, value FROM ledger_state
    WHERE collection = $1 AND key >= $2 AND key < $3
    ORDER BY key
"#;

const UPSERT: &str = r#"
    INSERT INTO ledger_state (collection, key, value, updated_at)
    VALUES ($1, $2, $3, NOW())
    ON CONFLICT (collection, key) DO UPDATE SET
        value = EXCLUDED.value,
        updated_at = EXCLUDED.updated_at
"#;

const DELETE: &str = "DELETE FROM ledger_state WHERE collection = $1 AND key = $2";

/// PostgreSQL-backed [`StateStore`]
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }
}

/// Exclusive upper bound of every byte string starting with `prefix`
///
/// Keys are UTF-8, which never contains 0xFF, so appending it bounds the range.
fn prefix_upper_bound(prefix: &str) -> Vec<u8> {
    let mut upper = prefix.as_bytes().to_vec();
    upper.push(0xFF);
    upper
}

fn decode_key(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        StoreError::Corrupted(format!("Stored key is not valid UTF-8: {e}")).into()
    })
}

#[async_trait]
impl StateStore for PostgreSQLAdapter {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let client = self.client.get_connection().await?;
        client
            .execute(self.client.statement_timeout_sql(false).as_str(), &[])
            .await
            .map_err(|e| StoreError::ReadFailed(format!("Failed to set statement timeout: {e}")))?;

        let row = client
            .query_opt(SELECT_ONE, &[&collection, &key.as_bytes()])
            .await
            .map_err(|e| StoreError::ReadFailed(format!("Query failed: {e}")))?;

        Ok(row.map(|row| row.get::<_, Vec<u8>>(0)))
    }

    async fn scan_prefix(&self, collection: &str, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let client = self.client.get_connection().await?;
        client
            .execute(self.client.statement_timeout_sql(false).as_str(), &[])
            .await
            .map_err(|e| StoreError::ReadFailed(format!("Failed to set statement timeout: {e}")))?;

        let upper = prefix_upper_bound(prefix);
        let rows = client
            .query(SELECT_RANGE, &[&collection, &prefix.as_bytes(), &upper.as_slice()])
            .await
            .map_err(|e| StoreError::ReadFailed(format!("Range query failed: {e}")))?;

        rows.into_iter()
            .map(|row| Ok((decode_key(row.get(0))?, row.get::<_, Vec<u8>>(1))))
            .collect()
    }

    async fn apply(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let count = batch.len();
        let mut client = self.client.get_connection().await?;
        let tx = client
            .transaction()
            .await
            .map_err(|e| StoreError::CommitFailed(format!("Failed to begin transaction: {e}")))?;

        tx.execute(self.client.statement_timeout_sql(true).as_str(), &[])
            .await
            .map_err(|e| StoreError::CommitFailed(format!("Failed to set statement timeout: {e}")))?;

        for op in batch {
            let result = match op {
                WriteOp::Put {
                    ref collection,
                    ref key,
                    ref value,
                } => {
                    tx.execute(UPSERT, &[collection, &key.as_bytes(), value])
                        .await
                }
                WriteOp::Delete {
                    ref collection,
                    ref key,
                } => tx.execute(DELETE, &[collection, &key.as_bytes()]).await,
            };
            result.map_err(|e| -> CareTrailError {
                StoreError::CommitFailed(format!(
                    "Write to {} failed: {}",
                    op.collection(),
                    e
                ))
                .into()
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::CommitFailed(format!("Commit failed: {e}")))?;

        tracing::debug!(writes = count, "Committed batch to PostgreSQL");
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "postgresql"
    }
}

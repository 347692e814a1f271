//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Caretrail configuration file.

use crate::adapters::postgresql::redact_connection_string;
use crate::config::{load_config, CareTrailConfig, StoreBackend};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// [`load_config`] already validates, so a config that loads is valid.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!();
                for line in summary(&config) {
                    println!("{line}");
                }
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2)
            }
        }
    }
}

fn summary(config: &CareTrailConfig) -> Vec<String> {
    let c = &config.collections;
    let mut lines = vec![
        "Configuration Summary:".to_string(),
        format!("  Log Level: {}", config.application.log_level),
        format!("  Store Backend: {:?}", config.store.backend),
        format!("  Duplicate Policy: {:?}", config.store.duplicate_policy),
    ];

    match config.store.backend {
        StoreBackend::Memory => lines.push(format!(
            "  Snapshot: {}",
            config.store.snapshot_path.as_deref().unwrap_or("(not persisted)")
        )),
        StoreBackend::PostgreSQL => {
            if let Some(ref pg) = config.postgresql {
                lines.push(format!(
                    "  PostgreSQL Connection: {}",
                    redact_connection_string(pg.connection_string.expose_secret().as_str())
                ));
                lines.push(format!("  Max Connections: {}", pg.max_connections));
            }
        }
    }

    lines.push(format!(
        "  Entity Collections: {}, {}, {}, {}",
        c.patient_information, c.medical_record, c.drug_information, c.hospital_fees
    ));
    lines.push(format!("  Audit Collections: {}, {}", c.query_log, c.modify_log));
    lines.push(format!("  Identity Collection: {}", c.identity));
    lines.push(format!(
        "  File Logging: {}",
        if config.logging.local_enabled {
            config.logging.local_path.as_str()
        } else {
            "disabled"
        }
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{secret_string, PostgreSQLConfig};

    #[test]
    fn test_summary_hides_credentials() {
        let config = CareTrailConfig {
            store: crate::config::StoreConfig {
                backend: StoreBackend::PostgreSQL,
                ..Default::default()
            },
            postgresql: Some(PostgreSQLConfig {
                connection_string: secret_string(
                    "postgresql://ledger:s3cret@db:5432/caretrail".to_string(),
                ),
                max_connections: 10,
                connection_timeout_seconds: 30,
                statement_timeout_seconds: 60,
            }),
            ..Default::default()
        };

        let text = summary(&config).join("\n");
        assert!(!text.contains("s3cret"));
        assert!(text.contains("db:5432/caretrail"));
        assert!(text.contains("queryCollection, modifyCollection"));
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute("/nonexistent/caretrail.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}

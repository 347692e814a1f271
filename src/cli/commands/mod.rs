//! CLI command implementations
//!
//! Each command returns its process exit code:
//! 0 success, 2 configuration error, 3 invocation failed,
//! 4 store connection error, 5 fatal.

pub mod history;
pub mod init;
pub mod invoke;
pub mod validate;

use crate::adapters::state::{create_state_store, StateStore};
use crate::config::{load_config, CareTrailConfig};
use crate::domain::ErrorKind;
use std::sync::Arc;

/// Loads the configuration and opens its store, or yields the exit code to stop with
pub(crate) async fn open_store(
    config_path: &str,
) -> Result<(CareTrailConfig, Arc<dyn StateStore>), i32> {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(config_path = %config_path, error = %e, "Failed to load configuration");
            eprintln!("❌ Failed to load configuration: {e}");
            return Err(2);
        }
    };

    match create_state_store(&config).await {
        Ok(store) => {
            tracing::debug!(backend = store.backend_name(), "Store opened");
            Ok((config, store))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to open store");
            eprintln!("❌ Failed to open {:?} store: {e}", config.store.backend);
            match e.kind() {
                ErrorKind::Configuration => Err(2),
                _ => Err(4),
            }
        }
    }
}

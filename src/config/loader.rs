//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{CareTrailConfig, DuplicatePolicy, PostgreSQLConfig, StoreBackend};
use super::secret::secret_string;
use crate::domain::errors::CareTrailError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// Steps, in order:
/// 1. Read the file
/// 2. Substitute `${VAR}` placeholders outside comment lines
/// 3. Parse the TOML into [`CareTrailConfig`]
/// 4. Apply `CARETRAIL_*` environment overrides
/// 5. Validate
///
/// # Errors
///
/// Returns [`CareTrailError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, parsing fails or validation
/// rejects a value.
///
/// # Examples
///
/// ```no_run
/// use caretrail::config::load_config;
///
/// let config = load_config("caretrail.toml").expect("Failed to load config");
/// println!("backend: {:?}", config.store.backend);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CareTrailConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CareTrailError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CareTrailError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: CareTrailConfig = toml::from_str(&contents)
        .map_err(|e| CareTrailError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        CareTrailError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Replaces `${VAR_NAME}` placeholders with environment values
///
/// Comment lines are copied untouched. Every missing variable is reported at
/// once rather than failing on the first.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| CareTrailError::Configuration(format!("Invalid placeholder pattern: {e}")))?;
    let mut output = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            output.push(line.to_string());
            continue;
        }

        let replaced = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        output.push(replaced.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(CareTrailError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(output.join("\n"))
}

/// Applies `CARETRAIL_<SECTION>_<KEY>` environment overrides
///
/// `CARETRAIL_POSTGRESQL_CONNECTION_STRING` creates the `[postgresql]` section
/// when the file has none, so a deployment can keep credentials out of the
/// file entirely.
fn apply_env_overrides(config: &mut CareTrailConfig) -> Result<()> {
    if let Ok(val) = std::env::var("CARETRAIL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Store
    if let Ok(val) = std::env::var("CARETRAIL_STORE_BACKEND") {
        config.store.backend = match val.to_lowercase().as_str() {
            "memory" => StoreBackend::Memory,
            "postgresql" => StoreBackend::PostgreSQL,
            other => {
                return Err(CareTrailError::Configuration(format!(
                    "Invalid CARETRAIL_STORE_BACKEND '{other}'. Must be one of: memory, postgresql"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("CARETRAIL_STORE_DUPLICATE_POLICY") {
        config.store.duplicate_policy = match val.to_lowercase().as_str() {
            "upsert" => DuplicatePolicy::Upsert,
            "reject" => DuplicatePolicy::Reject,
            other => {
                return Err(CareTrailError::Configuration(format!(
                    "Invalid CARETRAIL_STORE_DUPLICATE_POLICY '{other}'. Must be one of: upsert, reject"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("CARETRAIL_STORE_SNAPSHOT_PATH") {
        config.store.snapshot_path = Some(val);
    }

    // PostgreSQL
    if let Ok(val) = std::env::var("CARETRAIL_POSTGRESQL_CONNECTION_STRING") {
        match config.postgresql {
            Some(ref mut pg) => pg.connection_string = secret_string(val),
            None => {
                config.postgresql = Some(PostgreSQLConfig {
                    connection_string: secret_string(val),
                    max_connections: 10,
                    connection_timeout_seconds: 30,
                    statement_timeout_seconds: 60,
                })
            }
        }
    }
    if let Some(ref mut pg) = config.postgresql {
        if let Ok(val) = std::env::var("CARETRAIL_POSTGRESQL_MAX_CONNECTIONS") {
            if let Ok(max) = val.parse() {
                pg.max_connections = max;
            }
        }
        if let Ok(val) = std::env::var("CARETRAIL_POSTGRESQL_STATEMENT_TIMEOUT_SECONDS") {
            if let Ok(timeout) = val.parse() {
                pg.statement_timeout_seconds = timeout;
            }
        }
    }

    // Logging
    if let Ok(val) = std::env::var("CARETRAIL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("CARETRAIL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("CARETRAIL_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

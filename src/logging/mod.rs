//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - console output on stderr
//! - optional JSON log files with daily/hourly rotation
//! - invocation timing macros
//!
//! # Example
//!
//! ```no_run
//! use caretrail::config::LoggingConfig;
//! use caretrail::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(actor = "nurseA", "Access recorded");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a ledger invocation
///
/// # Example
///
/// ```no_run
/// use caretrail::log_invocation_start;
///
/// log_invocation_start!("query", 4);
/// ```
#[macro_export]
macro_rules! log_invocation_start {
    ($function:expr, $arg_count:expr) => {
        tracing::info!(
            function = %$function,
            args = $arg_count,
            "Invocation started"
        );
    };
}

/// Log the successful end of a ledger invocation with its duration
///
/// # Example
///
/// ```no_run
/// use caretrail::log_invocation_complete;
/// use std::time::Duration;
///
/// log_invocation_complete!("query", Duration::from_millis(3));
/// ```
#[macro_export]
macro_rules! log_invocation_complete {
    ($function:expr, $duration:expr) => {
        tracing::info!(
            function = %$function,
            elapsed_ms = $duration.as_millis() as u64,
            "Invocation completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use caretrail::log_error_with_context;
/// use caretrail::domain::CareTrailError;
///
/// let error = CareTrailError::NotFound("PatientInformation 'P1'".to_string());
/// log_error_with_context!(&error, "query");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            kind = %$error.kind(),
            context = %$context,
            "Invocation failed"
        );
    };
}

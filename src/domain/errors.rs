//! Domain error types
//!
//! This module defines the error hierarchy for Caretrail. Every failure that
//! reaches a caller carries a stable [`ErrorKind`] tag plus a human-readable
//! message. Storage backend errors are wrapped in [`StoreError`] so that no
//! third-party driver types leak out of the adapters.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main Caretrail error type
///
/// This is the primary error type used throughout the crate.
#[derive(Debug, Error)]
pub enum CareTrailError {
    /// Wrong number of positional arguments for a function
    #[error("{function}: expecting {expected} argument(s), got {actual}")]
    Arity {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// A required argument was blank (1-based position)
    #[error("argument {position} must be declared")]
    EmptyField { position: usize },

    /// The requesting actor has no identity record in the named collection
    #[error("actor '{actor}' does not exist in collection '{collection}'")]
    UnknownActor { actor: String, collection: String },

    /// Target entity or access event is absent
    #[error("{0} does not exist")]
    NotFound(String),

    /// Create targeted an existing identifier under the reject policy
    #[error("record '{id}' already exists in collection '{collection}'")]
    AlreadyExists { id: String, collection: String },

    /// Collaborator store failure
    #[error("Storage unavailable: {0}")]
    Storage(#[from] StoreError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Composite key could not be built or decoded
    #[error("Invalid key input: {0}")]
    InvalidKey(#[from] KeyError),

    /// An argument is present but malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Function name does not map to any command
    #[error("Received unknown function invocation: {0}")]
    UnknownFunction(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl CareTrailError {
    /// Returns the stable tag for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Arity { .. } => ErrorKind::ArityError,
            Self::EmptyField { .. } => ErrorKind::EmptyFieldError,
            Self::UnknownActor { .. } => ErrorKind::UnknownActor,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::Storage(_) | Self::Io(_) => ErrorKind::StorageUnavailable,
            Self::Serialization(_) => ErrorKind::SerializationError,
            Self::InvalidKey(_) => ErrorKind::InvalidKeyInput,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::UnknownFunction(_) => ErrorKind::UnknownFunction,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }
}

/// Stable error tags surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    ArityError,
    EmptyFieldError,
    UnknownActor,
    NotFound,
    AlreadyExists,
    StorageUnavailable,
    SerializationError,
    InvalidKeyInput,
    InvalidArgument,
    UnknownFunction,
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// State store errors
///
/// Errors raised by a storage backend. These don't expose driver types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to connect to the backend
    #[error("Failed to connect to state store: {0}")]
    ConnectionFailed(String),

    /// A read failed
    #[error("Read failed: {0}")]
    ReadFailed(String),

    /// A batch could not be committed
    #[error("Commit failed: {0}")]
    CommitFailed(String),

    /// Snapshot file could not be loaded or written
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Stored bytes are not in the expected shape
    #[error("Corrupted state: {0}")]
    Corrupted(String),
}

/// Composite key construction and decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Index name is blank
    #[error("index name cannot be empty")]
    EmptyIndexName,

    /// A component contains a reserved code point
    #[error("component {position} contains reserved character U+{code:04X}")]
    ReservedCharacter { position: usize, code: u32 },

    /// Key does not follow the composite layout
    #[error("malformed composite key: {0}")]
    Malformed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for CareTrailError {
    fn from(err: std::io::Error) -> Self {
        CareTrailError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CareTrailError {
    fn from(err: serde_json::Error) -> Self {
        CareTrailError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CareTrailError {
    fn from(err: toml::de::Error) -> Self {
        CareTrailError::Configuration(format!("TOML parse error: {err}"))
    }
}

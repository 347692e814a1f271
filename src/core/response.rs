//! Invocation responses
//!
//! Every invocation ends in either a payload (possibly empty) or a tagged
//! error. Errors never escape [`Ledger::invoke`](crate::core::ledger::Ledger::invoke)
//! as Rust errors; callers branch on the variant.

use crate::domain::{CareTrailError, ErrorKind, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Invocation committed; `payload` is empty for create and modify calls
    Success { payload: Vec<u8> },
    /// Invocation failed and wrote nothing
    Error { kind: ErrorKind, message: String },
}

impl Response {
    pub fn success(payload: Vec<u8>) -> Self {
        Self::Success { payload }
    }

    pub fn error(err: &CareTrailError) -> Self {
        Self::Error {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Self::Success { payload } => Some(payload.as_slice()),
            Self::Error { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Error { kind, .. } => Some(*kind),
        }
    }
}

impl From<Result<Vec<u8>>> for Response {
    fn from(result: Result<Vec<u8>>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(err) => Self::error(&err),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { payload } => f.write_str(&String::from_utf8_lossy(payload)),
            Self::Error { kind, message } => write!(f, "{kind}: {message}"),
        }
    }
}

//! Shared error kinds surfaced by the core
//!
//! Object store, codec, and DAG errors propagate to the caller without
//! partial rollback; the CLI layer formats them into a single diagnostic
//! line. Merge-specific outcomes live in `artifacts::merge`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested object or reference is absent
    #[error("object {0} not found")]
    NotFound(String),

    /// A parsed object violates its format
    ///
    /// Unknown header lines are tolerated; structural violations (such as a
    /// commit without a `tree` line) are not.
    #[error("malformed {kind} object: {reason}")]
    MalformedObject {
        kind: &'static str,
        reason: String,
    },

    /// Underlying filesystem failure during read, write, create, or remove
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

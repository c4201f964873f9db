pub mod ancestor;
pub mod three_way;

use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;
use thiserror::Error;

/// Merge failures that abort before any mutation
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("merge: unknown branch '{0}'")]
    UnknownBranch(String),

    #[error("merge: current branch has no commits")]
    EmptyHead,

    #[error("merge: no common ancestor between {0} and {1}")]
    NoCommonAncestor(ObjectId, ObjectId),
}

/// Outcome of a merge that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A merge commit was created with the given ID
    Merged(ObjectId),

    /// Current and incoming heads were already identical; nothing to do
    AlreadyUpToDate,

    /// At least one path had an irreconcilable change. The working tree
    /// and index hold the fallback merged set; no commit was created.
    Conflicted(Vec<PathBuf>),
}

//! Three-way merge of file sets
//!
//! Combines an ancestor, a current, and an incoming file set into a merged
//! set, reporting the paths that cannot be reconciled mechanically.
//!
//! For every path in the union of the three key sets, the digests on each
//! side (absent treated as empty) decide the outcome:
//!
//! - current and incoming agree: keep that side (covers the unchanged case,
//!   converged changes, and agreement on deletion)
//! - only the incoming side diverged from the ancestor: take it (change or
//!   deletion)
//! - only the current side diverged from the ancestor: keep it (change or
//!   deletion)
//! - both sides diverged differently: conflict; the current side is kept
//!   as a fallback and the path is reported
//!
//! Conflicts are surfaced per path; no conflict markers are written into
//! file contents.

use crate::artifacts::objects::tree::FileSet;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Result of a three-way resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResolution {
    /// The merged file set; on conflicts it holds the current-side fallback
    merged: FileSet,
    /// Paths with irreconcilable changes, in path order
    conflicts: Vec<PathBuf>,
}

impl MergeResolution {
    pub fn merged(&self) -> &FileSet {
        &self.merged
    }

    pub fn conflicts(&self) -> &[PathBuf] {
        &self.conflicts
    }

    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn into_parts(self) -> (FileSet, Vec<PathBuf>) {
        (self.merged, self.conflicts)
    }
}

/// Resolve ancestor, current, and incoming file sets into a merged set
pub fn resolve(ancestor: &FileSet, current: &FileSet, incoming: &FileSet) -> MergeResolution {
    let paths: BTreeSet<&Path> = ancestor
        .keys()
        .chain(current.keys())
        .chain(incoming.keys())
        .map(PathBuf::as_path)
        .collect();

    let mut merged = FileSet::new();
    let mut conflicts = Vec::new();

    for path in paths {
        let base = ancestor.get(path);
        let ours = current.get(path);
        let theirs = incoming.get(path);

        let outcome = if ours == theirs {
            ours
        } else if base == ours {
            theirs
        } else if base == theirs {
            ours
        } else {
            conflicts.push(path.to_path_buf());
            ours
        };

        if let Some(oid) = outcome {
            merged.insert(path.to_path_buf(), oid.clone());
        }
    }

    MergeResolution { merged, conflicts }
}

//! Object type tags
//!
//! Every object in the database is a blob, a tree, or a commit. The type is
//! not recorded in the object file itself (objects are stored as raw bytes);
//! it is implied by the referencing context: a commit's `tree` line names a
//! tree, a tree's entry lines carry a `blob`/`tree` kind field, and refs
//! point at commits.

use anyhow::anyhow;

/// Mode field written for blob entries in tree objects
pub const BLOB_MODE: &str = "100644";

/// Mode field written for subtree entries in tree objects
pub const TREE_MODE: &str = "40000";

/// The three kinds of objects stored in the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// The mode field used when this type appears as a tree entry
    ///
    /// Commits never appear inside trees.
    pub fn entry_mode(&self) -> &'static str {
        match self {
            ObjectType::Blob => BLOB_MODE,
            ObjectType::Tree | ObjectType::Commit => TREE_MODE,
        }
    }

    /// Parse the kind field of a tree entry line
    pub fn try_parse_entry_kind(kind: &str) -> anyhow::Result<Self> {
        match kind {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            _ => Err(anyhow!("unknown tree entry kind: {}", kind)),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

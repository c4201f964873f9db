//! Object database
//!
//! The database stores all objects (blobs, trees, commits) using
//! content-addressable storage. Objects are identified by their SHA-1 hash
//! and stored in a directory structure based on the hash prefix for
//! efficient lookup.
//!
//! ## Storage Format
//!
//! Objects are stored as:
//! - Path: `.minigit/objects/ab/cdef123...` (first 2 chars as directory,
//!   rest as filename)
//! - Content: the raw serialized bytes, uncompressed and unframed
//!
//! Writes go through a temp-file-then-rename step so a crashed write never
//! leaves a truncated object under its final name. The database performs no
//! validation that stored bytes hash to their name; callers own that
//! invariant.

use crate::artifacts::core::CoreError;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::{FileSet, Tree};
use anyhow::Context;
use bytes::Bytes;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

/// Content-addressed object database
///
/// Manages storage and retrieval of immutable objects. Objects are
/// write-once and never deleted.
#[derive(Debug)]
pub struct Database {
    /// Path to the objects directory (typically `.minigit/objects`)
    path: Box<Path>,
}

impl Database {
    /// Create a new database instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the objects directory (typically `.minigit/objects`)
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    /// Get the path to the objects directory
    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Load raw object bytes from the database
    ///
    /// # Arguments
    ///
    /// * `object_id` - The SHA-1 hash identifying the object
    ///
    /// # Returns
    ///
    /// The object content, or a typed NotFound error when absent
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        match std::fs::read(&object_path) {
            Ok(content) => Ok(Bytes::from(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(CoreError::NotFound(object_id.to_string()).into())
            }
            Err(err) => Err(CoreError::Io(err)).context(format!(
                "Unable to read object file {}",
                object_path.display()
            )),
        }
    }

    /// Store an object in the database
    ///
    /// The object is serialized and written to the path derived from its
    /// SHA-1 hash. Storing an already-present object is a no-op, which
    /// makes `store` idempotent for identical content.
    ///
    /// # Arguments
    ///
    /// * `object` - Any object implementing the Object trait
    ///
    /// # Returns
    ///
    /// The stored object's ID
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, object.serialize()?)?;
        }

        Ok(object_id)
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let file_name = object_path
            .file_name()
            .context(format!("Invalid object path {}", object_path.display()))?
            .to_string_lossy()
            .to_string();
        let temp_object_path = object_dir.join(format!("tmp-{}", file_name));

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    /// Load and parse a blob object
    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let content = self.load(object_id)?;
        Blob::deserialize(Cursor::new(content))
    }

    /// Load and parse a tree object
    pub fn load_tree(&self, object_id: &ObjectId) -> anyhow::Result<Tree> {
        let content = self.load(object_id)?;
        Tree::deserialize(Cursor::new(content))
    }

    /// Load and parse a commit object
    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let content = self.load(object_id)?;
        Commit::deserialize(Cursor::new(content))
            .with_context(|| format!("Unable to parse commit {}", object_id))
    }

    /// Flatten a tree hierarchy into a file set
    ///
    /// Recursively walks the tree rooted at `tree_oid`, joining entry names
    /// onto `base`, and records every blob as `path -> digest`.
    ///
    /// # Arguments
    ///
    /// * `tree_oid` - Root tree to flatten
    /// * `base` - Path prefix for the entries of this tree (empty at root)
    pub fn tree_files(&self, tree_oid: &ObjectId, base: &Path) -> anyhow::Result<FileSet> {
        let tree = self.load_tree(tree_oid)?;
        let mut files = FileSet::new();

        for (name, record) in tree.entries() {
            let path = if base.as_os_str().is_empty() {
                PathBuf::from(name)
            } else {
                base.join(name)
            };

            match record.kind {
                ObjectType::Blob => {
                    files.insert(path, record.oid.clone());
                }
                ObjectType::Tree => {
                    files.extend(self.tree_files(&record.oid, &path)?);
                }
                ObjectType::Commit => {}
            }
        }

        Ok(files)
    }

    /// Flatten the tree referenced by a commit
    pub fn commit_files(&self, commit_oid: &ObjectId) -> anyhow::Result<FileSet> {
        let commit = self.load_commit(commit_oid)?;
        self.tree_files(commit.tree_oid(), Path::new(""))
    }

    /// Store a tree hierarchy, children first
    ///
    /// Every subtree is written as its own object so any tree digest in a
    /// stored parent resolves to a present object.
    pub fn store_tree(&self, tree: &Tree) -> anyhow::Result<ObjectId> {
        tree.traverse(&|subtree| {
            self.store(subtree)?;
            Ok(())
        })?;

        tree.object_id()
    }
}

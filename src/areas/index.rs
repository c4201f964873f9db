//! Index (staging area)
//!
//! The index tracks which files should be included in the next commit, as a
//! flat mapping from working-tree-relative path to blob digest.
//!
//! ## Index File Format
//!
//! One entry per line:
//!
//! ```text
//! <path> <digest>
//! ```
//!
//! Lines split on the first space, so paths containing spaces are not
//! representable; the add command rejects them up front. The file is
//! truncated and rewritten in full on every update, in path order.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::FileSet;
use anyhow::Context;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

/// The staging area
///
/// Tracks files staged for the next commit. Loaded from disk at the start
/// of a command, mutated in memory, and persisted before exit.
#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.minigit/index`)
    path: Box<Path>,
    /// Staged files mapped by path
    entries: FileSet,
    /// Flag indicating if the index has been modified since loading
    changed: bool,
}

impl Index {
    /// Create a new empty index
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the index file (typically `.minigit/index`)
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: FileSet::new(),
            changed: false,
        }
    }

    /// Get the path to the index file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a staged digest by path
    pub fn entry_by_path(&self, path: &Path) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    /// Iterate over staged entries in path order
    pub fn entries(&self) -> impl Iterator<Item = (&PathBuf, &ObjectId)> {
        self.entries.iter()
    }

    /// Get a copy of the staged file set
    pub fn file_set(&self) -> FileSet {
        self.entries.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load the index from disk
    ///
    /// An absent index file means an empty staging area, not an error.
    /// Lines split on the first space; lines without a space are skipped.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        self.changed = false;

        let content = match std::fs::read_to_string(self.path()) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => {
                return Err(err).context(format!(
                    "Unable to read index file {}",
                    self.path().display()
                ));
            }
        };

        for line in content.lines() {
            if let Some((path, digest)) = line.split_once(' ') {
                let oid = ObjectId::try_parse(digest.to_string())
                    .with_context(|| format!("Invalid digest in index entry for {}", path))?;
                self.entries.insert(PathBuf::from(path), oid);
            }
        }

        Ok(())
    }

    /// Stage a file
    pub fn add(&mut self, path: PathBuf, oid: ObjectId) {
        self.entries.insert(path, oid);
        self.changed = true;
    }

    /// Remove a staged file
    pub fn remove(&mut self, path: &Path) {
        if self.entries.remove(path).is_some() {
            self.changed = true;
        }
    }

    /// Remove every staged entry at or under the given path
    pub fn remove_under(&mut self, path: &Path) {
        let stale: Vec<PathBuf> = self
            .entries
            .keys()
            .filter(|entry| *entry == path || entry.starts_with(path))
            .cloned()
            .collect();

        for entry in stale {
            self.entries.remove(&entry);
            self.changed = true;
        }
    }

    /// Replace the whole staging area with the given file set
    pub fn replace_all(&mut self, files: FileSet) {
        self.entries = files;
        self.changed = true;
    }

    /// Persist the index to disk
    ///
    /// Truncates and rewrites the file under an exclusive advisory lock.
    /// A no-op when nothing changed since loading.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())
            .with_context(|| format!("Unable to open index file {}", self.path().display()))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut content = String::new();
        for (path, oid) in &self.entries {
            content.push_str(&format!("{} {}\n", path.display(), oid.as_ref()));
        }

        lock.deref_mut().write_all(content.as_bytes())?;
        self.changed = false;

        Ok(())
    }
}

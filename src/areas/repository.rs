//! Repository handle and coordination
//!
//! This module provides the main `Repository` type that coordinates all
//! repository operations. It acts as a facade over the lower-level
//! components (database, index, workspace, refs) and carries the
//! per-invocation state explicitly, so there is no process-wide mutable
//! state and tests can run in parallel.
//!
//! ## Architecture
//!
//! The repository holds:
//! - Database: object storage (blobs, trees, commits)
//! - Index: staging area for the next commit
//! - Workspace: working directory operations
//! - Refs: branch and HEAD management
//!
//! All I/O is synchronous; a command loads state from disk at start,
//! mutates it in memory, and persists it before returning.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::{METADATA_DIR, Workspace};
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Object database directory name
const DATABASE_DIR: &str = "objects";

/// Index file name
const INDEX_FILE: &str = "index";

/// Repository handle
///
/// Coordinates all repository operations and provides access to the
/// database, index, workspace, and refs subsystems. This is the main entry
/// point for every command.
///
/// ## Usage
///
/// ```ignore
/// let mut repo = Repository::new(PathBuf::from("."), Box::new(stdout()))?;
/// repo.init()?;
/// repo.add(&["file.txt".to_string()])?;
/// repo.commit("Initial commit")?;
/// ```
pub struct Repository {
    /// Repository root path
    path: Box<Path>,
    /// Output writer (stdout in production, a buffer in tests)
    writer: RefCell<Box<dyn std::io::Write>>,
    /// Index (staging area)
    index: RefCell<Index>,
    /// Object database
    database: Database,
    /// Working directory
    workspace: Workspace,
    /// Reference manager
    refs: Refs,
}

impl Repository {
    pub fn new(path: PathBuf, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }
        let path = path.canonicalize()?;

        let index = Index::new(path.join(METADATA_DIR).join(INDEX_FILE).into_boxed_path());
        let database = Database::new(path.join(METADATA_DIR).join(DATABASE_DIR).into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(path.join(METADATA_DIR).into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}

//! Working directory operations
//!
//! The workspace is the user's checkout. The core mutates it only through
//! the reconciliation step, which brings the tree in line with a target
//! file set in three passes:
//!
//! 1. Clean: remove tracked-set strangers (regular files not in the
//!    target). Failures are downgraded to warnings so a single locked file
//!    never leaves the tree half-reconciled.
//! 2. Remove empty directories, deepest first.
//! 3. Restore: write every target blob, creating parent directories.
//!
//! The `.minigit` metadata directory is never traversed into or mutated.

use crate::areas::database::Database;
use crate::artifacts::objects::tree::FileSet;
use anyhow::Context;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const METADATA_DIR: &str = ".minigit";

const IGNORED_PATHS: [&str; 3] = [METADATA_DIR, ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List workspace files under the given root, relative to the workspace
    ///
    /// Defaults to the whole workspace. A file path yields just that file.
    pub fn list_files(&self, root_file_path: Option<PathBuf>) -> anyhow::Result<Vec<PathBuf>> {
        let root_file_path = match root_file_path {
            Some(p) => std::fs::canonicalize(p)?,
            None => self.path.clone().into(),
        };

        if !root_file_path.exists() {
            anyhow::bail!("The specified path does not exist: {:?}", root_file_path);
        }

        if root_file_path.is_dir() {
            Ok(WalkDir::new(&root_file_path)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| self.check_if_not_ignored_file_path(entry.path()))
                .collect::<Vec<_>>())
        } else {
            Ok(vec![
                root_file_path
                    .strip_prefix(self.path.as_ref())
                    .map(PathBuf::from)
                    .unwrap_or_default(),
            ])
        }
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                let name_str = name.to_string_lossy();
                IGNORED_PATHS.contains(&name_str.as_ref())
            } else {
                false
            }
        })
    }

    fn check_if_not_ignored_file_path(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() && !Self::is_ignored(path) {
            Some(path.strip_prefix(self.path.as_ref()).ok()?.to_path_buf())
        } else {
            None
        }
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<String> {
        let file_path = self.path.join(file_path);

        let content = std::fs::read_to_string(&file_path)
            .with_context(|| format!("Unable to read file {}", file_path.display()))?;

        Ok(content)
    }

    /// Write content to a workspace file, creating parent directories
    pub fn write_file(&self, file_path: &Path, content: &str) -> anyhow::Result<()> {
        let file_path = self.path.join(file_path);

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Unable to create directory {}", parent.display())
            })?;
        }

        std::fs::write(&file_path, content)
            .with_context(|| format!("Unable to write file {}", file_path.display()))?;

        Ok(())
    }

    /// Bring the working tree in line with a target file set
    ///
    /// The caller is responsible for updating the index to match.
    pub fn reconcile(&self, target: &FileSet, database: &Database) -> anyhow::Result<()> {
        self.clean(target);
        self.remove_empty_directories();
        self.restore(target, database)?;

        Ok(())
    }

    /// Remove regular files whose path is not in the target set
    ///
    /// Failures are recorded as warnings; cleaning never aborts.
    fn clean(&self, keep: &FileSet) {
        let strangers: Vec<PathBuf> = WalkDir::new(self.path.as_ref())
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| self.check_if_not_ignored_file_path(entry.path()))
            .filter(|relative_path| !keep.contains_key(relative_path))
            .collect();

        for relative_path in strangers {
            if let Err(err) = std::fs::remove_file(self.path.join(&relative_path)) {
                eprintln!(
                    "Warning: could not remove file {}: {}",
                    relative_path.display(),
                    err
                );
            }
        }
    }

    /// Delete empty directories, deepest first
    ///
    /// Sorting by descending path length guarantees children are attempted
    /// before their parents. Removal errors (non-empty, permissions) are
    /// ignored.
    fn remove_empty_directories(&self) {
        let mut directories: Vec<PathBuf> = WalkDir::new(self.path.as_ref())
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.path() != self.path.as_ref()
                    && entry.path().is_dir()
                    && !Self::is_ignored(entry.path())
            })
            .map(|entry| entry.path().to_path_buf())
            .collect();

        directories.sort_by_key(|dir| std::cmp::Reverse(dir.as_os_str().len()));

        for dir in directories {
            let _ = std::fs::remove_dir(dir);
        }
    }

    /// Write every target blob to its path
    fn restore(&self, target: &FileSet, database: &Database) -> anyhow::Result<()> {
        for (path, oid) in target {
            let blob = database
                .load_blob(oid)
                .with_context(|| format!("Unable to restore {}", path.display()))?;
            self.write_file(path, blob.content())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::object::Object;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn workspace() -> (TempDir, Workspace, Database) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());
        let database = Database::new(
            dir.path()
                .join(METADATA_DIR)
                .join("objects")
                .into_boxed_path(),
        );
        (dir, workspace, database)
    }

    fn store_blob(database: &Database, content: &str) -> crate::artifacts::objects::object_id::ObjectId {
        database.store(&Blob::new(content.to_string())).unwrap()
    }

    #[rstest]
    fn lists_files_recursively_ignoring_metadata(workspace: (TempDir, Workspace, Database)) {
        let (_dir, workspace, database) = workspace;
        store_blob(&database, "seed the metadata directory");
        workspace.write_file(Path::new("a.txt"), "one").unwrap();
        workspace.write_file(Path::new("sub/b.txt"), "two").unwrap();

        let mut files = workspace.list_files(None).unwrap();
        files.sort();

        assert_eq!(files, vec![PathBuf::from("a.txt"), PathBuf::from("sub/b.txt")]);
    }

    #[rstest]
    fn reconcile_restores_target_contents(workspace: (TempDir, Workspace, Database)) {
        let (_dir, workspace, database) = workspace;
        let oid = store_blob(&database, "target content");

        let mut target = FileSet::new();
        target.insert(PathBuf::from("a.txt"), oid);

        workspace.reconcile(&target, &database).unwrap();

        assert_eq!(workspace.read_file(Path::new("a.txt")).unwrap(), "target content");
    }

    #[rstest]
    fn reconcile_removes_strangers_and_empty_directories(
        workspace: (TempDir, Workspace, Database),
    ) {
        let (dir, workspace, database) = workspace;
        let oid = store_blob(&database, "kept");

        workspace.write_file(Path::new("a.txt"), "stale").unwrap();
        workspace.write_file(Path::new("b.txt"), "stranger").unwrap();
        workspace.write_file(Path::new("sub/c.txt"), "stranger").unwrap();

        let mut target = FileSet::new();
        target.insert(PathBuf::from("a.txt"), oid);

        workspace.reconcile(&target, &database).unwrap();

        assert_eq!(workspace.read_file(Path::new("a.txt")).unwrap(), "kept");
        assert!(!dir.path().join("b.txt").exists());
        assert!(!dir.path().join("sub").exists());
    }

    #[rstest]
    fn reconcile_leaves_the_metadata_directory_alone(workspace: (TempDir, Workspace, Database)) {
        let (dir, workspace, database) = workspace;
        let oid = store_blob(&database, "kept");

        let mut target = FileSet::new();
        target.insert(PathBuf::from("a.txt"), oid.clone());

        workspace.reconcile(&target, &database).unwrap();

        // the blob object written before reconciliation must survive it
        let object_path = dir
            .path()
            .join(METADATA_DIR)
            .join("objects")
            .join(oid.to_path());
        assert!(object_path.is_file());
    }

    #[rstest]
    fn reconcile_creates_nested_target_directories(workspace: (TempDir, Workspace, Database)) {
        let (_dir, workspace, database) = workspace;
        let oid = store_blob(&database, "deep");

        let mut target = FileSet::new();
        target.insert(PathBuf::from("deep/nested/file.txt"), oid);

        workspace.reconcile(&target, &database).unwrap();

        assert_eq!(
            workspace.read_file(Path::new("deep/nested/file.txt")).unwrap(),
            "deep"
        );
    }

    #[rstest]
    fn blob_identity_matches_restored_content(workspace: (TempDir, Workspace, Database)) {
        let (_dir, workspace, database) = workspace;
        let blob = Blob::new("hello".to_string());
        let oid = database.store(&blob).unwrap();

        let mut target = FileSet::new();
        target.insert(PathBuf::from("a.txt"), oid.clone());
        workspace.reconcile(&target, &database).unwrap();

        let restored = Blob::new(workspace.read_file(Path::new("a.txt")).unwrap());
        assert_eq!(restored.object_id().unwrap(), oid);
    }
}

//! References (branches and HEAD)
//!
//! References are human-readable names pointing to commits:
//! - `HEAD`: a text file holding the bare name of the current branch
//! - Branches: `refs/heads/<name>` files holding a 40-hex commit digest
//!
//! Branch references are mutable pointers advanced only by commit, merge,
//! and checkout. Ref file writes take an exclusive advisory lock; the core
//! does not otherwise guard against concurrent invocations.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Branch created by `init` and used when HEAD is missing
pub const DEFAULT_BRANCH: &str = "main";

/// Name of the HEAD file
const HEAD_FILE: &str = "HEAD";

/// Reference manager
///
/// Handles reading and writing branch references and HEAD.
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.minigit`)
    path: Box<Path>,
}

impl Refs {
    /// Read the name of the current branch from HEAD
    ///
    /// A missing HEAD file falls back to the default branch so commands
    /// work in a freshly scaffolded repository.
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let head_path = self.head_path();

        let name = match std::fs::read_to_string(&head_path) {
            Ok(content) => content.trim().to_string(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => DEFAULT_BRANCH.to_string(),
            Err(err) => {
                return Err(err)
                    .context(format!("failed to read HEAD at {}", head_path.display()));
            }
        };

        BranchName::try_parse(name)
    }

    /// Point HEAD at the given branch
    pub fn set_current_branch(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        self.update_ref_file(self.head_path().into_boxed_path(), branch_name.to_string())
    }

    /// Read the commit the current branch points to
    ///
    /// # Returns
    ///
    /// None when the current branch has no commits yet
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_branch(&self.current_branch()?)
    }

    /// Advance the current branch to the given commit
    pub fn update_head(&self, oid: ObjectId) -> anyhow::Result<()> {
        let branch_name = self.current_branch()?;
        self.update_ref_file(
            self.heads_path().join(branch_name.as_ref()).into_boxed_path(),
            oid.as_ref().to_string(),
        )
    }

    /// Read the commit a branch points to
    ///
    /// # Returns
    ///
    /// None when the branch reference does not exist
    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.heads_path().join(branch_name.as_ref());

        let content = match std::fs::read_to_string(&branch_path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).context(format!(
                    "failed to read ref file at {}",
                    branch_path.display()
                ));
            }
        };

        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(ObjectId::try_parse(content.to_string())?))
    }

    /// Create a branch pointing at the given commit
    pub fn create_branch(&self, name: &BranchName, source_oid: ObjectId) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(name.as_ref());

        if branch_path.exists() {
            anyhow::bail!("branch {} already exists", name);
        }

        self.update_ref_file(branch_path.into_boxed_path(), source_oid.as_ref().to_string())
    }

    /// Delete a branch, returning the commit it pointed to
    pub fn delete_branch(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        let branch_path = self.heads_path().join(name.as_ref());

        match self.read_branch(name)? {
            Some(oid) => {
                std::fs::remove_file(&branch_path).with_context(|| {
                    format!("failed to delete branch file at {}", branch_path.display())
                })?;
                self.prune_branch_empty_parent_dirs(&branch_path)?;

                Ok(oid)
            }
            None => anyhow::bail!("branch {} does not exist", name),
        }
    }

    /// List all branches in name order
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();
        if !heads_path.exists() {
            return Ok(vec![]);
        }

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                if entry.path().is_file() {
                    let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                    BranchName::try_parse(relative_path.to_string_lossy().to_string()).ok()
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn update_ref_file(&self, path: Box<Path>, raw_ref: String) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {}",
                path.display()
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("failed to open ref file at {}", path.display()))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if parent != self.heads_path().as_path() && parent.read_dir()?.next().is_none() {
                std::fs::remove_dir(parent).with_context(|| {
                    format!("failed to remove empty branch directory at {}", parent.display())
                })?;
                self.prune_branch_empty_parent_dirs(parent)?;
            }
        }

        Ok(())
    }

    pub fn head_path(&self) -> std::path::PathBuf {
        self.path.join(HEAD_FILE)
    }

    pub fn refs_path(&self) -> std::path::PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> std::path::PathBuf {
        self.refs_path().join("heads")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name.to_string()).unwrap()
    }

    #[fixture]
    fn refs() -> (TempDir, Refs) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        (dir, refs)
    }

    #[rstest]
    fn missing_head_falls_back_to_default_branch(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        assert_eq!(refs.current_branch().unwrap().as_ref(), DEFAULT_BRANCH);
    }

    #[rstest]
    fn head_stores_the_current_branch_name(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        refs.set_current_branch(&branch("feature")).unwrap();

        assert_eq!(refs.current_branch().unwrap().as_ref(), "feature");
    }

    #[rstest]
    fn branch_file_holds_a_single_digest(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        refs.create_branch(&branch("feature"), oid('a')).unwrap();

        let content = std::fs::read_to_string(refs.heads_path().join("feature")).unwrap();
        assert_eq!(content, oid('a').to_string());
        assert_eq!(refs.read_branch(&branch("feature")).unwrap(), Some(oid('a')));
    }

    #[rstest]
    fn update_head_advances_the_current_branch(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        refs.set_current_branch(&branch("main")).unwrap();

        refs.update_head(oid('a')).unwrap();
        assert_eq!(refs.read_head().unwrap(), Some(oid('a')));

        refs.update_head(oid('b')).unwrap();
        assert_eq!(refs.read_head().unwrap(), Some(oid('b')));
    }

    #[rstest]
    fn unborn_branch_reads_as_none(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        assert_eq!(refs.read_head().unwrap(), None);
        assert_eq!(refs.read_branch(&branch("ghost")).unwrap(), None);
    }

    #[rstest]
    fn duplicate_branch_creation_fails(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        refs.create_branch(&branch("feature"), oid('a')).unwrap();
        assert!(refs.create_branch(&branch("feature"), oid('b')).is_err());
    }

    #[rstest]
    fn lists_branches_in_name_order(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        refs.create_branch(&branch("zeta"), oid('a')).unwrap();
        refs.create_branch(&branch("alpha"), oid('b')).unwrap();
        refs.create_branch(&branch("feature/nested"), oid('c')).unwrap();

        let branches = refs.list_branches().unwrap();
        let names: Vec<&str> = branches.iter().map(|b| b.as_ref()).collect();
        assert_eq!(names, vec!["alpha", "feature/nested", "zeta"]);
    }

    #[rstest]
    fn deleting_a_branch_returns_its_commit(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        refs.create_branch(&branch("feature"), oid('a')).unwrap();
        let deleted = refs.delete_branch(&branch("feature")).unwrap();

        assert_eq!(deleted, oid('a'));
        assert_eq!(refs.read_branch(&branch("feature")).unwrap(), None);
        assert!(refs.delete_branch(&branch("feature")).is_err());
    }
}

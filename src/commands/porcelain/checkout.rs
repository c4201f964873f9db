use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use std::path::Path;

impl Repository {
    /// Switch to another branch
    ///
    /// Reconciles the working tree with the target branch's snapshot
    /// (removing tracked-set strangers, restoring target blobs), replaces
    /// the index with the target file set, and points HEAD at the branch.
    pub fn checkout(&mut self, target: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(target.to_string())?;
        let current = self.refs().current_branch()?;

        if branch_name == current {
            eprintln!("Already on '{}'", target);
            return Ok(());
        }

        let target_oid = self
            .refs()
            .read_branch(&branch_name)?
            .ok_or_else(|| anyhow::anyhow!("branch {} not found", target))?;

        let commit = self.database().load_commit(&target_oid)?;
        let files = self.database().tree_files(commit.tree_oid(), Path::new(""))?;

        self.workspace().reconcile(&files, self.database())?;

        {
            let mut index = self.index();
            index.rehydrate()?;
            index.replace_all(files);
            index.write_updates()?;
        }

        self.refs().set_current_branch(&branch_name)?;

        eprintln!("Switched to branch '{}'", target);

        Ok(())
    }
}

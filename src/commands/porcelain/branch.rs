use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Create a branch pointing at the current HEAD commit
    pub fn branch_create(&mut self, name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(name.to_string())?;

        let head_oid = self
            .refs()
            .read_head()?
            .ok_or_else(|| anyhow::anyhow!("no current HEAD to branch from"))?;

        self.refs().create_branch(&branch_name, head_oid)?;

        Ok(())
    }

    /// Delete a branch
    ///
    /// The current branch cannot be deleted.
    pub fn branch_delete(&mut self, name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(name.to_string())?;

        if branch_name == self.refs().current_branch()? {
            anyhow::bail!("cannot delete the current branch {}", branch_name);
        }

        let deleted_oid = self.refs().delete_branch(&branch_name)?;

        writeln!(
            self.writer(),
            "Deleted branch {} (was {})",
            branch_name,
            deleted_oid.to_short_oid()
        )?;

        Ok(())
    }

    /// List branches, marking the current one
    pub fn branch_list(&self) -> anyhow::Result<()> {
        let current = self.refs().current_branch()?;

        for branch in self.refs().list_branches()? {
            if branch == current {
                writeln!(self.writer(), "{}", format!("* {}", branch).green())?;
            } else {
                writeln!(self.writer(), "  {}", branch)?;
            }
        }

        Ok(())
    }
}

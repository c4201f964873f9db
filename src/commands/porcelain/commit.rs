use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::tree::Tree;
use std::io::Write;

impl Repository {
    /// Record the staged file set as a new commit
    ///
    /// Builds the tree hierarchy from the index, stores every subtree,
    /// writes the commit object, and advances the current branch.
    pub fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        if index.is_empty() {
            anyhow::bail!("nothing to commit (staging area is empty)");
        }

        let files = index.file_set();
        drop(index);

        let tree = Tree::build(&files)?;
        let tree_oid = self.database().store_tree(&tree)?;

        let parents: Vec<_> = self.refs().read_head()?.into_iter().collect();
        let is_root = if parents.is_empty() {
            "(root-commit) "
        } else {
            ""
        };

        let author = Author::load_from_env()?;
        let message = message.trim().to_string();

        let commit = Commit::new(parents, tree_oid, author, message);
        let commit_oid = self.database().store(&commit)?;
        self.refs().update_head(commit_oid.clone())?;

        let branch = self.refs().current_branch()?;
        writeln!(
            self.writer(),
            "[{} {}{}] {}",
            branch,
            is_root,
            commit_oid,
            commit.short_message()
        )?;

        Ok(())
    }
}

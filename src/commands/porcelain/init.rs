use crate::areas::refs::DEFAULT_BRANCH;
use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    /// Scaffold the on-disk repository layout
    ///
    /// Creates `objects/` and `refs/heads/` under the metadata directory
    /// and points HEAD at the default branch. Re-running init on an
    /// existing repository leaves its state untouched.
    pub fn init(&mut self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .minigit/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .minigit/refs/heads directory")?;

        let head_path = self.refs().head_path();
        if !head_path.exists() {
            fs::write(&head_path, format!("{}\n", DEFAULT_BRANCH))
                .context("Failed to write .minigit/HEAD file")?;
        }

        writeln!(
            self.writer(),
            "Initialized empty minigit repository in {}",
            self.path().display()
        )?;

        Ok(())
    }
}

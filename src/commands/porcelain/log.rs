use crate::areas::repository::Repository;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Print the commit history of the current branch
    ///
    /// Walks first-parent links from HEAD, newest first, in a medium
    /// format: commit header, author, date, then the indented message.
    pub fn log(&self) -> anyhow::Result<()> {
        let head = self.refs().read_head()?;

        let Some(mut current_oid) = head else {
            writeln!(self.writer(), "No commits to show.")?;
            return Ok(());
        };

        loop {
            let commit = self.database().load_commit(&current_oid)?;

            writeln!(
                self.writer(),
                "{}",
                format!("commit {}", current_oid).yellow()
            )?;
            writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
            writeln!(
                self.writer(),
                "Date:   {}",
                commit.author().readable_timestamp()
            )?;
            writeln!(self.writer())?;
            for line in commit.message().lines() {
                writeln!(self.writer(), "    {}", line)?;
            }

            match commit.parent() {
                Some(parent) => {
                    writeln!(self.writer())?;
                    current_oid = parent.clone();
                }
                None => break,
            }
        }

        Ok(())
    }
}

use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use std::path::PathBuf;

impl Repository {
    /// Stage files or directories for the next commit
    ///
    /// Each named path is expanded to the files beneath it; every file is
    /// stored as a blob and recorded in the index. Staged entries under a
    /// named path that no longer exist in the workspace are dropped, so
    /// deletions are staged the same way as additions.
    ///
    /// The index format delimits entries with a space, so paths containing
    /// spaces are rejected rather than written ambiguously.
    pub fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        for raw_path in paths {
            if raw_path.contains(' ') {
                anyhow::bail!(
                    "cannot add '{}': paths containing spaces are not supported",
                    raw_path
                );
            }

            let relative_root = if raw_path == "." {
                PathBuf::new()
            } else {
                PathBuf::from(raw_path)
            };

            let full_path = self.path().join(raw_path);
            if !full_path.exists() {
                index.remove_under(&relative_root);
                continue;
            }

            let found = self.workspace().list_files(Some(full_path))?;

            let stale: Vec<PathBuf> = index
                .entries()
                .map(|(path, _)| path.clone())
                .filter(|path| {
                    (relative_root.as_os_str().is_empty() || path.starts_with(&relative_root))
                        && !found.contains(path)
                })
                .collect();
            for path in stale {
                index.remove(&path);
            }

            for relative_path in found {
                if relative_path.to_string_lossy().contains(' ') {
                    anyhow::bail!(
                        "cannot add '{}': paths containing spaces are not supported",
                        relative_path.display()
                    );
                }

                let data = self.workspace().read_file(&relative_path)?;
                let blob = Blob::new(data);
                let oid = self.database().store(&blob)?;

                index.add(relative_path, oid);
            }
        }

        index.write_updates()?;

        Ok(())
    }
}

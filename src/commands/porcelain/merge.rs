use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::merge::ancestor::AncestorFinder;
use crate::artifacts::merge::three_way;
use crate::artifacts::merge::{MergeError, MergeOutcome};
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::io::Write;

impl Repository {
    /// Merge another branch into the current one
    ///
    /// Finds a common ancestor of the two heads, runs a three-way
    /// resolution over the ancestor/current/incoming file sets, and either
    /// records a merge commit (two parents) or surfaces the conflicting
    /// paths. In both cases the working tree and index are brought in line
    /// with the merged set; on conflicts that set is the current-side
    /// fallback and no commit is created.
    pub fn merge(&mut self, target: &str, message: Option<&str>) -> anyhow::Result<MergeOutcome> {
        let current_branch = self.refs().current_branch()?;
        let head_oid = self.refs().read_head()?.ok_or(MergeError::EmptyHead)?;

        let branch_name = BranchName::try_parse(target.to_string())?;
        let incoming_oid = self
            .refs()
            .read_branch(&branch_name)?
            .ok_or_else(|| MergeError::UnknownBranch(target.to_string()))?;

        if head_oid == incoming_oid {
            writeln!(self.writer(), "Already up to date.")?;
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        eprintln!("Merging {} into {}", branch_name, current_branch);

        let base_oid = {
            let database = self.database();
            let finder = AncestorFinder::new(|oid: &ObjectId| {
                Ok(database.load_commit(oid)?.parents().to_vec())
            });
            finder
                .find_common_ancestor(&head_oid, &incoming_oid)?
                .ok_or_else(|| {
                    MergeError::NoCommonAncestor(head_oid.clone(), incoming_oid.clone())
                })?
        };

        let ancestor_files = self.database().commit_files(&base_oid)?;
        let current_files = self.database().commit_files(&head_oid)?;
        let incoming_files = self.database().commit_files(&incoming_oid)?;

        let resolution = three_way::resolve(&ancestor_files, &current_files, &incoming_files);

        if !resolution.is_clean() {
            let (merged, conflicts) = resolution.into_parts();

            self.workspace().reconcile(&merged, self.database())?;
            {
                let mut index = self.index();
                index.rehydrate()?;
                index.replace_all(merged);
                index.write_updates()?;
            }

            for path in &conflicts {
                writeln!(
                    self.writer(),
                    "CONFLICT (content): Merge conflict in {}",
                    path.display()
                )?;
            }
            writeln!(
                self.writer(),
                "Automatic merge failed; fix conflicts and then commit the result."
            )?;

            return Ok(MergeOutcome::Conflicted(conflicts));
        }

        let merged = resolution.into_parts().0;

        let tree = Tree::build(&merged)?;
        let tree_oid = self.database().store_tree(&tree)?;

        let author = Author::load_from_env()?;
        let message = message.map(str::to_string).unwrap_or_else(|| {
            format!("Merge branch '{}' into {}", branch_name, current_branch)
        });

        let commit = Commit::new(
            vec![head_oid, incoming_oid],
            tree_oid,
            author,
            message.trim().to_string(),
        );
        let commit_oid = self.database().store(&commit)?;
        self.refs().update_head(commit_oid.clone())?;

        self.workspace().reconcile(&merged, self.database())?;
        {
            let mut index = self.index();
            index.rehydrate()?;
            index.replace_all(merged);
            index.write_updates()?;
        }

        writeln!(self.writer(), "Merge made by the three-way strategy.")?;

        Ok(MergeOutcome::Merged(commit_oid))
    }
}

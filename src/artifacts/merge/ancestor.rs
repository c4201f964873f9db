//! Common ancestor finder for merge operations
//!
//! Finds a commit reachable from both of two starting commits by following
//! parent pointers. The merge engine uses the result as the baseline of a
//! three-way merge.
//!
//! ## Algorithm
//!
//! Mark-and-sweep in two phases:
//!
//! 1. Mark every commit reachable from the source commit (breadth-first
//!    over parent edges, the source itself included).
//! 2. Walk breadth-first from the target commit; the first marked commit
//!    encountered is a common ancestor. Because the sweep proceeds level
//!    by level, the returned commit is the closest marked ancestor of the
//!    target.
//!
//! `find_common_ancestor(x, x)` is `x`, and the result is symmetric in its
//! membership outcome: the returned commit belongs to both histories.
//! Disjoint histories yield `None`.
//!
//! Parent lists are loaded through a caller-supplied function and memoized
//! by commit ID, so each commit object is read at most once per finder.

use crate::artifacts::objects::object_id::ObjectId;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

/// Finds common ancestors between commits
///
/// Takes a generic function that loads the parent IDs of any commit, making
/// it independent of the storage backend (file system database in
/// production, an in-memory graph in tests).
pub struct AncestorFinder<LoadParentsFn>
where
    LoadParentsFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    /// Function to load the parent commit IDs of a given commit
    load_parents: LoadParentsFn,
    /// Memoized parent lists, keyed by commit ID
    cache: RefCell<HashMap<ObjectId, Vec<ObjectId>>>,
}

impl<LoadParentsFn> AncestorFinder<LoadParentsFn>
where
    LoadParentsFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    /// Create a new finder with the given parent loader
    ///
    /// The loader must return an empty vector for root commits.
    pub fn new(load_parents: LoadParentsFn) -> Self {
        Self {
            load_parents,
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn parents(&self, commit_id: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
        if let Some(parents) = self.cache.borrow().get(commit_id) {
            return Ok(parents.clone());
        }

        let parents = (self.load_parents)(commit_id)?;
        self.cache
            .borrow_mut()
            .insert(commit_id.clone(), parents.clone());
        Ok(parents)
    }

    /// Find a common ancestor of two commits
    ///
    /// # Returns
    ///
    /// - `Some(commit_id)` - a commit reachable from both inputs
    /// - `None` - the histories are disjoint
    pub fn find_common_ancestor(
        &self,
        source_commit_id: &ObjectId,
        target_commit_id: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        // Phase 1: mark everything reachable from the source
        let mut marked = HashSet::new();
        let mut queue = VecDeque::from([source_commit_id.clone()]);

        while let Some(commit_id) = queue.pop_front() {
            if !marked.insert(commit_id.clone()) {
                continue;
            }
            for parent_id in self.parents(&commit_id)? {
                queue.push_back(parent_id);
            }
        }

        // Phase 2: sweep from the target; the first marked commit wins
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([target_commit_id.clone()]);

        while let Some(commit_id) = queue.pop_front() {
            if !visited.insert(commit_id.clone()) {
                continue;
            }
            if marked.contains(&commit_id) {
                return Ok(Some(commit_id));
            }
            for parent_id in self.parents(&commit_id)? {
                queue.push_back(parent_id);
            }
        }

        Ok(None)
    }
}

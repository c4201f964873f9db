//! Tree object
//!
//! Trees represent directory snapshots. Each tree object is a sequence of
//! text lines, one per entry:
//!
//! ```text
//! <mode> <kind> <digest> <name>
//! ```
//!
//! with mode `100644` for blobs and `40000` for subtrees. Within one tree
//! object, blob entries precede subtree entries; inside each group, names
//! iterate in lexicographic order, so serialization is deterministic for a
//! given input.
//!
//! ## Tree Building
//!
//! A flat path-to-digest map is folded into a recursive node structure
//! (file leaf or nested directory), then serialized post-order so every
//! subtree digest is known before its parent is written. Intermediate
//! directories implied by deeper files get their own tree objects.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::PathBuf;

/// Flat mapping from working-tree-relative path to blob digest
///
/// This is the shape of the staging area, of a flattened tree, and of the
/// three inputs to a merge.
pub type FileSet = BTreeMap<PathBuf, ObjectId>;

/// One parsed tree entry, as read back from the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRecord {
    pub kind: ObjectType,
    pub oid: ObjectId,
}

/// Internal tree node: a file leaf or a nested directory
#[derive(Debug, Clone)]
enum TreeNode {
    File(ObjectId),
    Directory(Tree),
}

/// Tree object representing one directory snapshot
///
/// Trees maintain two sets of entries:
/// - `readable_entries`: for trees loaded from the database
/// - `writeable_entries`: for trees being built from a file set
#[derive(Debug, Clone, Default)]
pub struct Tree {
    /// Entries loaded from the database (read mode)
    readable_entries: BTreeMap<String, TreeRecord>,
    /// Entries being built (write mode)
    writeable_entries: BTreeMap<String, TreeNode>,
}

impl Tree {
    /// Build a tree hierarchy from a flat file set
    ///
    /// Each path is split into components and inserted into the recursive
    /// structure, creating intermediate directory nodes as needed.
    ///
    /// # Arguments
    ///
    /// * `files` - Flat map of file paths to blob digests
    ///
    /// # Returns
    ///
    /// The root tree containing all entries
    pub fn build(files: &FileSet) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for (path, oid) in files {
            let components = path
                .components()
                .map(|component| {
                    component
                        .as_os_str()
                        .to_str()
                        .map(|name| name.to_string())
                        .with_context(|| format!("non-UTF-8 path component in {:?}", path))
                })
                .collect::<anyhow::Result<Vec<String>>>()?;

            root.add_entry(&components, oid)?;
        }

        Ok(root)
    }

    fn add_entry(&mut self, components: &[String], oid: &ObjectId) -> anyhow::Result<()> {
        match components {
            [] => Err(anyhow::anyhow!("empty path in file set")),
            [name] => {
                self.writeable_entries
                    .insert(name.clone(), TreeNode::File(oid.clone()));
                Ok(())
            }
            [directory, rest @ ..] => {
                let node = self
                    .writeable_entries
                    .entry(directory.clone())
                    .or_insert_with(|| TreeNode::Directory(Tree::default()));

                match node {
                    TreeNode::Directory(tree) => tree.add_entry(rest, oid),
                    TreeNode::File(_) => Err(anyhow::anyhow!(
                        "path component {} is both a file and a directory",
                        directory
                    )),
                }
            }
        }
    }

    /// Traverse the tree depth-first, calling a function on each node
    ///
    /// Visits children before parents (post-order), which is necessary for
    /// storing trees since child digests must be known before the parent is
    /// serialized.
    pub fn traverse<F>(&self, func: &F) -> anyhow::Result<()>
    where
        F: Fn(&Tree) -> anyhow::Result<()>,
    {
        for node in self.writeable_entries.values() {
            if let TreeNode::Directory(tree) = node {
                tree.traverse(func)?;
            }
        }
        func(self)?;

        Ok(())
    }

    /// Iterate over entries loaded from the database
    pub fn entries(&self) -> impl Iterator<Item = (&String, &TreeRecord)> {
        self.readable_entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.readable_entries.is_empty() && self.writeable_entries.is_empty()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content = String::new();

        // blob entries precede subtree entries; the BTreeMap keeps each
        // group in name order
        for (name, node) in &self.writeable_entries {
            if let TreeNode::File(oid) = node {
                content.push_str(&format!(
                    "{} {} {} {}\n",
                    ObjectType::Blob.entry_mode(),
                    ObjectType::Blob,
                    oid.as_ref(),
                    name
                ));
            }
        }

        for (name, node) in &self.writeable_entries {
            if let TreeNode::Directory(tree) = node {
                content.push_str(&format!(
                    "{} {} {} {}\n",
                    ObjectType::Tree.entry_mode(),
                    ObjectType::Tree,
                    tree.object_id()?.as_ref(),
                    name
                ));
            }
        }

        Ok(Bytes::from(content.into_bytes()))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)?;

        let mut entries = BTreeMap::new();

        // Tolerant parser: two space-delimited fields as mode and kind,
        // exactly 40 characters as the digest, the remainder after one
        // space as the name. Non-conforming lines are skipped.
        for line in content.lines() {
            let Some((_mode, rest)) = line.split_once(' ') else {
                continue;
            };
            let Some((kind, rest)) = rest.split_once(' ') else {
                continue;
            };
            let Ok(kind) = ObjectType::try_parse_entry_kind(kind) else {
                continue;
            };
            if rest.len() <= OBJECT_ID_LENGTH {
                continue;
            }
            let (digest, name) = rest.split_at(OBJECT_ID_LENGTH);
            let Some(name) = name.strip_prefix(' ') else {
                continue;
            };
            let Ok(oid) = ObjectId::try_parse(digest.to_string()) else {
                continue;
            };

            entries.insert(name.to_string(), TreeRecord { kind, oid });
        }

        Ok(Tree {
            readable_entries: entries,
            writeable_entries: Default::default(),
        })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.readable_entries
            .iter()
            .map(|(name, record)| {
                format!(
                    "{} {} {} {}",
                    record.kind.entry_mode(),
                    record.kind,
                    record.oid.as_ref(),
                    name
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

#![allow(dead_code)]

pub mod command;
pub mod file;

use std::path::Path;

/// Read the digest the current branch points at, straight from the ref file
pub fn current_head_oid(dir: &Path) -> String {
    let head = std::fs::read_to_string(dir.join(".minigit").join("HEAD"))
        .expect("Failed to read HEAD");
    let branch = head.trim();

    std::fs::read_to_string(dir.join(".minigit").join("refs").join("heads").join(branch))
        .expect("Failed to read current branch ref")
        .trim()
        .to_string()
}

/// Print an object's raw content through the cat-file plumbing command
pub fn cat_object(dir: &Path, oid: &str) -> String {
    let output = command::run_minigit_command(dir, &["cat-file", "-p", oid])
        .output()
        .expect("Failed to run cat-file");
    assert!(
        output.status.success(),
        "cat-file {} failed: {}",
        oid,
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout).expect("cat-file output is not UTF-8")
}

/// Resolve the tree digest of a commit object
pub fn commit_tree_oid(dir: &Path, commit_oid: &str) -> String {
    let commit_text = cat_object(dir, commit_oid);
    commit_text
        .lines()
        .find_map(|line| line.strip_prefix("tree "))
        .expect("commit object has no tree line")
        .to_string()
}

/// Collect the parent digests of a commit object
pub fn commit_parent_oids(dir: &Path, commit_oid: &str) -> Vec<String> {
    let commit_text = cat_object(dir, commit_oid);
    commit_text
        .lines()
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.strip_prefix("parent "))
        .map(str::to_string)
        .collect()
}

/// Parse a tree object's entry lines into (mode, kind, digest, name) tuples
pub fn tree_entries(dir: &Path, tree_oid: &str) -> Vec<(String, String, String, String)> {
    cat_object(dir, tree_oid)
        .lines()
        .map(|line| {
            let (mode, rest) = line.split_once(' ').expect("missing mode field");
            let (kind, rest) = rest.split_once(' ').expect("missing kind field");
            let (digest, name) = rest.split_at(40);
            let name = name.strip_prefix(' ').expect("missing name field");
            (
                mode.to_string(),
                kind.to_string(),
                digest.to_string(),
                name.to_string(),
            )
        })
        .collect()
}

use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

use common::command::{minigit_commit, repository_dir, run_minigit_command};
use common::file::{FileSpec, write_file};

#[rstest]
fn log_shows_commits_newest_first(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_minigit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("a.txt"), "one".to_string()));
    run_minigit_command(dir.path(), &["add", "."])
        .assert()
        .success();
    minigit_commit(dir.path(), "first commit").assert().success();

    write_file(FileSpec::new(dir.path().join("a.txt"), "two".to_string()));
    run_minigit_command(dir.path(), &["add", "."])
        .assert()
        .success();
    minigit_commit(dir.path(), "second commit").assert().success();

    let output = run_minigit_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("first commit"))
        .stdout(predicate::str::contains("second commit"))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output)?;
    let second_position = stdout.find("second commit").unwrap();
    let first_position = stdout.find("first commit").unwrap();
    assert!(second_position < first_position);

    Ok(())
}

#[rstest]
fn log_entries_carry_commit_author_and_date_headers(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_minigit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("a.txt"), "one".to_string()));
    run_minigit_command(dir.path(), &["add", "."])
        .assert()
        .success();

    let mut cmd = run_minigit_command(dir.path(), &["commit", "-m", "entry"]);
    cmd.envs(vec![
        ("MINIGIT_AUTHOR_NAME", "Alice"),
        ("MINIGIT_AUTHOR_EMAIL", "alice@example.com"),
    ]);
    cmd.assert().success();

    run_minigit_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"commit [0-9a-f]{40}")?)
        .stdout(predicate::str::contains("Author: Alice <alice@example.com>"))
        .stdout(predicate::str::is_match(r"Date:   \w{3} \w{3}")?)
        .stdout(predicate::str::contains("    entry"));

    Ok(())
}

#[rstest]
fn log_without_commits_prints_a_notice(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_minigit_command(dir.path(), &["init"]).assert().success();

    run_minigit_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No commits to show."));

    Ok(())
}

#[rstest]
fn log_follows_the_first_parent_through_a_merge(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_minigit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("f.txt"), "base\n".to_string()));
    run_minigit_command(dir.path(), &["add", "."])
        .assert()
        .success();
    minigit_commit(dir.path(), "base").assert().success();

    run_minigit_command(dir.path(), &["branch", "create", "feature"])
        .assert()
        .success();

    write_file(FileSpec::new(dir.path().join("g.txt"), "ours\n".to_string()));
    run_minigit_command(dir.path(), &["add", "."])
        .assert()
        .success();
    minigit_commit(dir.path(), "main work").assert().success();

    run_minigit_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.path().join("h.txt"), "theirs\n".to_string()));
    run_minigit_command(dir.path(), &["add", "."])
        .assert()
        .success();
    minigit_commit(dir.path(), "feature work").assert().success();

    run_minigit_command(dir.path(), &["checkout", "main"])
        .assert()
        .success();

    let mut merge_cmd = run_minigit_command(dir.path(), &["merge", "feature", "-m", "merge it"]);
    merge_cmd.envs(vec![
        ("MINIGIT_AUTHOR_NAME", "Alice"),
        ("MINIGIT_AUTHOR_EMAIL", "alice@example.com"),
    ]);
    merge_cmd.assert().success();

    run_minigit_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("merge it"))
        .stdout(predicate::str::contains("main work"))
        .stdout(predicate::str::contains("base"));

    Ok(())
}

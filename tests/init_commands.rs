use assert_cmd::Command;
use predicates::prelude::predicate;

mod common;

use common::command::run_minigit_command;

#[test]
fn new_repository_initiated_with_metadata_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let dir_absolute_path = dir.path().canonicalize()?.display().to_string();
    let mut sut = Command::cargo_bin("minigit")?;

    sut.arg("init").arg(dir.path());

    sut.assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^Initialized empty minigit repository in .+",
        )?)
        .stdout(predicate::str::contains(dir_absolute_path));

    assert!(dir.path().join(".minigit").join("objects").is_dir());
    assert!(
        dir.path()
            .join(".minigit")
            .join("refs")
            .join("heads")
            .is_dir()
    );

    let head = std::fs::read_to_string(dir.path().join(".minigit").join("HEAD"))?;
    assert_eq!(head.trim(), "main");

    Ok(())
}

#[test]
fn init_is_idempotent_on_an_existing_repository() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    run_minigit_command(dir.path(), &["init"]).assert().success();

    // switch the current branch, then re-run init
    std::fs::write(dir.path().join(".minigit").join("HEAD"), "feature\n")?;
    run_minigit_command(dir.path(), &["init"]).assert().success();

    let head = std::fs::read_to_string(dir.path().join(".minigit").join("HEAD"))?;
    assert_eq!(head.trim(), "feature", "init must not clobber HEAD");

    Ok(())
}

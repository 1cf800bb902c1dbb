//! Configuration problems abort before any network call, with a clear
//! message and a nonzero exit code.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn write_config(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("clubtrack.yml");
    fs::write(
        &path,
        "email: admin@example.com\nusername: club-admin\nclubs:\n  - team-england\n",
    )
    .unwrap();
    path
}

#[test]
fn scenario_cli_missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.yml");

    Command::cargo_bin("clubtrack")
        .unwrap()
        .args(["membership", "--config"])
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config"));
}

#[test]
fn scenario_cli_unknown_club_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    Command::cargo_bin("clubtrack")
        .unwrap()
        .args(["membership", "--club", "somewhere-else", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn scenario_cli_club_and_all_clubs_conflict() {
    Command::cargo_bin("clubtrack")
        .unwrap()
        .args(["membership", "--club", "team-england", "--all-clubs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn scenario_cli_all_clubs_requires_configured_clubs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clubtrack.yml");
    fs::write(&path, "email: a@b.c\nusername: x\n").unwrap();

    Command::cargo_bin("clubtrack")
        .unwrap()
        .args(["membership", "--all-clubs", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no clubs are configured"));
}

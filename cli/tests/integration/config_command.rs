//! Integration tests for `rosdock config`.
//!
//! Every test sets `ROSDOCK_CONFIG` to a temp path so none of them read or
//! write `~/.rosdock/config.yaml`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn rosdock(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rosdock"));
    cmd.env("NO_COLOR", "1")
        .env("ROSDOCK_ROOT", dir.path())
        .env("ROSDOCK_CONFIG", dir.path().join("config.yaml"));
    cmd
}

#[test]
fn test_config_help_shows_show_and_set_subcommands() {
    let dir = TempDir::new().expect("temp dir");
    rosdock(&dir)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"));
}

#[test]
fn test_config_show_without_file_prints_defaults() {
    let dir = TempDir::new().expect("temp dir");
    rosdock(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yaml"))
        .stdout(predicate::str::contains("protocol: ask"))
        .stdout(predicate::str::contains("workspace_dir: catkin_ws"))
        .stdout(predicate::str::contains("standalone_dir: ut-amrl"));
}

#[test]
fn test_config_set_persists_value() {
    let dir = TempDir::new().expect("temp dir");
    rosdock(&dir)
        .args(["config", "set", "github.protocol", "ssh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("github.protocol"));

    let written = fs::read_to_string(dir.path().join("config.yaml")).unwrap();
    assert!(written.contains("protocol: ssh"), "got: {written}");

    rosdock(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("protocol: ssh"));
}

#[cfg(unix)]
#[test]
fn test_config_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().expect("temp dir");
    rosdock(&dir)
        .args(["config", "set", "packages.standalone_dir", "amrl"])
        .assert()
        .success();

    let mode = fs::metadata(dir.path().join("config.yaml"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_config_set_unknown_key_fails() {
    let dir = TempDir::new().expect("temp dir");
    rosdock(&dir)
        .args(["config", "set", "github.token", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting"));
    assert!(!dir.path().join("config.yaml").exists());
}

#[test]
fn test_config_set_invalid_protocol_lists_choices() {
    let dir = TempDir::new().expect("temp dir");
    rosdock(&dir)
        .args(["config", "set", "github.protocol", "git"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ask, ssh, https"));
}

#[test]
fn test_config_set_rejects_nested_package_dir() {
    let dir = TempDir::new().expect("temp dir");
    rosdock(&dir)
        .args(["config", "set", "packages.workspace_dir", "a/b"])
        .assert()
        .failure();
}

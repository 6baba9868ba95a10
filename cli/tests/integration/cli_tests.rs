//! Integration tests for argument parsing and tag discovery.

#![allow(clippy::expect_used)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn rosdock(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rosdock"));
    cmd.env("NO_COLOR", "1")
        .env("ROSDOCK_ROOT", root)
        .env("ROSDOCK_CONFIG", root.join("config.yaml"));
    cmd
}

/// A repository root with `base` (complete) and `broken` (no Dockerfile).
fn repo() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let base = dir.path().join("noetic/base");
    fs::create_dir_all(&base).expect("mkdir");
    for file in ["Dockerfile", "Makefile", "compose.yaml"] {
        fs::write(base.join(file), "").expect("write");
    }
    let broken = dir.path().join("noetic/broken");
    fs::create_dir_all(&broken).expect("mkdir");
    fs::write(broken.join("Makefile"), "").expect("write");
    dir
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    let dir = repo();
    rosdock(dir.path()).assert().code(2).stderr(predicate::str::contains(
        "Build and launch ROS Noetic development containers",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    let dir = repo();
    rosdock(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("launch"))
        .stdout(predicate::str::contains("env"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("_build-packages").not());
}

#[test]
fn test_cli_version_flag_shows_version() {
    let dir = repo();
    rosdock(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rosdock"));
}

// --- Tag validation ---

#[test]
fn test_build_help_lists_discovered_tags() {
    let dir = repo();
    rosdock(dir.path())
        .args(["build", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base"))
        .stdout(predicate::str::contains("broken").not());
}

#[test]
fn test_build_unknown_tag_is_usage_error() {
    let dir = repo();
    rosdock(dir.path())
        .args(["build", "bad-tag"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bad-tag"))
        .stderr(predicate::str::contains("base"));
}

#[test]
fn test_incomplete_tag_directory_is_rejected() {
    let dir = repo();
    rosdock(dir.path())
        .args(["launch", "broken"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("possible values"));
}

#[test]
fn test_env_rejects_unknown_tag_before_probing() {
    let dir = repo();
    rosdock(dir.path())
        .args(["env", "nope", "--no-display"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_build_requires_tag() {
    let dir = repo();
    rosdock(dir.path())
        .arg("build")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<TAG>"));
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;
use yare::parameterized;

#[test]
fn creates_work_dir() {
    let temp = TempDir::new().unwrap();

    phonix()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized phonix"))
        .stdout(predicate::str::contains("Mode: local only"));

    assert!(temp.path().join(".phonix/config.toml").exists());
    assert!(temp.path().join(".phonix/data").is_dir());
    assert!(temp.path().join(".phonix/.gitignore").exists());
}

#[test]
fn fails_if_already_initialized() {
    let temp = init_temp();

    phonix()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn init_at_explicit_path() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("learner");
    std::fs::create_dir(&target).unwrap();

    phonix()
        .arg("init")
        .arg(target.to_str().unwrap())
        .current_dir(temp.path())
        .assert()
        .success();

    assert!(target.join(".phonix").is_dir());
}

#[test]
fn init_with_remote_writes_config() {
    let temp = init_temp_remote();

    let config = std::fs::read_to_string(temp.path().join(".phonix/config.toml")).unwrap();
    assert!(config.contains("[remote]"));
    assert!(config.contains(UNREACHABLE_REMOTE));
    assert!(config.contains("user_id = \"kid-1\""));
}

#[parameterized(
    http_scheme = { "http://localhost:7891" },
    bare_host = { "localhost:7891" },
    scheme_only = { "ws://" },
)]
fn init_rejects_bad_remote_url(url: &str) {
    let temp = TempDir::new().unwrap();

    phonix()
        .args(["init", "--remote", url, "--user", "kid-1"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid remote URL"));

    assert!(!temp.path().join(".phonix").exists());
}

#[test]
fn commands_outside_work_dir_fail() {
    let temp = TempDir::new().unwrap();

    phonix()
        .arg("show")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn directory_flag_runs_elsewhere() {
    let temp = init_temp();
    let other = TempDir::new().unwrap();

    phonix()
        .args(["-C", temp.path().to_str().unwrap(), "mark", "1", "cat", "tricky"])
        .current_dir(other.path())
        .assert()
        .success();

    phonix()
        .args(["show", "1"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Tricky: cat"));
}

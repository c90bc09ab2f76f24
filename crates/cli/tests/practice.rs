// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;
use yare::parameterized;

#[test]
fn mark_then_show() {
    let temp = init_temp();

    phonix()
        .args(["mark", "1", "cat", "tricky"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked 'cat' as tricky in pack 1"));

    run_ok(&temp, &["mark", "1", "dog", "mastered"]);

    let out = run_ok(&temp, &["show", "1"]);
    assert!(out.contains("Pack 1"));
    assert!(out.contains("Mastered: dog"));
    assert!(out.contains("Tricky: cat"));
}

#[test]
fn local_mode_prints_no_sync_line() {
    let temp = init_temp();
    let out = run_ok(&temp, &["mark", "1", "cat", "tricky"]);
    assert!(!out.contains("sync"));
}

#[test]
fn remark_replaces_status() {
    let temp = init_temp();
    run_ok(&temp, &["mark", "2", "sun", "tricky"]);
    run_ok(&temp, &["mark", "2", "sun", "mastered"]);

    let out = run_ok(&temp, &["show"]);
    assert!(out.contains("1 mastered, 0 tricky"));
}

#[parameterized(
    unknown_status = { &["mark", "1", "cat", "great"], "invalid value" },
    complete_untouched = { &["complete", "7"], "no progress recorded for pack 7" },
    unknown_custom = { &["mark", "C4", "ship", "tricky"], "custom pack not found: C4" },
)]
fn practice_errors(args: &[&str], message: &str) {
    let temp = init_temp();

    phonix()
        .args(args)
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(message));
}

#[test]
fn complete_counts_sessions() {
    let temp = init_temp();
    run_ok(&temp, &["mark", "3", "cat", "mastered"]);

    let first = run_ok(&temp, &["complete", "3"]);
    assert!(first.contains("Completed pack 3 (1 time(s))"));
    let second = run_ok(&temp, &["complete", "3"]);
    assert!(second.contains("Completed pack 3 (2 time(s))"));
}

#[test]
fn star_and_unstar() {
    let temp = init_temp();
    run_ok(&temp, &["star", "1", "cat"]);
    assert!(run_ok(&temp, &["show", "1"]).contains("Starred: cat"));

    run_ok(&temp, &["unstar", "1", "cat"]);
    assert!(!run_ok(&temp, &["show", "1"]).contains("Starred"));
}

#[test]
fn show_json_output() {
    let temp = init_temp();
    run_ok(&temp, &["mark", "1", "cat", "tricky"]);

    let out = run_ok(&temp, &["show", "-o", "json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["1"]["words"]["cat"], "tricky");
    assert_eq!(value["1"]["completed"], false);
}

#[test]
fn reset_requires_confirmation() {
    let temp = init_temp();
    run_ok(&temp, &["mark", "1", "cat", "tricky"]);

    let out = run_ok(&temp, &["reset"]);
    assert!(out.contains("--yes"));
    assert!(run_ok(&temp, &["show"]).contains("1 tricky"));

    run_ok(&temp, &["reset", "--yes"]);
    assert!(run_ok(&temp, &["show"]).contains("No progress yet."));
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;

#[test]
fn export_then_import_into_another_device() {
    let source = init_temp();
    run_ok(&source, &["mark", "1", "cat", "tricky"]);
    run_ok(&source, &["pack", "new", "Digraphs", "ship"]);

    let file = source.path().join("backup.json");
    let out = run_ok(&source, &["export", file.to_str().unwrap()]);
    assert!(out.contains("Exported 2 records"));

    let target = init_temp();
    let out = run_ok(&target, &["import", file.to_str().unwrap()]);
    assert!(out.contains("Imported 2 records"));
    assert!(run_ok(&target, &["show", "1"]).contains("Tricky: cat"));
    assert!(run_ok(&target, &["pack", "list"]).contains("Digraphs"));
}

#[test]
fn import_rejects_invalid_records() {
    let temp = init_temp();
    run_ok(&temp, &["mark", "1", "cat", "tricky"]);
    let file = temp.path().join("bad.json");
    std::fs::write(&file, r#"{"progress": {"2": {"words": {"": "tricky"}, "completed": false}}}"#)
        .unwrap();

    phonix()
        .args(["import", file.to_str().unwrap()])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid progress for pack 2"));

    assert!(run_ok(&temp, &["show", "1"]).contains("Tricky: cat"));
}

#[test]
fn export_empty_path_fails() {
    let temp = init_temp();

    phonix()
        .args(["export", ""])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("export path cannot be empty"));
}

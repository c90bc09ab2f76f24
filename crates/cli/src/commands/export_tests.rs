// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::TestContext;
use px_core::WordStatus;
use tempfile::TempDir;

#[test]
fn test_export_writes_snapshot() {
    let ctx = TestContext::new();
    ctx.mark(1, "cat", WordStatus::Tricky)
        .mark(2, "sun", WordStatus::Mastered);
    ctx.workspace
        .store
        .create_custom_pack("Digraphs", vec!["ship".to_string()])
        .unwrap();

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("backup.json");
    let count = run_impl(&ctx.workspace, path.to_str().unwrap()).unwrap();

    assert_eq!(count, 3);
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["progress"]["1"]["words"]["cat"], "tricky");
    assert_eq!(value["customPacks"][0]["name"], "Digraphs");
}

#[test]
fn test_export_empty_path_rejected() {
    assert!(matches!(run("  ").unwrap_err(), Error::ExportPathEmpty));
}

#[test]
fn test_export_to_missing_directory_fails() {
    let ctx = TestContext::new();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing").join("backup.json");
    assert!(matches!(
        run_impl(&ctx.workspace, path.to_str().unwrap()).unwrap_err(),
        Error::Io(_)
    ));
}

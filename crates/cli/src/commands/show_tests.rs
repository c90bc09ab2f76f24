// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::TestContext;
use px_core::WordStatus;

#[test]
fn test_show_all_empty() {
    let ctx = TestContext::new();
    let output = run_impl(&ctx.workspace, None, OutputFormat::Text).unwrap();
    assert_eq!(output, "No progress yet.");
}

#[test]
fn test_show_all_sorted_by_pack() {
    let ctx = TestContext::new();
    ctx.mark(10, "ship", WordStatus::Tricky)
        .mark(2, "cat", WordStatus::Mastered);

    let output = run_impl(&ctx.workspace, None, OutputFormat::Text).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("2 "));
    assert!(lines[1].starts_with("10 "));
}

#[test]
fn test_show_missing_pack() {
    let ctx = TestContext::new();
    let output = run_impl(&ctx.workspace, Some(&PackId::Builtin(3)), OutputFormat::Text).unwrap();
    assert_eq!(output, "No progress for pack 3");

    let json = run_impl(&ctx.workspace, Some(&PackId::Builtin(3)), OutputFormat::Json).unwrap();
    assert_eq!(json, "null");
}

#[test]
fn test_show_custom_pack_includes_name() {
    let ctx = TestContext::new();
    let pack = ctx
        .workspace
        .store
        .create_custom_pack("Digraphs", vec!["ship".to_string()])
        .unwrap();
    ctx.workspace
        .store
        .set_word_status(&pack.id, "ship", WordStatus::Mastered)
        .unwrap();

    let output = run_impl(&ctx.workspace, Some(&pack.id), OutputFormat::Text).unwrap();
    assert!(output.starts_with("Pack C1 (Digraphs)"));
    assert!(output.contains("Mastered: ship"));
}

#[test]
fn test_show_json_uses_persisted_field_names() {
    let ctx = TestContext::new();
    ctx.mark(1, "cat", WordStatus::Tricky);

    let json = run_impl(&ctx.workspace, None, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["1"]["words"]["cat"], "tricky");
    assert_eq!(value["1"]["completionCount"], 0);
    assert_eq!(value["1"]["lastReviewed"], "2024-09-01T08:00:00Z");
}

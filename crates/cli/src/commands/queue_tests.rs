// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::TestContext;
use crate::config::{Config, RemoteConfig};
use px_core::{PackId, PendingOp, ProgressRecord, SyncQueue};

/// Workspace whose queue gives up after a single failure.
fn one_shot_context() -> TestContext {
    let mut remote = RemoteConfig::new("ws://localhost:7891", "learner-1").unwrap();
    remote.max_retries = 1;
    TestContext::with_config(Config {
        offline: false,
        remote: Some(remote),
    })
}

fn enqueue_progress(queue: &SyncQueue, pack: u32) {
    queue
        .enqueue(PendingOp::SaveProgress {
            pack_id: PackId::Builtin(pack),
            record: ProgressRecord::default(),
        })
        .unwrap();
}

fn fail_drain(queue: &SyncQueue) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    runtime
        .block_on(queue.drain(|_| async { Err::<(), _>("connection closed") }))
        .unwrap();
}

#[test]
fn test_list_empty_queue() {
    let ctx = TestContext::new();
    assert_eq!(
        list_impl(&ctx.workspace, OutputFormat::Text).unwrap(),
        "Nothing waiting to sync."
    );
}

#[test]
fn test_list_pending_and_set_aside() {
    let ctx = one_shot_context();
    let queue = &ctx.workspace.queue;
    enqueue_progress(queue, 1);
    fail_drain(queue);
    enqueue_progress(queue, 2);

    let text = list_impl(&ctx.workspace, OutputFormat::Text).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Pending (1):");
    assert!(lines[1].contains("progress save 2"));
    assert_eq!(lines[2], "Set aside (1):");
    assert!(lines[3].contains("progress save 1  retries 1"));
}

#[test]
fn test_list_json() {
    let ctx = one_shot_context();
    enqueue_progress(&ctx.workspace.queue, 3);

    let json = list_impl(&ctx.workspace, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["pending"][0]["op"], "save_progress");
    assert_eq!(value["pending"][0]["payload"]["packId"], "3");
    assert_eq!(value["setAside"].as_array().unwrap().len(), 0);
}

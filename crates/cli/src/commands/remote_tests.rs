// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::{TestContext, USER};
use crate::sync::test_helpers::MemoryRemote;
use crate::sync::{SyncError, SyncStatus};
use px_core::{PackId, ProgressRecord, WordStatus};

#[test]
fn test_sync_pulls_remote_progress() {
    let ctx = TestContext::remote();
    let remote = MemoryRemote::shared();
    let mut record = ProgressRecord::default();
    record
        .word_status
        .insert("dog".to_string(), WordStatus::Mastered);
    record.last_reviewed = Some(crate::commands::testing::t0());
    remote.seed_progress(USER, PackId::Builtin(4), record);
    ctx.advance_secs(30).mark(1, "cat", WordStatus::Tricky);

    let session = ctx.session(&remote, true);
    let report = sync_impl(&session).unwrap();

    assert_eq!(report.pulled, 1);
    assert!(ctx
        .workspace
        .store
        .read_progress(&PackId::Builtin(4))
        .unwrap()
        .is_some());
    assert!(remote.progress_of(USER, &PackId::Builtin(1)).is_some());
    assert_eq!(session.state().status, SyncStatus::Success);
}

#[test]
fn test_sync_offline_fails() {
    let ctx = TestContext::remote();
    let remote = MemoryRemote::shared();
    let err = sync_impl(&ctx.session(&remote, false)).unwrap_err();
    assert!(matches!(err, Error::Sync(SyncError::Offline)));
}

#[test]
fn test_status_local_mode() {
    let ctx = TestContext::new();
    let report = status_report(&ctx.workspace, SyncState::default()).unwrap();

    assert_eq!(report.mode, "local");
    let lines = format_status(&report);
    assert_eq!(lines[0], "Mode: local only");
}

#[test]
fn test_status_remote_mode_reports_queue() {
    let ctx = TestContext::remote();
    let remote = MemoryRemote::shared();
    ctx.mark(1, "cat", WordStatus::Tricky);
    let session = ctx.session(&remote, false);
    session
        .publish(&crate::commands::Change::Progress(PackId::Builtin(1)))
        .unwrap();

    let report = status_report(&ctx.workspace, session.state()).unwrap();
    let lines = format_status(&report);

    assert_eq!(lines[0], "Remote: ws://localhost:7891 (learner learner-1)");
    assert_eq!(lines[1], "Status: offline");
    assert_eq!(lines[2], "Pending changes: 1");
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_status_json_fields() {
    let ctx = TestContext::remote();
    let report = status_report(&ctx.workspace, SyncState::default()).unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["mode"], "remote");
    assert_eq!(value["userId"], USER);
    assert_eq!(value["status"], "idle");
    assert_eq!(value["pendingChanges"], 0);
    assert_eq!(value["setAside"], 0);
    assert!(value.get("errorMessage").is_none());
}

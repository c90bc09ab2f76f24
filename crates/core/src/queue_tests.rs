// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the sync queue.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::clock::ManualClock;
use crate::pack::WordStatus;
use crate::persist::{FilePersistence, MemoryPersistence};
use chrono::{Duration, TimeZone};
use tempfile::TempDir;
use yare::parameterized;

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap(),
    ))
}

fn memory_queue() -> (SyncQueue, Arc<MemoryPersistence>) {
    let persistence = Arc::new(MemoryPersistence::new());
    let queue = SyncQueue::open(persistence.clone(), clock()).unwrap();
    (queue, persistence)
}

fn save_progress(pack: u32) -> PendingOp {
    let record = ProgressRecord {
        word_status: [("cat".to_string(), WordStatus::Tricky)].into(),
        last_reviewed: Some(Utc.timestamp_opt(100, 0).unwrap()),
        ..Default::default()
    };
    PendingOp::SaveProgress {
        pack_id: PackId::Builtin(pack),
        record,
    }
}

fn delete_pack(n: u32) -> PendingOp {
    PendingOp::DeleteCustomPack {
        pack_id: PackId::custom(n),
    }
}

#[parameterized(
    progress = { save_progress(1), OpKind::Progress, OpAction::Save },
    delete = { delete_pack(1), OpKind::CustomPack, OpAction::Delete },
)]
fn op_kind_and_action(op: PendingOp, kind: OpKind, action: OpAction) {
    assert_eq!(op.kind(), kind);
    assert_eq!(op.action(), action);
}

#[test]
fn enqueue_assigns_id_and_zero_retries() {
    let (queue, _) = memory_queue();
    let queued = queue.enqueue(save_progress(1)).unwrap();

    assert!(queued.id.starts_with("q-"));
    assert_eq!(queued.retry_count, 0);
    assert_eq!(queue.len(), 1);
}

#[test]
fn enqueue_ids_are_unique_at_same_instant() {
    let (queue, _) = memory_queue();
    let a = queue.enqueue(save_progress(1)).unwrap();
    let b = queue.enqueue(save_progress(1)).unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
fn enqueue_persists_immediately() {
    let dir = TempDir::new().unwrap();
    let persistence = Arc::new(FilePersistence::open(dir.path()).unwrap());
    {
        let queue = SyncQueue::open(persistence.clone(), clock()).unwrap();
        queue.enqueue(save_progress(1)).unwrap();
        queue.enqueue(delete_pack(2)).unwrap();
    }

    let reopened = SyncQueue::open(persistence, clock()).unwrap();
    let ops = reopened.snapshot();
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[0].op, save_progress(1));
    assert_eq!(ops[1].op, delete_pack(2));
}

#[test]
fn persisted_line_layout() {
    let (queue, persistence) = memory_queue();
    queue.enqueue(delete_pack(3)).unwrap();

    let text = persistence.load(QUEUE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
    assert_eq!(value["op"], "delete_custom_pack");
    assert_eq!(value["payload"]["packId"], "C3");
    assert_eq!(value["retryCount"], 0);
    assert!(value["enqueuedAt"].is_string());
}

#[test]
fn dequeue_by_id() {
    let (queue, _) = memory_queue();
    let first = queue.enqueue(save_progress(1)).unwrap();
    queue.enqueue(save_progress(2)).unwrap();

    assert!(queue.dequeue(&first.id).unwrap());
    assert!(!queue.dequeue(&first.id).unwrap());
    assert_eq!(queue.snapshot()[0].op, save_progress(2));
}

#[test]
fn corrupted_queue_blob_fails_to_open() {
    let persistence = Arc::new(MemoryPersistence::new());
    persistence.store(QUEUE_KEY, "garbage\n").unwrap();
    assert!(matches!(
        SyncQueue::open(persistence, clock()),
        Err(Error::CorruptedData { .. })
    ));
}

#[tokio::test]
async fn drain_fifo_and_retry_ceiling() {
    let (queue, _) = memory_queue();
    let first = queue.enqueue(save_progress(1)).unwrap();
    queue.enqueue(save_progress(2)).unwrap();
    queue.enqueue(save_progress(3)).unwrap();

    let attempts: Mutex<HashMap<String, usize>> = Mutex::new(HashMap::new());
    let order: Mutex<Vec<PackId>> = Mutex::new(Vec::new());
    let failing = first.id.clone();

    let mut reports = Vec::new();
    for _ in 0..3 {
        let report = queue
            .drain(|q| {
                *attempts.lock().unwrap().entry(q.id.clone()).or_default() += 1;
                order.lock().unwrap().push(q.op.pack_id().clone());
                let fail = q.id == failing;
                async move {
                    if fail {
                        Err("remote unavailable")
                    } else {
                        Ok(())
                    }
                }
            })
            .await
            .unwrap();
        reports.push(report);
    }

    // First pass replays in FIFO order
    assert_eq!(
        order.lock().unwrap()[..3],
        [PackId::Builtin(1), PackId::Builtin(2), PackId::Builtin(3)]
    );
    assert_eq!(
        reports[0],
        DrainReport {
            replayed: 2,
            retrying: 1,
            dropped: 0
        }
    );
    assert_eq!(
        reports[1],
        DrainReport {
            replayed: 0,
            retrying: 1,
            dropped: 0
        }
    );
    assert_eq!(
        reports[2],
        DrainReport {
            replayed: 0,
            retrying: 0,
            dropped: 1
        }
    );

    let attempts = attempts.lock().unwrap();
    assert_eq!(attempts[&first.id], 3);
    assert_eq!(attempts.len(), 3);
    assert!(attempts.iter().filter(|(id, _)| **id != first.id).all(|(_, n)| *n == 1));

    assert!(queue.is_empty());
    let dead = queue.dead_letters().unwrap();
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].id, first.id);
    assert_eq!(dead[0].retry_count, 3);
}

#[tokio::test]
async fn failure_updates_retry_count_in_place() {
    let (queue, _) = memory_queue();
    queue.enqueue(save_progress(1)).unwrap();
    queue.enqueue(save_progress(2)).unwrap();

    queue
        .drain(|_| async { Err::<(), _>("offline") })
        .await
        .unwrap();

    let ops = queue.snapshot();
    assert_eq!(ops.len(), 2);
    assert!(ops.iter().all(|q| q.retry_count == 1));
    assert_eq!(ops[0].op, save_progress(1));
}

#[tokio::test]
async fn items_enqueued_during_drain_wait_for_next_pass() {
    let (queue, _) = memory_queue();
    queue.enqueue(save_progress(1)).unwrap();

    let calls = AtomicUsize::new(0);
    let report = queue
        .drain(|_| {
            calls.fetch_add(1, Ordering::SeqCst);
            queue.enqueue(save_progress(9)).unwrap();
            async { Ok::<(), String>(()) }
        })
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.replayed, 1);
    let ops = queue.snapshot();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].op, save_progress(9));
}

#[tokio::test]
async fn configurable_retry_ceiling() {
    let (queue, _) = memory_queue();
    let queue = queue.with_max_retries(1);
    queue.enqueue(delete_pack(1)).unwrap();

    let report = queue
        .drain(|_| async { Err::<(), _>("boom") })
        .await
        .unwrap();
    assert_eq!(report.dropped, 1);
    assert!(queue.is_empty());
}

#[tokio::test]
async fn requeue_dead_letters_resets_retries() {
    let (queue, _) = memory_queue();
    let queue = queue.with_max_retries(1);
    queue.enqueue(save_progress(1)).unwrap();
    queue
        .drain(|_| async { Err::<(), _>("boom") })
        .await
        .unwrap();

    assert_eq!(queue.requeue_dead_letters().unwrap(), 1);
    assert!(queue.dead_letters().unwrap().is_empty());
    let ops = queue.snapshot();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].retry_count, 0);

    let report = queue
        .drain(|_| async { Ok::<(), String>(()) })
        .await
        .unwrap();
    assert_eq!(report.replayed, 1);
}

#[tokio::test]
async fn clear_dead_letters_discards() {
    let (queue, _) = memory_queue();
    let queue = queue.with_max_retries(1);
    queue.enqueue(save_progress(1)).unwrap();
    queue.enqueue(save_progress(2)).unwrap();
    queue
        .drain(|_| async { Err::<(), _>("boom") })
        .await
        .unwrap();

    assert_eq!(queue.clear_dead_letters().unwrap(), 2);
    assert!(queue.dead_letters().unwrap().is_empty());
    assert_eq!(queue.clear_dead_letters().unwrap(), 0);
}

#[test]
fn enqueue_timestamp_comes_from_clock() {
    let persistence = Arc::new(MemoryPersistence::new());
    let clock = clock();
    let queue = SyncQueue::open(persistence, clock.clone()).unwrap();
    clock.advance(Duration::minutes(3));

    let queued = queue.enqueue(save_progress(1)).unwrap();
    assert_eq!(queued.enqueued_at, clock.now());
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable outbox of pending remote operations.
//!
//! The queue is persisted as JSON Lines after every change, so a crash never
//! loses an accepted operation. Draining works on a snapshot in FIFO order:
//! successes are removed, failures have their retry count bumped in place,
//! and operations that reach the retry ceiling move to a dead-letter list.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::id::{generate_unique_id, QUEUE_ID_PREFIX};
use crate::jsonl;
use crate::pack::{CustomPack, PackId, ProgressRecord};
use crate::persist::{PersistencePort, DEAD_LETTER_KEY, QUEUE_KEY};

/// Failures tolerated before an operation is dead-lettered.
pub const MAX_RETRIES: u32 = 3;

/// Which record family an operation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OpKind {
    Progress,
    CustomPack,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::Progress => f.write_str("progress"),
            OpKind::CustomPack => f.write_str("customPack"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpAction {
    Save,
    Delete,
}

impl fmt::Display for OpAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpAction::Save => f.write_str("save"),
            OpAction::Delete => f.write_str("delete"),
        }
    }
}

/// A remote effect waiting to be replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "payload", rename_all = "snake_case")]
pub enum PendingOp {
    SaveProgress {
        #[serde(rename = "packId")]
        pack_id: PackId,
        record: ProgressRecord,
    },
    SaveCustomPack {
        pack: CustomPack,
    },
    DeleteCustomPack {
        #[serde(rename = "packId")]
        pack_id: PackId,
    },
}

impl PendingOp {
    pub fn kind(&self) -> OpKind {
        match self {
            PendingOp::SaveProgress { .. } => OpKind::Progress,
            PendingOp::SaveCustomPack { .. } | PendingOp::DeleteCustomPack { .. } => {
                OpKind::CustomPack
            }
        }
    }

    pub fn action(&self) -> OpAction {
        match self {
            PendingOp::SaveProgress { .. } | PendingOp::SaveCustomPack { .. } => OpAction::Save,
            PendingOp::DeleteCustomPack { .. } => OpAction::Delete,
        }
    }

    /// The pack this operation targets.
    pub fn pack_id(&self) -> &PackId {
        match self {
            PendingOp::SaveProgress { pack_id, .. } | PendingOp::DeleteCustomPack { pack_id } => {
                pack_id
            }
            PendingOp::SaveCustomPack { pack } => &pack.id,
        }
    }
}

/// An operation as stored in the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedOperation {
    pub id: String,
    #[serde(flatten)]
    pub op: PendingOp,
    pub enqueued_at: DateTime<Utc>,
    pub retry_count: u32,
}

/// Outcome of one drain pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    /// Operations replayed successfully and removed.
    pub replayed: usize,
    /// Operations that failed and remain queued.
    pub retrying: usize,
    /// Operations that hit the retry ceiling and were dead-lettered.
    pub dropped: usize,
}

#[derive(Debug)]
struct QueueState {
    ops: Vec<QueuedOperation>,
    seq: u64,
}

/// Persistent FIFO queue of [`QueuedOperation`]s.
pub struct SyncQueue {
    persistence: Arc<dyn PersistencePort>,
    clock: Arc<dyn Clock>,
    max_retries: u32,
    state: Mutex<QueueState>,
}

impl SyncQueue {
    /// Opens the queue, loading any operations persisted by a previous run.
    pub fn open(persistence: Arc<dyn PersistencePort>, clock: Arc<dyn Clock>) -> Result<Self> {
        let ops: Vec<QueuedOperation> = load_list(persistence.as_ref(), QUEUE_KEY)?;
        let seq = ops.len() as u64;
        Ok(SyncQueue {
            persistence,
            clock,
            max_retries: MAX_RETRIES,
            state: Mutex::new(QueueState { ops, seq }),
        })
    }

    /// Overrides the retry ceiling.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, ops: &[QueuedOperation]) -> Result<()> {
        self.persistence.store(QUEUE_KEY, &jsonl::encode(ops)?)
    }

    /// Appends an operation and persists the queue before returning.
    pub fn enqueue(&self, op: PendingOp) -> Result<QueuedOperation> {
        let now = self.clock.now();
        let mut state = self.lock();

        let subject = format!("{}:{}:{}", op.kind(), op.action(), op.pack_id());
        let seq = state.seq;
        let id = generate_unique_id(QUEUE_ID_PREFIX, &subject, &now, seq, |candidate| {
            state.ops.iter().any(|q| q.id == candidate)
        });

        let queued = QueuedOperation {
            id,
            op,
            enqueued_at: now,
            retry_count: 0,
        };

        state.ops.push(queued.clone());
        state.seq += 1;
        self.persist(&state.ops)?;

        tracing::debug!(id = %queued.id, kind = %queued.op.kind(), pack = %queued.op.pack_id(), "enqueued");
        Ok(queued)
    }

    /// Removes an operation by id. Returns false if it was not queued.
    pub fn dequeue(&self, id: &str) -> Result<bool> {
        let mut state = self.lock();
        let before = state.ops.len();
        state.ops.retain(|q| q.id != id);
        if state.ops.len() == before {
            return Ok(false);
        }
        self.persist(&state.ops)?;
        Ok(true)
    }

    /// Returns a copy of the queued operations in FIFO order.
    pub fn snapshot(&self) -> Vec<QueuedOperation> {
        self.lock().ops.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().ops.is_empty()
    }

    /// Replays a snapshot of the queue through `replay`.
    ///
    /// Operations enqueued while the drain runs are left for the next pass.
    pub async fn drain<F, Fut, E>(&self, mut replay: F) -> Result<DrainReport>
    where
        F: FnMut(QueuedOperation) -> Fut,
        Fut: Future<Output = std::result::Result<(), E>>,
        E: fmt::Display,
    {
        let batch = self.snapshot();
        let mut report = DrainReport::default();

        for queued in batch {
            let id = queued.id.clone();
            match replay(queued).await {
                Ok(()) => {
                    self.dequeue(&id)?;
                    report.replayed += 1;
                }
                Err(e) => {
                    if self.record_failure(&id, &e.to_string())? {
                        report.dropped += 1;
                    } else {
                        report.retrying += 1;
                    }
                }
            }
        }

        tracing::debug!(
            replayed = report.replayed,
            retrying = report.retrying,
            dropped = report.dropped,
            "drain finished"
        );
        Ok(report)
    }

    /// Bumps the retry count of `id`. Returns true if it was dead-lettered.
    fn record_failure(&self, id: &str, reason: &str) -> Result<bool> {
        let mut state = self.lock();
        let Some(pos) = state.ops.iter().position(|q| q.id == id) else {
            return Ok(false);
        };

        state.ops[pos].retry_count += 1;
        if state.ops[pos].retry_count < self.max_retries {
            tracing::debug!(id, retry = state.ops[pos].retry_count, reason, "replay failed");
            self.persist(&state.ops)?;
            return Ok(false);
        }

        let dead = state.ops.remove(pos);
        let mut letters: Vec<QueuedOperation> =
            load_list(self.persistence.as_ref(), DEAD_LETTER_KEY)?;
        letters.push(dead.clone());
        self.persistence
            .store(DEAD_LETTER_KEY, &jsonl::encode(&letters)?)?;
        self.persist(&state.ops)?;

        tracing::warn!(
            id = %dead.id,
            kind = %dead.op.kind(),
            action = %dead.op.action(),
            pack = %dead.op.pack_id(),
            retries = dead.retry_count,
            reason,
            "operation exceeded retry limit, moved to dead letters"
        );
        Ok(true)
    }

    // -- dead letters --

    pub fn dead_letters(&self) -> Result<Vec<QueuedOperation>> {
        let _state = self.lock();
        load_list(self.persistence.as_ref(), DEAD_LETTER_KEY)
    }

    /// Moves every dead letter back to the end of the queue with a fresh retry count.
    pub fn requeue_dead_letters(&self) -> Result<usize> {
        let mut state = self.lock();
        let letters: Vec<QueuedOperation> = load_list(self.persistence.as_ref(), DEAD_LETTER_KEY)?;
        let count = letters.len();
        if count == 0 {
            return Ok(0);
        }

        for mut letter in letters {
            letter.retry_count = 0;
            if !state.ops.iter().any(|q| q.id == letter.id) {
                state.ops.push(letter);
            }
        }
        self.persist(&state.ops)?;
        self.persistence.remove(DEAD_LETTER_KEY)?;

        tracing::info!(count, "requeued dead letters");
        Ok(count)
    }

    /// Discards the dead-letter list. Returns how many were discarded.
    pub fn clear_dead_letters(&self) -> Result<usize> {
        let _state = self.lock();
        let count = load_list::<QueuedOperation>(self.persistence.as_ref(), DEAD_LETTER_KEY)?.len();
        self.persistence.remove(DEAD_LETTER_KEY)?;
        Ok(count)
    }
}

fn load_list<T: serde::de::DeserializeOwned>(
    persistence: &dyn PersistencePort,
    key: &str,
) -> Result<Vec<T>> {
    match persistence.load(key)? {
        Some(text) => jsonl::decode(&text).map_err(|e| Error::CorruptedData {
            key: key.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;

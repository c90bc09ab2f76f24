// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Observable sync status.
//!
//! [`SyncStateBus`] holds the single [`SyncState`] of a process. Observers get
//! read-only snapshots or a watch receiver; only the engine transitions it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Success,
    Error,
    Offline,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncStatus::Idle => "idle",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Success => "success",
            SyncStatus::Error => "error",
            SyncStatus::Offline => "offline",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    pub status: SyncStatus,
    pub last_sync_time: Option<DateTime<Utc>>,
    pub pending_changes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Publish/subscribe holder for the process-wide [`SyncState`].
#[derive(Debug, Clone)]
pub struct SyncStateBus {
    tx: Arc<watch::Sender<SyncState>>,
    epoch: Arc<AtomicU64>,
}

impl Default for SyncStateBus {
    fn default() -> Self {
        Self::new(SyncState::default())
    }
}

impl SyncStateBus {
    pub fn new(initial: SyncState) -> Self {
        let (tx, _) = watch::channel(initial);
        SyncStateBus {
            tx: Arc::new(tx),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> SyncState {
        self.tx.borrow().clone()
    }

    /// Subscribe to state changes. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.tx.subscribe()
    }

    /// Counter bumped on every transition.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Applies a transition and notifies subscribers. Returns the new epoch.
    pub(crate) fn update<F>(&self, apply: F) -> u64
    where
        F: FnOnce(&mut SyncState),
    {
        self.tx.send_modify(apply);
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let state = self.tx.borrow();
        tracing::debug!(status = %state.status, pending = state.pending_changes, "sync state");
        epoch
    }

    /// Applies `apply` only if nothing else transitioned since `epoch`.
    pub(crate) fn update_if_unchanged<F>(&self, epoch: u64, apply: F) -> bool
    where
        F: FnOnce(&mut SyncState),
    {
        if self
            .epoch
            .compare_exchange(epoch, epoch + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        self.tx.send_modify(apply);
        true
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;

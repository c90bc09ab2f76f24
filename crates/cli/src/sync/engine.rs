// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync orchestration between the local store and the account store.
//!
//! The engine owns no data. It drives three flows:
//! - Initialize: pull remote state, merge it into the local store, push the
//!   reconciled state back, then drain the queue
//! - Per-mutation sync: push one record right after a local write, or queue
//!   it when offline or when the push fails
//! - Recovery: drain the queue when connectivity returns, and retry failed
//!   items after a fixed delay
//!
//! Remote writes for the same record are serialized by a per-pack async mutex,
//! and every save transmits the latest local copy at send time.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use px_core::{
    merge_custom_packs, merge_progress, CustomPack, DrainReport, LocalStore, OpKind, PackId,
    PendingOp, ProgressRecord, SyncQueue,
};

use super::connectivity::ConnectivityPort;
use super::remote::{RemoteError, RemoteResult, RemoteStore};
use super::state::{SyncState, SyncStateBus, SyncStatus};

/// Delay before failed queue items are retried.
pub const RETRY_DELAY: Duration = Duration::from_secs(5);
/// How long `success` is shown before reverting to `idle`.
pub const SUCCESS_LINGER: Duration = Duration::from_secs(2);

/// Timing knobs for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub retry_delay: Duration,
    pub success_linger: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            retry_delay: RETRY_DELAY,
            success_linger: SUCCESS_LINGER,
        }
    }
}

/// Error type for sync engine operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Remote store error.
    #[error("{0}")]
    Remote(#[from] RemoteError),

    /// Local store or queue error.
    #[error("{0}")]
    Store(#[from] px_core::Error),

    /// No connectivity.
    #[error("device is offline")]
    Offline,
}

/// Result type for sync engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// What happened to a per-mutation sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The remote write succeeded.
    Synced,
    /// The operation was queued for a later drain.
    Queued,
}

/// Summary of one initialize pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InitReport {
    /// Remote records fetched (progress and custom packs).
    pub pulled: usize,
    /// Local records changed by the merge.
    pub merged: usize,
    /// Records pushed back successfully.
    pub pushed: usize,
    /// Records whose push failed and were queued.
    pub queued: usize,
    /// Result of the trailing queue drain.
    pub drain: DrainReport,
}

/// Boxed drain future, `'static` so the retry timer can re-arm it.
pub type DrainFuture = Pin<Box<dyn Future<Output = SyncResult<DrainReport>> + Send + 'static>>;

type PackLock = Arc<tokio::sync::Mutex<()>>;

/// Coordinates the local store, the queue, and a [`RemoteStore`].
pub struct SyncEngine<R: RemoteStore + 'static> {
    user_id: String,
    store: Arc<LocalStore>,
    queue: Arc<SyncQueue>,
    remote: Arc<R>,
    connectivity: Arc<dyn ConnectivityPort>,
    bus: SyncStateBus,
    config: EngineConfig,
    pack_locks: Mutex<HashMap<(OpKind, PackId), PackLock>>,
    drain_lock: tokio::sync::Mutex<()>,
    retry_task: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<R: RemoteStore + 'static> SyncEngine<R> {
    pub fn new(
        user_id: impl Into<String>,
        store: Arc<LocalStore>,
        queue: Arc<SyncQueue>,
        remote: Arc<R>,
        connectivity: Arc<dyn ConnectivityPort>,
    ) -> Self {
        let engine = SyncEngine {
            user_id: user_id.into(),
            store,
            queue,
            remote,
            connectivity,
            bus: SyncStateBus::default(),
            config: EngineConfig::default(),
            pack_locks: Mutex::new(HashMap::new()),
            drain_lock: tokio::sync::Mutex::new(()),
            retry_task: Mutex::new(None),
        };
        engine.publish_initial_state();
        engine
    }

    /// Replace the timing knobs.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Publish state on an existing bus instead of a private one.
    pub fn with_bus(mut self, bus: SyncStateBus) -> Self {
        self.bus = bus;
        self.publish_initial_state();
        self
    }

    fn publish_initial_state(&self) {
        let pending = self.queue.len();
        let online = self.connectivity.is_online();
        self.bus.update(|s| {
            s.pending_changes = pending;
            if !online {
                s.status = SyncStatus::Offline;
            }
        });
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn bus(&self) -> &SyncStateBus {
        &self.bus
    }

    pub fn state(&self) -> SyncState {
        self.bus.state()
    }

    pub fn queue(&self) -> &SyncQueue {
        &self.queue
    }

    // -- state transitions --

    fn set_syncing(&self) {
        self.bus.update(|s| {
            s.status = SyncStatus::Syncing;
            s.error_message = None;
        });
    }

    fn set_success(&self) {
        let pending = self.queue.len();
        let epoch = self.bus.update(|s| {
            s.status = SyncStatus::Success;
            s.last_sync_time = Some(Utc::now());
            s.pending_changes = pending;
            s.error_message = None;
        });

        let bus = self.bus.clone();
        let linger = self.config.success_linger;
        tokio::spawn(async move {
            tokio::time::sleep(linger).await;
            bus.update_if_unchanged(epoch, |s| {
                if s.status == SyncStatus::Success {
                    s.status = SyncStatus::Idle;
                }
            });
        });
    }

    fn set_error(&self, message: String) {
        let pending = self.queue.len();
        self.bus.update(|s| {
            s.status = SyncStatus::Error;
            s.pending_changes = pending;
            s.error_message = Some(message);
        });
    }

    fn set_offline(&self) {
        let pending = self.queue.len();
        self.bus.update(|s| {
            s.status = SyncStatus::Offline;
            s.pending_changes = pending;
        });
    }

    fn refresh_pending(&self) {
        let pending = self.queue.len();
        self.bus.update(|s| s.pending_changes = pending);
    }

    // -- remote writes --

    fn pack_lock(&self, kind: OpKind, pack: &PackId) -> PackLock {
        let mut locks = lock(&self.pack_locks);
        Arc::clone(locks.entry((kind, pack.clone())).or_default())
    }

    /// Applies one pending operation to the remote.
    ///
    /// Saves send the current local record rather than the queued payload, so
    /// a replay can never regress the remote to an older local state. A save
    /// for a custom pack that no longer exists locally is skipped.
    async fn replay(&self, op: &PendingOp) -> RemoteResult<()> {
        let pack_lock = self.pack_lock(op.kind(), op.pack_id());
        let _serialized = pack_lock.lock().await;

        match op {
            PendingOp::SaveProgress { pack_id, record } => {
                let latest = match self.store.read_progress(pack_id) {
                    Ok(Some(latest)) => latest,
                    Ok(None) => record.clone(),
                    Err(e) => {
                        tracing::warn!(pack = %pack_id, error = %e, "reading local progress failed, sending queued copy");
                        record.clone()
                    }
                };
                self.remote
                    .upsert_progress(&self.user_id, pack_id, &latest)
                    .await
            }
            PendingOp::SaveCustomPack { pack } => {
                let latest = match self.store.custom_pack(&pack.id) {
                    Ok(Some(latest)) => latest,
                    Ok(None) => {
                        tracing::debug!(pack = %pack.id, "custom pack deleted locally, skipping save");
                        return Ok(());
                    }
                    Err(e) => {
                        tracing::warn!(pack = %pack.id, error = %e, "reading local custom pack failed, sending queued copy");
                        pack.clone()
                    }
                };
                self.remote.upsert_custom_pack(&self.user_id, &latest).await
            }
            PendingOp::DeleteCustomPack { pack_id } => {
                self.remote.delete_custom_pack(&self.user_id, pack_id).await
            }
        }
    }

    async fn push_or_enqueue(self: &Arc<Self>, op: PendingOp) -> SyncResult<SyncOutcome> {
        if !self.connectivity.is_online() {
            tracing::debug!(pack = %op.pack_id(), kind = %op.kind(), "offline, queueing");
            self.queue.enqueue(op)?;
            self.set_offline();
            return Ok(SyncOutcome::Queued);
        }

        match self.replay(&op).await {
            Ok(()) => {
                self.set_success();
                Ok(SyncOutcome::Synced)
            }
            Err(e) => {
                tracing::warn!(pack = %op.pack_id(), kind = %op.kind(), error = %e, "remote write failed, queueing");
                self.queue.enqueue(op)?;
                self.set_error(format!(
                    "{} item(s) failed to sync. Will retry.",
                    self.queue.len()
                ));
                self.schedule_retry();
                Ok(SyncOutcome::Queued)
            }
        }
    }

    /// Push the local progress of `pack` after a local write.
    pub async fn sync_progress(self: &Arc<Self>, pack: &PackId) -> SyncResult<SyncOutcome> {
        let record = self
            .store
            .read_progress(pack)?
            .ok_or_else(|| px_core::Error::NoProgress(pack.to_string()))?;
        self.push_or_enqueue(PendingOp::SaveProgress {
            pack_id: pack.clone(),
            record,
        })
        .await
    }

    /// Push a created or edited custom pack.
    pub async fn sync_custom_pack(self: &Arc<Self>, pack: &CustomPack) -> SyncResult<SyncOutcome> {
        self.push_or_enqueue(PendingOp::SaveCustomPack { pack: pack.clone() })
            .await
    }

    /// Propagate a local custom pack deletion.
    pub async fn sync_custom_pack_deletion(
        self: &Arc<Self>,
        pack: &PackId,
    ) -> SyncResult<SyncOutcome> {
        self.push_or_enqueue(PendingOp::DeleteCustomPack {
            pack_id: pack.clone(),
        })
        .await
    }

    // -- queue drain --

    /// Replay the queue once.
    ///
    /// No-op when the queue is empty. When offline the status becomes
    /// `offline`. Items that fail below the retry ceiling arm the retry timer.
    pub fn drain_queue(self: &Arc<Self>) -> DrainFuture {
        let engine = Arc::clone(self);
        Box::pin(async move { engine.drain_once().await })
    }

    async fn drain_once(self: &Arc<Self>) -> SyncResult<DrainReport> {
        let _running = self.drain_lock.lock().await;

        if self.queue.is_empty() {
            return Ok(DrainReport::default());
        }
        if !self.connectivity.is_online() {
            self.set_offline();
            return Ok(DrainReport::default());
        }

        self.set_syncing();
        let engine: &Self = self;
        let report = match self
            .queue
            .drain(move |queued| async move { engine.replay(&queued.op).await })
            .await
        {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "queue drain failed");
                self.set_error(e.to_string());
                return Err(e.into());
            }
        };

        if report.dropped > 0 {
            tracing::warn!(
                dropped = report.dropped,
                "operations exceeded the retry limit and were moved to dead letters"
            );
        }

        if report.retrying > 0 {
            self.set_error(format!(
                "{} item(s) failed to sync. Will retry.",
                report.retrying
            ));
            self.schedule_retry();
        } else if report.dropped > 0 {
            self.set_error(format!(
                "{} item(s) could not be synced and were set aside.",
                report.dropped
            ));
        } else if self.queue.is_empty() {
            self.set_success();
        } else {
            // Items were enqueued during the pass
            self.bus.update(|s| s.status = SyncStatus::Idle);
            self.refresh_pending();
        }

        tracing::info!(
            replayed = report.replayed,
            retrying = report.retrying,
            dropped = report.dropped,
            "queue drained"
        );
        Ok(report)
    }

    /// Arm the retry timer, cancelling any pending one.
    fn schedule_retry(self: &Arc<Self>) {
        let engine = Arc::clone(self);
        let delay = self.config.retry_delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detach our own handle so the drain below can arm a new timer
            lock(&engine.retry_task).take();

            if engine.connectivity.is_online() && !engine.queue.is_empty() {
                tracing::info!("retrying failed sync items");
                if let Err(e) = engine.drain_queue().await {
                    tracing::warn!(error = %e, "retry drain failed");
                }
            }
        });

        if let Some(previous) = lock(&self.retry_task).replace(handle) {
            previous.abort();
        }
    }

    /// Returns true while a retry timer is armed.
    pub fn retry_pending(&self) -> bool {
        lock(&self.retry_task)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancel the retry timer, if any.
    pub fn cancel_retry(&self) {
        if let Some(handle) = lock(&self.retry_task).take() {
            handle.abort();
        }
    }

    // -- connectivity --

    /// Spawn the task reacting to connectivity transitions.
    pub fn watch_connectivity(self: &Arc<Self>) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        let mut transitions = self.connectivity.subscribe();

        tokio::spawn(async move {
            while transitions.changed().await.is_ok() {
                let online = *transitions.borrow_and_update();
                if online {
                    engine.handle_online().await;
                } else {
                    engine.set_offline();
                }
            }
        })
    }

    async fn handle_online(self: &Arc<Self>) {
        if self.state().status == SyncStatus::Offline {
            self.bus.update(|s| s.status = SyncStatus::Idle);
        }
        if !self.queue.is_empty() {
            if let Err(e) = self.drain_queue().await {
                tracing::warn!(error = %e, "drain after reconnect failed");
            }
        }
    }

    // -- initialize --

    /// Full reconciliation: pull, merge, persist, push, then drain.
    ///
    /// Pushes that fail here are queued and picked up by the trailing drain.
    pub async fn initialize(self: &Arc<Self>) -> SyncResult<InitReport> {
        if !self.connectivity.is_online() {
            self.set_offline();
            return Err(SyncError::Offline);
        }

        self.set_syncing();
        let mut report = match self.reconcile().await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "initial sync failed");
                self.set_error(e.to_string());
                return Err(e);
            }
        };

        report.drain = self.drain_queue().await?;
        if report.drain.retrying == 0 && report.drain.dropped == 0 {
            self.set_success();
        }

        tracing::info!(
            pulled = report.pulled,
            merged = report.merged,
            pushed = report.pushed,
            queued = report.queued,
            "initial sync finished"
        );
        Ok(report)
    }

    async fn reconcile(&self) -> SyncResult<InitReport> {
        let mut report = InitReport::default();

        let remote_progress = self.remote.fetch_progress(&self.user_id).await?;
        let remote_packs = self.remote.fetch_custom_packs(&self.user_id).await?;
        report.pulled = remote_progress.len() + remote_packs.len();

        // Progress
        let remote_records: BTreeMap<PackId, ProgressRecord> = remote_progress
            .into_iter()
            .filter_map(|(pack, remote)| match remote.record.validate(&pack) {
                Ok(()) => Some((pack, remote.record)),
                Err(e) => {
                    tracing::warn!(pack = %pack, error = %e, "ignoring invalid remote progress");
                    None
                }
            })
            .collect();
        let local_records = self.store.all_progress()?;
        let merged_records = merge_progress(&local_records, &remote_records);
        for (pack, record) in &merged_records {
            if local_records.get(pack) != Some(record) {
                self.store.write_progress(pack, record.clone())?;
                report.merged += 1;
            }
        }

        // Custom packs; a pack with a queued deletion stays deleted
        let pending_deletes: HashSet<PackId> = self
            .queue
            .snapshot()
            .into_iter()
            .filter_map(|queued| match queued.op {
                PendingOp::DeleteCustomPack { pack_id } => Some(pack_id),
                _ => None,
            })
            .collect();
        let remote_packs: Vec<CustomPack> = remote_packs
            .into_iter()
            .filter(|pack| !pending_deletes.contains(&pack.id))
            .filter(|pack| match pack.validate() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(pack = %pack.id, error = %e, "ignoring invalid remote custom pack");
                    false
                }
            })
            .collect();
        let local_packs = self.store.custom_packs()?;
        let merged_packs = merge_custom_packs(&local_packs, &remote_packs);
        for pack in &merged_packs {
            if !local_packs.contains(pack) {
                self.store.put_custom_pack(pack.clone())?;
                report.merged += 1;
            }
        }

        // Push the reconciled state back
        let ops = merged_records
            .into_iter()
            .map(|(pack_id, record)| PendingOp::SaveProgress { pack_id, record })
            .chain(
                merged_packs
                    .into_iter()
                    .map(|pack| PendingOp::SaveCustomPack { pack }),
            );

        let mut reachable = true;
        for op in ops {
            if reachable {
                match self.replay(&op).await {
                    Ok(()) => {
                        report.pushed += 1;
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(pack = %op.pack_id(), error = %e, "push failed, queueing");
                        if !matches!(e, RemoteError::Server(_)) {
                            reachable = false;
                        }
                    }
                }
            }
            self.queue.enqueue(op)?;
            report.queued += 1;
        }
        self.refresh_pending();

        Ok(report)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

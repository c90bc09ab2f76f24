// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use px_core::{
    CustomPack, LocalStore, ManualClock, MemoryPersistence, PackId, PersistencePort,
    ProgressRecord, RemoteProgress, SyncQueue,
};

use super::connectivity::{ConnectivityMonitor, ConnectivityPort};
use super::engine::{EngineConfig, SyncEngine};
use super::remote::{RemoteError, RemoteFuture, RemoteResult, RemoteStore};
use super::transport::TransportError;

/// Fixed start time for simulated devices.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap()
}

/// In-memory account store shared by simulated devices.
#[derive(Default)]
pub struct MemoryRemote {
    progress: Mutex<HashMap<String, BTreeMap<PackId, RemoteProgress>>>,
    packs: Mutex<HashMap<String, BTreeMap<PackId, CustomPack>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl MemoryRemote {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every fetch fail with a transport error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every upsert and delete fail with a transport error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Names of the calls received, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn progress_of(&self, user: &str, pack: &PackId) -> Option<ProgressRecord> {
        self.progress
            .lock()
            .unwrap()
            .get(user)
            .and_then(|m| m.get(pack))
            .map(|r| r.record.clone())
    }

    pub fn pack_of(&self, user: &str, pack: &PackId) -> Option<CustomPack> {
        self.packs
            .lock()
            .unwrap()
            .get(user)
            .and_then(|m| m.get(pack))
            .cloned()
    }

    /// Store a record directly, bypassing failure flags.
    pub fn seed_progress(&self, user: &str, pack: PackId, record: ProgressRecord) {
        self.progress
            .lock()
            .unwrap()
            .entry(user.to_string())
            .or_default()
            .insert(
                pack,
                RemoteProgress {
                    record,
                    synced_at: Some(Utc::now()),
                },
            );
    }

    pub fn seed_pack(&self, user: &str, pack: CustomPack) {
        self.packs
            .lock()
            .unwrap()
            .entry(user.to_string())
            .or_default()
            .insert(pack.id.clone(), pack);
    }

    fn record_call(&self, name: &str, pack: Option<&PackId>) {
        let entry = match pack {
            Some(pack) => format!("{name}:{pack}"),
            None => name.to_string(),
        };
        self.calls.lock().unwrap().push(entry);
    }

    fn check(&self, flag: &AtomicBool) -> RemoteResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(RemoteError::Transport(TransportError::ConnectionClosed));
        }
        Ok(())
    }
}

impl RemoteStore for MemoryRemote {
    fn fetch_progress<'a>(
        &'a self,
        user_id: &'a str,
    ) -> RemoteFuture<'a, BTreeMap<PackId, RemoteProgress>> {
        Box::pin(async move {
            self.record_call("fetch_progress", None);
            self.check(&self.fail_reads)?;
            Ok(self
                .progress
                .lock()
                .unwrap()
                .get(user_id)
                .cloned()
                .unwrap_or_default())
        })
    }

    fn upsert_progress<'a>(
        &'a self,
        user_id: &'a str,
        pack_id: &'a PackId,
        record: &'a ProgressRecord,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.record_call("upsert_progress", Some(pack_id));
            self.check(&self.fail_writes)?;
            self.seed_progress(user_id, pack_id.clone(), record.clone());
            Ok(())
        })
    }

    fn fetch_custom_packs<'a>(&'a self, user_id: &'a str) -> RemoteFuture<'a, Vec<CustomPack>> {
        Box::pin(async move {
            self.record_call("fetch_custom_packs", None);
            self.check(&self.fail_reads)?;
            Ok(self
                .packs
                .lock()
                .unwrap()
                .get(user_id)
                .map(|m| m.values().cloned().collect())
                .unwrap_or_default())
        })
    }

    fn upsert_custom_pack<'a>(
        &'a self,
        user_id: &'a str,
        pack: &'a CustomPack,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.record_call("upsert_custom_pack", Some(&pack.id));
            self.check(&self.fail_writes)?;
            self.seed_pack(user_id, pack.clone());
            Ok(())
        })
    }

    fn delete_custom_pack<'a>(
        &'a self,
        user_id: &'a str,
        pack_id: &'a PackId,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.record_call("delete_custom_pack", Some(pack_id));
            self.check(&self.fail_writes)?;
            if let Some(packs) = self.packs.lock().unwrap().get_mut(user_id) {
                packs.remove(pack_id);
            }
            Ok(())
        })
    }
}

/// In-memory persistence whose writes can be made to fail.
#[derive(Default)]
pub struct FlakyPersistence {
    inner: MemoryPersistence,
    fail_stores: AtomicBool,
}

impl FlakyPersistence {
    pub fn fail_stores(&self, fail: bool) {
        self.fail_stores.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> px_core::Result<()> {
        if self.fail_stores.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("disk full").into());
        }
        Ok(())
    }
}

impl PersistencePort for FlakyPersistence {
    fn load(&self, key: &str) -> px_core::Result<Option<String>> {
        self.inner.load(key)
    }

    fn store(&self, key: &str, value: &str) -> px_core::Result<()> {
        self.check()?;
        self.inner.store(key, value)
    }

    fn remove(&self, key: &str) -> px_core::Result<()> {
        self.check()?;
        self.inner.remove(key)
    }
}

/// One simulated device: its own storage, clock and connectivity, sharing a remote.
pub struct Device {
    pub store: Arc<LocalStore>,
    pub queue: Arc<SyncQueue>,
    pub clock: Arc<ManualClock>,
    pub connectivity: Arc<ConnectivityMonitor>,
    pub engine: Arc<SyncEngine<MemoryRemote>>,
}

impl Device {
    pub fn new(remote: &Arc<MemoryRemote>, online: bool) -> Self {
        Self::with_config(remote, online, EngineConfig::default())
    }

    pub fn with_config(remote: &Arc<MemoryRemote>, online: bool, config: EngineConfig) -> Self {
        Self::with_persistence(remote, online, config, Arc::new(MemoryPersistence::new()))
    }

    pub fn with_persistence(
        remote: &Arc<MemoryRemote>,
        online: bool,
        config: EngineConfig,
        persistence: Arc<dyn PersistencePort>,
    ) -> Self {
        let clock = Arc::new(ManualClock::new(t0()));
        let store = Arc::new(LocalStore::new(persistence.clone(), clock.clone()));
        let queue = Arc::new(SyncQueue::open(persistence, clock.clone()).unwrap());
        let connectivity = Arc::new(ConnectivityMonitor::new(online));
        let port: Arc<dyn ConnectivityPort> = connectivity.clone();

        let engine = SyncEngine::new(
            "learner-1",
            Arc::clone(&store),
            Arc::clone(&queue),
            Arc::clone(remote),
            port,
        )
        .with_config(config);

        Device {
            store,
            queue,
            clock,
            connectivity,
            engine: Arc::new(engine),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        self.clock.advance(chrono::Duration::seconds(secs));
    }
}

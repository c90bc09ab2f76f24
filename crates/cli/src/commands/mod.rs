// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod export;
pub mod import;
pub mod init;
pub mod pack;
pub mod practice;
pub mod queue;
pub mod remote;
pub mod show;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use px_core::queue::MAX_RETRIES;
use px_core::{
    Clock, CustomPack, FilePersistence, LocalStore, PackId, PersistencePort, SyncQueue,
    SystemClock,
};
use tokio::runtime::Runtime;

use crate::config::{data_dir, find_work_dir, Config, RemoteConfig};
use crate::display;
use crate::error::{Error, Result};
use crate::sync::{
    ConnectivityMonitor, InitReport, RemoteStore, SyncEngine, SyncError, SyncOutcome, SyncResult,
    SyncState, WsRemoteStore,
};

const LOCK_FILE_NAME: &str = "phonix.lock";

/// A local change that may need to reach the account store.
#[derive(Debug, Clone)]
pub enum Change {
    Progress(PackId),
    SavePack(CustomPack),
    DeletePack(PackId),
}

/// Learner data opened for one command.
///
/// Holds an exclusive lock on the `.phonix/` directory until dropped.
pub struct Workspace {
    pub config: Config,
    pub store: Arc<LocalStore>,
    pub queue: Arc<SyncQueue>,
    offline: bool,
    _lock: Option<File>,
}

impl Workspace {
    /// Helper to open learner data from the current context.
    pub fn open(offline: bool) -> Result<Self> {
        let work_dir = find_work_dir()?;
        let config = Config::load(&work_dir)?;
        let lock = acquire_lock(&work_dir.join(LOCK_FILE_NAME))?;
        let persistence = Arc::new(FilePersistence::open(&data_dir(&work_dir))?);
        let mut workspace =
            Workspace::with_persistence(config, persistence, Arc::new(SystemClock), offline)?;
        workspace._lock = Some(lock);
        Ok(workspace)
    }

    /// Builds a workspace over any persistence and clock.
    pub fn with_persistence(
        config: Config,
        persistence: Arc<dyn PersistencePort>,
        clock: Arc<dyn Clock>,
        offline: bool,
    ) -> Result<Self> {
        let max_retries = config
            .remote
            .as_ref()
            .map_or(MAX_RETRIES, |remote| remote.max_retries);
        let store = Arc::new(LocalStore::new(Arc::clone(&persistence), Arc::clone(&clock)));
        let queue = Arc::new(SyncQueue::open(persistence, clock)?.with_max_retries(max_retries));
        Ok(Workspace {
            config,
            store,
            queue,
            offline,
            _lock: None,
        })
    }

    /// True when `--offline` was passed or the config pins the device offline.
    pub fn is_offline(&self) -> bool {
        self.offline || self.config.offline
    }

    /// Push a change to the account store, if one is configured, and print
    /// the resulting sync status. Sync problems never fail the command.
    pub fn publish(&self, change: Change) -> Result<()> {
        let Some(session) = Session::connect(self)? else {
            return Ok(());
        };
        match session.publish(&change) {
            Ok(state) => println!("{}", display::sync_line(&state)),
            Err(e) => eprintln!("warning: sync skipped: {}", e),
        }
        Ok(())
    }
}

fn acquire_lock(lock_path: &Path) -> Result<File> {
    use fs2::FileExt;

    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(lock_path)?;
    file.try_lock_exclusive().map_err(|_| Error::Locked)?;
    Ok(file)
}

fn runtime() -> Result<Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// A sync engine bound to a single-threaded runtime for the life of a command.
pub struct Session<R: RemoteStore + 'static> {
    // Declared first so the engine and its connection drop before the runtime.
    engine: Arc<SyncEngine<R>>,
    runtime: Runtime,
}

impl Session<WsRemoteStore> {
    /// Connects to the configured account store. Returns `None` in local-only mode.
    ///
    /// The device counts as online when it is not pinned offline and the
    /// store answers a ping within the connect timeout.
    pub fn connect(workspace: &Workspace) -> Result<Option<Self>> {
        let Some(remote) = &workspace.config.remote else {
            return Ok(None);
        };
        let runtime = runtime()?;
        let store = Arc::new(WsRemoteStore::new(remote.ws_config()));
        let online = !workspace.is_offline() && runtime.block_on(store.probe());
        tracing::debug!(url = %remote.url, online, "session opened");
        Ok(Some(Session::new(workspace, remote, runtime, store, online)))
    }
}

impl<R: RemoteStore + 'static> Session<R> {
    pub fn new(
        workspace: &Workspace,
        remote: &RemoteConfig,
        runtime: Runtime,
        store: Arc<R>,
        online: bool,
    ) -> Self {
        let connectivity = Arc::new(ConnectivityMonitor::new(online));
        let engine = SyncEngine::new(
            remote.user_id.clone(),
            Arc::clone(&workspace.store),
            Arc::clone(&workspace.queue),
            store,
            connectivity,
        )
        .with_config(remote.engine_config());
        Session {
            engine: Arc::new(engine),
            runtime,
        }
    }

    pub fn state(&self) -> SyncState {
        self.engine.state()
    }

    /// Per-mutation sync. After a successful push, older queued changes are
    /// flushed too.
    pub fn publish(&self, change: &Change) -> SyncResult<SyncState> {
        let engine = Arc::clone(&self.engine);
        self.runtime.block_on(async move {
            let outcome = match change {
                Change::Progress(pack) => engine.sync_progress(pack).await?,
                Change::SavePack(pack) => engine.sync_custom_pack(pack).await?,
                Change::DeletePack(id) => engine.sync_custom_pack_deletion(id).await?,
            };
            if outcome == SyncOutcome::Synced && !engine.queue().is_empty() {
                engine.drain_queue().await?;
            }
            Ok::<_, SyncError>(())
        })?;
        Ok(self.engine.state())
    }

    /// Full reconcile with the account store.
    pub fn initialize(&self) -> SyncResult<InitReport> {
        self.runtime.block_on(self.engine.initialize())
    }
}

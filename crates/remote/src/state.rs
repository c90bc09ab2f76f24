// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Wraps the account store for shared access across connections.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use px_core::{Clock, CustomPack, PackId, ProgressRecord, RemoteProgress, SystemClock};

use crate::db::{AccountStore, Result};

/// File name of the account database inside the data directory.
pub const DB_FILE_NAME: &str = "accounts.db";

/// Shared server state containing the account store.
#[derive(Clone)]
pub struct ServerState {
    inner: Arc<ServerStateInner>,
}

struct ServerStateInner {
    /// The account store (one connection, serialized by the mutex).
    db: Mutex<AccountStore>,
    /// Source of `synced_at` stamps.
    clock: Arc<dyn Clock>,
}

impl ServerState {
    /// Opens the account store in the given directory.
    pub fn new(data_dir: &Path) -> Result<Self> {
        let db = AccountStore::open(&data_dir.join(DB_FILE_NAME))?;
        Ok(Self::with_store(db, Arc::new(SystemClock)))
    }

    pub fn with_store(db: AccountStore, clock: Arc<dyn Clock>) -> Self {
        ServerState {
            inner: Arc::new(ServerStateInner {
                db: Mutex::new(db),
                clock,
            }),
        }
    }

    pub async fn fetch_progress(&self, user_id: &str) -> Result<BTreeMap<PackId, RemoteProgress>> {
        let db = self.inner.db.lock().await;
        db.fetch_progress(user_id)
    }

    /// Stores one pack's progress and returns the assigned `synced_at`.
    pub async fn upsert_progress(
        &self,
        user_id: &str,
        pack: &PackId,
        record: &ProgressRecord,
    ) -> Result<DateTime<Utc>> {
        let synced_at = self.inner.clock.now();
        let db = self.inner.db.lock().await;
        db.upsert_progress(user_id, pack, record, synced_at)?;
        Ok(synced_at)
    }

    pub async fn fetch_custom_packs(&self, user_id: &str) -> Result<Vec<CustomPack>> {
        let db = self.inner.db.lock().await;
        db.fetch_custom_packs(user_id)
    }

    pub async fn upsert_custom_pack(&self, user_id: &str, pack: &CustomPack) -> Result<DateTime<Utc>> {
        let synced_at = self.inner.clock.now();
        let db = self.inner.db.lock().await;
        db.upsert_custom_pack(user_id, pack)?;
        Ok(synced_at)
    }

    /// Deletes one custom pack. A missing pack is not an error.
    pub async fn delete_custom_pack(&self, user_id: &str, pack: &PackId) -> Result<DateTime<Utc>> {
        let synced_at = self.inner.clock.now();
        let db = self.inner.db.lock().await;
        if !db.delete_custom_pack(user_id, pack)? {
            tracing::debug!(user_id, pack = %pack, "delete of unknown custom pack");
        }
        Ok(synced_at)
    }
}

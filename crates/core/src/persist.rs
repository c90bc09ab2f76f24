// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Key-value persistence port.
//!
//! The store and the queue each own independently persisted blobs. Nothing
//! spans two keys, so a blob write only has to be atomic on its own.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::Result;

/// Blob holding every [`ProgressRecord`](crate::ProgressRecord), keyed by pack id.
pub const PROGRESS_KEY: &str = "progress.json";
/// Blob holding the user-authored packs.
pub const CUSTOM_PACKS_KEY: &str = "custom-packs.json";
/// Blob holding pending remote operations, one per line.
pub const QUEUE_KEY: &str = "sync-queue.jsonl";
/// Blob holding operations that exhausted their retries.
pub const DEAD_LETTER_KEY: &str = "dead-letter.jsonl";

/// Durable string storage addressed by key.
pub trait PersistencePort: Send + Sync {
    /// Returns the blob stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the blob stored under `key`.
    fn store(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the blob stored under `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// One file per key inside a directory.
///
/// Writes go to a temporary sibling which is fsynced and renamed over the
/// target, so a crash leaves either the old or the new blob.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    dir: PathBuf,
}

impl FilePersistence {
    /// Opens (creating if needed) a persistence directory.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(FilePersistence {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PersistencePort for FilePersistence {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.dir.join(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<()> {
        let target = self.dir.join(key);
        let tmp = self.dir.join(format!("{key}.tmp"));

        let mut file = File::create(&tmp)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &target)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.dir.join(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory persistence for tests and simulations.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistencePort for MemoryPersistence {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(blobs.get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<()> {
        let mut blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        blobs.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[path = "persist_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local store for pack progress and custom packs.
//!
//! The store is the only writer of the progress and custom-pack blobs. Every
//! read-modify-write holds `write_lock` for its whole duration, and every
//! record is validated before it reaches the persistence port.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::pack::{CustomPack, PackId, ProgressRecord, StarMark, WordStatus};
use crate::persist::{PersistencePort, CUSTOM_PACKS_KEY, PROGRESS_KEY};

/// Serialized form of the whole store, used by export and import.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub progress: BTreeMap<PackId, ProgressRecord>,
    #[serde(default)]
    pub custom_packs: Vec<CustomPack>,
}

/// Durable repository for progress records and custom packs.
pub struct LocalStore {
    persistence: Arc<dyn PersistencePort>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(persistence: Arc<dyn PersistencePort>, clock: Arc<dyn Clock>) -> Self {
        LocalStore {
            persistence,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load_progress(&self) -> Result<BTreeMap<PackId, ProgressRecord>> {
        match self.persistence.load(PROGRESS_KEY)? {
            Some(text) if !text.trim().is_empty() => {
                serde_json::from_str(&text).map_err(|e| Error::CorruptedData {
                    key: PROGRESS_KEY.to_string(),
                    reason: e.to_string(),
                })
            }
            _ => Ok(BTreeMap::new()),
        }
    }

    fn save_progress(&self, progress: &BTreeMap<PackId, ProgressRecord>) -> Result<()> {
        self.persistence
            .store(PROGRESS_KEY, &serde_json::to_string(progress)?)
    }

    fn load_custom_packs(&self) -> Result<Vec<CustomPack>> {
        match self.persistence.load(CUSTOM_PACKS_KEY)? {
            Some(text) if !text.trim().is_empty() => {
                serde_json::from_str(&text).map_err(|e| Error::CorruptedData {
                    key: CUSTOM_PACKS_KEY.to_string(),
                    reason: e.to_string(),
                })
            }
            _ => Ok(Vec::new()),
        }
    }

    fn save_custom_packs(&self, packs: &[CustomPack]) -> Result<()> {
        self.persistence
            .store(CUSTOM_PACKS_KEY, &serde_json::to_string(packs)?)
    }

    // -- progress --

    /// Returns every progress record keyed by pack id.
    pub fn all_progress(&self) -> Result<BTreeMap<PackId, ProgressRecord>> {
        self.load_progress()
    }

    pub fn read_progress(&self, pack: &PackId) -> Result<Option<ProgressRecord>> {
        Ok(self.load_progress()?.remove(pack))
    }

    /// Replaces the record for `pack` after validating it.
    pub fn write_progress(&self, pack: &PackId, record: ProgressRecord) -> Result<()> {
        record.validate(pack)?;
        let _guard = self.lock();
        let mut progress = self.load_progress()?;
        progress.insert(pack.clone(), record);
        self.save_progress(&progress)
    }

    /// Records a review outcome for one word.
    ///
    /// A custom pack is marked completed once every one of its words has a status.
    pub fn set_word_status(
        &self,
        pack: &PackId,
        word: &str,
        status: WordStatus,
    ) -> Result<ProgressRecord> {
        check_word(pack, word)?;
        let custom_words = match pack {
            PackId::Custom(_) => self.custom_pack(pack)?.map(|p| p.words),
            PackId::Builtin(_) => None,
        };

        self.update_record(pack, |record| {
            record.word_status.insert(word.to_string(), status);
            if let Some(words) = &custom_words {
                if record.has_reviewed_all(words) {
                    record.completed = true;
                }
            }
        })
    }

    /// Stars or unstars a word.
    pub fn set_starred(&self, pack: &PackId, word: &str, starred: bool) -> Result<ProgressRecord> {
        check_word(pack, word)?;
        self.update_record(pack, |record| {
            let mark = if starred {
                StarMark::Starred
            } else {
                StarMark::Unstarred
            };
            record.starred_status.insert(word.to_string(), mark);
        })
    }

    /// Marks a practice session on `pack` as finished.
    pub fn mark_completed(&self, pack: &PackId) -> Result<ProgressRecord> {
        let _guard = self.lock();
        let mut progress = self.load_progress()?;
        let record = progress
            .get_mut(pack)
            .ok_or_else(|| Error::NoProgress(pack.to_string()))?;

        record.completed = true;
        record.completion_count = record.completion_count.saturating_add(1);
        record.last_reviewed = Some(self.clock.now());
        let updated = record.clone();

        self.save_progress(&progress)?;
        tracing::debug!(pack = %pack, count = updated.completion_count, "pack completed");
        Ok(updated)
    }

    /// Removes all progress records.
    pub fn clear_progress(&self) -> Result<()> {
        let _guard = self.lock();
        self.persistence.remove(PROGRESS_KEY)
    }

    fn update_record<F>(&self, pack: &PackId, apply: F) -> Result<ProgressRecord>
    where
        F: FnOnce(&mut ProgressRecord),
    {
        let _guard = self.lock();
        let mut progress = self.load_progress()?;
        let record = progress.entry(pack.clone()).or_default();
        apply(record);
        record.last_reviewed = Some(self.clock.now());
        record.validate(pack)?;
        let updated = record.clone();

        self.save_progress(&progress)?;
        Ok(updated)
    }

    // -- custom packs --

    pub fn custom_packs(&self) -> Result<Vec<CustomPack>> {
        self.load_custom_packs()
    }

    pub fn custom_pack(&self, id: &PackId) -> Result<Option<CustomPack>> {
        Ok(self.load_custom_packs()?.into_iter().find(|p| &p.id == id))
    }

    /// Creates a pack under the next free `C<n>` id.
    pub fn create_custom_pack(&self, name: &str, words: Vec<String>) -> Result<CustomPack> {
        let _guard = self.lock();
        let mut packs = self.load_custom_packs()?;
        let progress = self.load_progress()?;

        let highest = packs
            .iter()
            .map(|p| &p.id)
            .chain(progress.keys())
            .filter_map(PackId::custom_ordinal)
            .max()
            .unwrap_or(0);

        let now = self.clock.now();
        let pack = CustomPack {
            id: PackId::custom(highest + 1),
            name: name.trim().to_string(),
            words: normalize_words(words),
            created_at: now,
            updated_at: now,
        };
        pack.validate()?;

        packs.push(pack.clone());
        self.save_custom_packs(&packs)?;
        tracing::debug!(pack = %pack.id, "custom pack created");
        Ok(pack)
    }

    /// Edits a pack's name and/or words.
    ///
    /// `updated_at` always moves forward, even if the clock has not.
    pub fn update_custom_pack(
        &self,
        id: &PackId,
        name: Option<&str>,
        words: Option<Vec<String>>,
    ) -> Result<CustomPack> {
        let _guard = self.lock();
        let mut packs = self.load_custom_packs()?;
        let pack = packs
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| Error::CustomPackNotFound(id.to_string()))?;

        let mut edited = pack.clone();
        if let Some(name) = name {
            edited.name = name.trim().to_string();
        }
        if let Some(words) = words {
            edited.words = normalize_words(words);
        }
        edited.updated_at = self
            .clock
            .now()
            .max(pack.updated_at + Duration::milliseconds(1));
        edited.validate()?;

        *pack = edited.clone();
        self.save_custom_packs(&packs)?;
        Ok(edited)
    }

    /// Deletes a pack. Returns false if it did not exist.
    pub fn delete_custom_pack(&self, id: &PackId) -> Result<bool> {
        let _guard = self.lock();
        let mut packs = self.load_custom_packs()?;
        let before = packs.len();
        packs.retain(|p| &p.id != id);
        if packs.len() == before {
            return Ok(false);
        }
        self.save_custom_packs(&packs)?;
        Ok(true)
    }

    /// Inserts or replaces a pack as-is, keeping list order stable.
    pub fn put_custom_pack(&self, pack: CustomPack) -> Result<()> {
        pack.validate()?;
        let _guard = self.lock();
        let mut packs = self.load_custom_packs()?;
        match packs.iter_mut().find(|p| p.id == pack.id) {
            Some(existing) => *existing = pack,
            None => packs.push(pack),
        }
        self.save_custom_packs(&packs)
    }

    // -- snapshots --

    /// Serializes the whole store.
    pub fn export_all(&self) -> Result<String> {
        let snapshot = Snapshot {
            progress: self.load_progress()?,
            custom_packs: self.load_custom_packs()?,
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Replaces the store with `text`.
    ///
    /// Accepts a full snapshot or a bare map of progress records. Nothing is
    /// written unless every record validates. Returns the number of records.
    pub fn import_all(&self, text: &str) -> Result<usize> {
        let snapshot = parse_snapshot(text)?;

        let _guard = self.lock();
        self.save_progress(&snapshot.progress)?;
        self.save_custom_packs(&snapshot.custom_packs)?;

        tracing::info!(
            progress = snapshot.progress.len(),
            custom_packs = snapshot.custom_packs.len(),
            "imported snapshot"
        );
        Ok(snapshot.progress.len() + snapshot.custom_packs.len())
    }
}

fn check_word(pack: &PackId, word: &str) -> Result<()> {
    if word.trim().is_empty() {
        return Err(Error::InvalidProgress {
            pack: pack.to_string(),
            reason: "word cannot be blank".to_string(),
        });
    }
    Ok(())
}

fn normalize_words(words: Vec<String>) -> Vec<String> {
    words
        .into_iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Parses and validates an exported snapshot.
pub fn parse_snapshot(text: &str) -> Result<Snapshot> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| Error::InvalidSnapshot(e.to_string()))?;
    let Value::Object(mut root) = value else {
        return Err(Error::InvalidSnapshot("expected a JSON object".to_string()));
    };

    let is_full = root.contains_key("progress") || root.contains_key("customPacks");
    let (progress_map, packs_value) = if is_full {
        let progress = match root.remove("progress") {
            Some(Value::Object(map)) => map,
            Some(Value::Null) | None => serde_json::Map::new(),
            Some(_) => {
                return Err(Error::InvalidSnapshot(
                    "progress must be an object".to_string(),
                ))
            }
        };
        (progress, root.remove("customPacks"))
    } else {
        (root, None)
    };

    let mut progress = BTreeMap::new();
    for (key, value) in progress_map {
        let pack: PackId = key.parse()?;
        let record = ProgressRecord::from_value(&pack, value)?;
        progress.insert(pack, record);
    }

    let custom_packs: Vec<CustomPack> = match packs_value {
        Some(Value::Null) | None => Vec::new(),
        Some(value) => {
            serde_json::from_value(value).map_err(|e| Error::InvalidSnapshot(e.to_string()))?
        }
    };
    for pack in &custom_packs {
        pack.validate()?;
    }

    Ok(Snapshot {
        progress,
        custom_packs,
    })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reconcile local and remote copies of pack state.
//!
//! Merge rules:
//! - Pack present on one side only: that side wins
//! - Progress: word-level last-writer-wins on `lastReviewed` (missing = epoch)
//!   - local >= remote: local word/star entries overlay remote's
//!   - remote > local: remote entries win every word both sides hold;
//!     words only the local side has reviewed are kept
//!   - `completionCount` is the max of both, `completed` is the OR of both,
//!     `lastReviewed` is the later of both
//! - Custom packs: the copy with the later `updatedAt` replaces the other
//!   entirely (local wins ties)
//!
//! Merging is deterministic and never fails.

use std::collections::BTreeMap;

use crate::pack::{CustomPack, PackId, ProgressRecord};

/// Trait for types that can fold a remote copy into a local copy.
pub trait Reconcile: Clone {
    /// Produces the reconciled record when both sides have a copy.
    fn reconcile(local: &Self, remote: &Self) -> Self;

    /// Produces the reconciled record when either side may be missing.
    fn resolve(local: Option<&Self>, remote: Option<&Self>) -> Option<Self> {
        match (local, remote) {
            (Some(local), Some(remote)) => Some(Self::reconcile(local, remote)),
            (Some(only), None) | (None, Some(only)) => Some(only.clone()),
            (None, None) => None,
        }
    }
}

impl Reconcile for ProgressRecord {
    fn reconcile(local: &Self, remote: &Self) -> Self {
        let local_at = local.last_reviewed.unwrap_or_default();
        let remote_at = remote.last_reviewed.unwrap_or_default();

        let (newer, older) = if local_at >= remote_at {
            (local, remote)
        } else {
            (remote, local)
        };
        let word_status = overlay(&older.word_status, &newer.word_status);
        let starred_status = overlay(&older.starred_status, &newer.starred_status);

        ProgressRecord {
            word_status,
            starred_status,
            completed: local.completed || remote.completed,
            completion_count: local.completion_count.max(remote.completion_count),
            last_reviewed: local.last_reviewed.max(remote.last_reviewed),
        }
    }
}

/// Copies `base`, then writes every entry of `top` over it.
fn overlay<V: Copy>(base: &BTreeMap<String, V>, top: &BTreeMap<String, V>) -> BTreeMap<String, V> {
    let mut merged = base.clone();
    merged.extend(top.iter().map(|(word, value)| (word.clone(), *value)));
    merged
}

impl Reconcile for CustomPack {
    fn reconcile(local: &Self, remote: &Self) -> Self {
        if remote.updated_at > local.updated_at {
            remote.clone()
        } else {
            local.clone()
        }
    }
}

/// Merges two keyed collections, reconciling entries present on both sides.
pub fn merge_keyed<T: Reconcile>(
    local: &BTreeMap<PackId, T>,
    remote: &BTreeMap<PackId, T>,
) -> BTreeMap<PackId, T> {
    let mut merged = BTreeMap::new();
    for id in local.keys().chain(remote.keys()) {
        if merged.contains_key(id) {
            continue;
        }
        if let Some(record) = T::resolve(local.get(id), remote.get(id)) {
            merged.insert(id.clone(), record);
        }
    }
    merged
}

/// Merges every pack's progress.
pub fn merge_progress(
    local: &BTreeMap<PackId, ProgressRecord>,
    remote: &BTreeMap<PackId, ProgressRecord>,
) -> BTreeMap<PackId, ProgressRecord> {
    merge_keyed(local, remote)
}

/// Merges custom pack lists by id, returning them ordered by id.
pub fn merge_custom_packs(local: &[CustomPack], remote: &[CustomPack]) -> Vec<CustomPack> {
    let by_id = |packs: &[CustomPack]| -> BTreeMap<PackId, CustomPack> {
        packs.iter().map(|p| (p.id.clone(), p.clone())).collect()
    };
    merge_keyed(&by_id(local), &by_id(remote))
        .into_values()
        .collect()
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;

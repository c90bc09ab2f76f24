// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Practice commands: mark, star, complete, reset.

use px_core::{PackId, ProgressRecord, WordStatus};

use super::{Change, Workspace};
use crate::error::Result;

pub fn mark(offline: bool, pack: &PackId, word: &str, status: WordStatus) -> Result<()> {
    let workspace = Workspace::open(offline)?;
    let record = mark_impl(&workspace, pack, word, status)?;

    println!("Marked '{}' as {} in pack {}", word.trim(), status, pack);
    if pack.is_custom() && record.completed {
        println!("Every word in pack {} has been reviewed.", pack);
    }
    workspace.publish(Change::Progress(pack.clone()))
}

pub fn star(offline: bool, pack: &PackId, word: &str, starred: bool) -> Result<()> {
    let workspace = Workspace::open(offline)?;
    star_impl(&workspace, pack, word, starred)?;

    if starred {
        println!("Starred '{}' in pack {}", word.trim(), pack);
    } else {
        println!("Unstarred '{}' in pack {}", word.trim(), pack);
    }
    workspace.publish(Change::Progress(pack.clone()))
}

pub fn complete(offline: bool, pack: &PackId) -> Result<()> {
    let workspace = Workspace::open(offline)?;
    let record = workspace.store.mark_completed(pack)?;

    println!(
        "Completed pack {} ({} time(s))",
        pack, record.completion_count
    );
    workspace.publish(Change::Progress(pack.clone()))
}

/// Clears progress on this device only; custom packs and the queue are kept.
pub fn reset(yes: bool) -> Result<()> {
    if !yes {
        println!("This removes progress for every pack on this device.");
        println!("Re-run with --yes to confirm.");
        return Ok(());
    }
    let workspace = Workspace::open(false)?;
    workspace.store.clear_progress()?;
    println!("Progress cleared.");
    Ok(())
}

/// Custom packs only accept their own words; built-in word lists are not
/// known locally.
fn check_pack_word(workspace: &Workspace, pack: &PackId, word: &str) -> Result<()> {
    if !pack.is_custom() {
        return Ok(());
    }
    let custom = workspace
        .store
        .custom_pack(pack)?
        .ok_or_else(|| px_core::Error::CustomPackNotFound(pack.to_string()))?;
    if !custom.words.iter().any(|w| w == word.trim()) {
        return Err(px_core::Error::InvalidProgress {
            pack: pack.to_string(),
            reason: format!("'{}' is not a word in this pack", word.trim()),
        }
        .into());
    }
    Ok(())
}

pub(crate) fn mark_impl(
    workspace: &Workspace,
    pack: &PackId,
    word: &str,
    status: WordStatus,
) -> Result<ProgressRecord> {
    check_pack_word(workspace, pack, word)?;
    Ok(workspace.store.set_word_status(pack, word.trim(), status)?)
}

pub(crate) fn star_impl(
    workspace: &Workspace,
    pack: &PackId,
    word: &str,
    starred: bool,
) -> Result<ProgressRecord> {
    check_pack_word(workspace, pack, word)?;
    Ok(workspace.store.set_starred(pack, word.trim(), starred)?)
}

#[cfg(test)]
#[path = "practice_tests.rs"]
mod tests;

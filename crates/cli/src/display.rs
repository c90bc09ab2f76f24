// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use px_core::{CustomPack, PackId, ProgressRecord, QueuedOperation, WordStatus};

use crate::sync::{InitReport, SyncState, SyncStatus};

/// Width of the pack id column in progress summaries.
const PACK_COLUMN: usize = 6;

/// Format a timestamp for human output.
pub fn format_time(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// One-line sync outcome printed after a mutation.
pub fn sync_line(state: &SyncState) -> String {
    let pending = state.pending_changes;
    match state.status {
        SyncStatus::Success => "Synced.".to_string(),
        SyncStatus::Syncing => "Syncing...".to_string(),
        SyncStatus::Offline => format!("Offline: {} change(s) waiting to sync.", pending),
        SyncStatus::Error => match &state.error_message {
            Some(message) => format!("Sync problem: {}", message),
            None => "Sync problem.".to_string(),
        },
        SyncStatus::Idle if pending > 0 => format!("{} change(s) waiting to sync.", pending),
        SyncStatus::Idle => "Up to date.".to_string(),
    }
}

/// Words of `record` with the given status, in key order.
fn words_with(record: &ProgressRecord, status: WordStatus) -> Vec<&str> {
    record
        .word_status
        .iter()
        .filter(|(_, s)| **s == status)
        .map(|(w, _)| w.as_str())
        .collect()
}

/// Summary line for one pack.
///
/// Format: `{pack:<6} {mastered} mastered, {tricky} tricky[, {starred} starred][  completed xN]`
pub fn format_progress_line(pack: &PackId, record: &ProgressRecord) -> String {
    let stats = record.stats();
    let mut line = format!(
        "{:<width$} {} mastered, {} tricky",
        pack.to_string(),
        stats.mastered,
        stats.tricky,
        width = PACK_COLUMN
    );
    if stats.starred > 0 {
        line.push_str(&format!(", {} starred", stats.starred));
    }
    if record.completed {
        line.push_str(&format!("  completed x{}", record.completion_count));
    }
    line
}

/// Detailed view of one pack.
///
/// ```text
/// Pack C1 (Digraphs)
/// Completed: 2 time(s)
/// Last reviewed: 2024-09-01 08:00
///
///   Mastered: chat, ship
///   Tricky: thin
///   Starred: thin
/// ```
pub fn format_progress(pack: &PackId, name: Option<&str>, record: &ProgressRecord) -> Vec<String> {
    let mut lines = Vec::new();
    match name {
        Some(name) => lines.push(format!("Pack {} ({})", pack, name)),
        None => lines.push(format!("Pack {}", pack)),
    }
    if record.completed {
        lines.push(format!("Completed: {} time(s)", record.completion_count));
    } else {
        lines.push("Completed: no".to_string());
    }
    match &record.last_reviewed {
        Some(at) => lines.push(format!("Last reviewed: {}", format_time(at))),
        None => lines.push("Last reviewed: never".to_string()),
    }

    let mastered = words_with(record, WordStatus::Mastered);
    let tricky = words_with(record, WordStatus::Tricky);
    let starred: Vec<&str> = record.starred_words().collect();
    if !mastered.is_empty() || !tricky.is_empty() || !starred.is_empty() {
        lines.push(String::new());
    }
    for (label, words) in [
        ("Mastered", mastered),
        ("Tricky", tricky),
        ("Starred", starred),
    ] {
        if !words.is_empty() {
            lines.push(format!("  {}: {}", label, words.join(", ")));
        }
    }
    lines
}

/// Format: `{id}  {name} ({n} words): {w1}, {w2}, ...`
pub fn format_custom_pack(pack: &CustomPack) -> String {
    format!(
        "{}  {} ({} words): {}",
        pack.id,
        pack.name,
        pack.words.len(),
        pack.words.join(", ")
    )
}

/// Format: `{id}  {kind} {action} {pack}  retries {n}  queued {time}`
pub fn format_queued_op(op: &QueuedOperation) -> String {
    format!(
        "{}  {} {} {}  retries {}  queued {}",
        op.id,
        op.op.kind(),
        op.op.action(),
        op.op.pack_id(),
        op.retry_count,
        format_time(&op.enqueued_at)
    )
}

/// Summary of a full reconcile.
pub fn format_init_report(report: &InitReport) -> String {
    let mut line = format!(
        "Pulled {}, merged {}, pushed {}",
        report.pulled, report.merged, report.pushed
    );
    if report.queued > 0 {
        line.push_str(&format!(", queued {}", report.queued));
    }
    if report.drain.replayed > 0 {
        line.push_str(&format!(", replayed {} queued change(s)", report.drain.replayed));
    }
    line
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;

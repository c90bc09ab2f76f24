// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue inspection: pending operations and those set aside after
//! exhausting their retries.

use px_core::QueuedOperation;
use serde::Serialize;

use super::Workspace;
use crate::cli::OutputFormat;
use crate::display::format_queued_op;
use crate::error::Result;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueueListing {
    pending: Vec<QueuedOperation>,
    set_aside: Vec<QueuedOperation>,
}

pub fn list(format: OutputFormat) -> Result<()> {
    let workspace = Workspace::open(false)?;
    println!("{}", list_impl(&workspace, format)?);
    Ok(())
}

pub(crate) fn list_impl(workspace: &Workspace, format: OutputFormat) -> Result<String> {
    let listing = QueueListing {
        pending: workspace.queue.snapshot(),
        set_aside: workspace.queue.dead_letters()?,
    };
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&listing)?);
    }

    let mut lines = Vec::new();
    if listing.pending.is_empty() {
        lines.push("Nothing waiting to sync.".to_string());
    } else {
        lines.push(format!("Pending ({}):", listing.pending.len()));
        lines.extend(listing.pending.iter().map(|op| format!("  {}", format_queued_op(op))));
    }
    if !listing.set_aside.is_empty() {
        lines.push(format!("Set aside ({}):", listing.set_aside.len()));
        lines.extend(listing.set_aside.iter().map(|op| format!("  {}", format_queued_op(op))));
    }
    Ok(lines.join("\n"))
}

pub fn requeue() -> Result<()> {
    let workspace = Workspace::open(false)?;
    let moved = workspace.queue.requeue_dead_letters()?;
    println!("Moved {} set-aside change(s) back to the queue.", moved);
    if moved > 0 && workspace.config.is_remote_mode() {
        println!("Run 'phonix sync' to retry them now.");
    }
    Ok(())
}

pub fn clear_dropped() -> Result<()> {
    let workspace = Workspace::open(false)?;
    let cleared = workspace.queue.clear_dead_letters()?;
    println!("Discarded {} set-aside change(s).", cleared);
    Ok(())
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;

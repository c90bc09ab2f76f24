// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Account store commands.
//!
//! `sync` runs the full reconcile; `status` reports what is still waiting.

use serde::Serialize;

use super::{Session, Workspace};
use crate::cli::OutputFormat;
use crate::display::{format_init_report, sync_line};
use crate::error::{Error, Result};
use crate::sync::{InitReport, RemoteStore, SyncState};

/// Pull, merge and push everything, then drain the queue.
pub fn sync(offline: bool) -> Result<()> {
    let workspace = Workspace::open(offline)?;
    let session = Session::connect(&workspace)?.ok_or(Error::NoRemote)?;
    if let Some(remote) = &workspace.config.remote {
        println!("Syncing with {}...", remote.url);
    }

    let report = sync_impl(&session)?;
    println!("{}", format_init_report(&report));
    println!("{}", sync_line(&session.state()));
    Ok(())
}

pub(crate) fn sync_impl<R: RemoteStore + 'static>(session: &Session<R>) -> Result<InitReport> {
    Ok(session.initialize()?)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusReport {
    pub mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub state: SyncState,
    pub set_aside: usize,
}

/// Show sync status.
pub fn status(offline: bool, format: OutputFormat) -> Result<()> {
    let workspace = Workspace::open(offline)?;
    let state = match Session::connect(&workspace)? {
        Some(session) => session.state(),
        None => SyncState {
            pending_changes: workspace.queue.len(),
            ..SyncState::default()
        },
    };
    let report = status_report(&workspace, state)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => println!("{}", format_status(&report).join("\n")),
    }
    Ok(())
}

pub(crate) fn status_report(workspace: &Workspace, state: SyncState) -> Result<StatusReport> {
    let remote = workspace.config.remote.as_ref();
    Ok(StatusReport {
        mode: if remote.is_some() { "remote" } else { "local" },
        remote: remote.map(|r| r.url.clone()),
        user_id: remote.map(|r| r.user_id.clone()),
        state,
        set_aside: workspace.queue.dead_letters()?.len(),
    })
}

pub(crate) fn format_status(report: &StatusReport) -> Vec<String> {
    let mut lines = Vec::new();
    match (&report.remote, &report.user_id) {
        (Some(url), Some(user)) => lines.push(format!("Remote: {} (learner {})", url, user)),
        _ => {
            lines.push("Mode: local only".to_string());
            lines.push(String::new());
            lines.push(
                "To enable sync, run 'phonix init --remote <url> --user <id>' in a new directory"
                    .to_string(),
            );
            lines.push("or add a [remote] section to .phonix/config.toml:".to_string());
            lines.push(String::new());
            lines.push("  [remote]".to_string());
            lines.push("  url = \"ws://your-server:7891\"".to_string());
            lines.push("  user_id = \"<learner id>\"".to_string());
            return lines;
        }
    }
    lines.push(format!("Status: {}", report.state.status));
    lines.push(format!("Pending changes: {}", report.state.pending_changes));
    if report.set_aside > 0 {
        lines.push(format!(
            "Set aside: {} (run 'phonix queue requeue' to retry)",
            report.set_aside
        ));
    }
    lines
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;

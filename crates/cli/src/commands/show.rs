// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use px_core::PackId;

use super::Workspace;
use crate::cli::OutputFormat;
use crate::display::{format_progress, format_progress_line};
use crate::error::Result;

pub fn run(pack: Option<&PackId>, format: OutputFormat) -> Result<()> {
    let workspace = Workspace::open(false)?;
    let output = run_impl(&workspace, pack, format)?;
    println!("{}", output);
    Ok(())
}

/// Internal implementation that returns the rendered output for testing.
pub(crate) fn run_impl(
    workspace: &Workspace,
    pack: Option<&PackId>,
    format: OutputFormat,
) -> Result<String> {
    match pack {
        Some(pack) => render_pack(workspace, pack, format),
        None => render_all(workspace, format),
    }
}

fn render_pack(workspace: &Workspace, pack: &PackId, format: OutputFormat) -> Result<String> {
    let record = workspace.store.read_progress(pack)?;
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&record)?),
        OutputFormat::Text => {
            let Some(record) = record else {
                return Ok(format!("No progress for pack {}", pack));
            };
            let name = match pack {
                PackId::Custom(_) => workspace.store.custom_pack(pack)?.map(|p| p.name),
                PackId::Builtin(_) => None,
            };
            Ok(format_progress(pack, name.as_deref(), &record).join("\n"))
        }
    }
}

fn render_all(workspace: &Workspace, format: OutputFormat) -> Result<String> {
    let progress = workspace.store.all_progress()?;
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&progress)?),
        OutputFormat::Text if progress.is_empty() => Ok("No progress yet.".to_string()),
        OutputFormat::Text => Ok(progress
            .iter()
            .map(|(pack, record)| format_progress_line(pack, record))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;

use super::Workspace;
use crate::error::{Error, Result};

pub fn run(filepath: &str) -> Result<()> {
    if filepath.trim().is_empty() {
        return Err(Error::ExportPathEmpty);
    }

    let workspace = Workspace::open(false)?;
    let count = run_impl(&workspace, filepath)?;
    println!("Exported {} records to {}", count, filepath);
    Ok(())
}

/// Internal implementation that accepts a workspace for testing.
/// Returns the number of progress records and custom packs written.
pub(crate) fn run_impl(workspace: &Workspace, filepath: &str) -> Result<usize> {
    let snapshot = workspace.store.export_all()?;
    fs::write(filepath, snapshot)?;
    let count = workspace.store.all_progress()?.len() + workspace.store.custom_packs()?.len();
    Ok(count)
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;

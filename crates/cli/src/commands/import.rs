// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;

use super::Workspace;
use crate::error::Result;

/// Replaces local progress and custom packs with the file's content.
///
/// Nothing is written unless every record in the file is valid. The import
/// is not pushed; the next `phonix sync` reconciles it with the account store.
pub fn run(filepath: &str) -> Result<()> {
    let workspace = Workspace::open(false)?;
    let count = run_impl(&workspace, filepath)?;

    println!("Imported {} records from {}", count, filepath);
    if workspace.config.is_remote_mode() {
        println!("Run 'phonix sync' to reconcile with the account store.");
    }
    Ok(())
}

/// Internal implementation that accepts a workspace for testing.
pub(crate) fn run_impl(workspace: &Workspace, filepath: &str) -> Result<usize> {
    let text = fs::read_to_string(filepath)?;
    Ok(workspace.store.import_all(&text)?)
}

#[cfg(test)]
#[path = "import_tests.rs"]
mod tests;

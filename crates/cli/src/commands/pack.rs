// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Custom pack commands.

use px_core::{CustomPack, PackId};

use super::{Change, Workspace};
use crate::cli::OutputFormat;
use crate::display::format_custom_pack;
use crate::error::{Error, Result};

pub fn new(offline: bool, name: &str, words: Vec<String>) -> Result<()> {
    let workspace = Workspace::open(offline)?;
    let pack = new_impl(&workspace, name, words)?;

    println!(
        "Created pack {} '{}' ({} words)",
        pack.id,
        pack.name,
        pack.words.len()
    );
    workspace.publish(Change::SavePack(pack))
}

pub fn edit(
    offline: bool,
    id: &PackId,
    name: Option<&str>,
    words: Option<Vec<String>>,
) -> Result<()> {
    let workspace = Workspace::open(offline)?;
    let pack = edit_impl(&workspace, id, name, words)?;

    println!("Updated pack {}", format_custom_pack(&pack));
    workspace.publish(Change::SavePack(pack))
}

pub fn delete(offline: bool, id: &PackId) -> Result<()> {
    let workspace = Workspace::open(offline)?;
    delete_impl(&workspace, id)?;

    println!("Deleted pack {}", id);
    workspace.publish(Change::DeletePack(id.clone()))
}

pub fn list(format: OutputFormat) -> Result<()> {
    let workspace = Workspace::open(false)?;
    println!("{}", list_impl(&workspace, format)?);
    Ok(())
}

pub(crate) fn new_impl(workspace: &Workspace, name: &str, words: Vec<String>) -> Result<CustomPack> {
    if name.trim().is_empty() {
        return Err(Error::FieldEmpty { field: "Pack name" });
    }
    Ok(workspace.store.create_custom_pack(name, words)?)
}

pub(crate) fn edit_impl(
    workspace: &Workspace,
    id: &PackId,
    name: Option<&str>,
    words: Option<Vec<String>>,
) -> Result<CustomPack> {
    if name.is_none() && words.is_none() {
        return Err(Error::NothingToEdit);
    }
    Ok(workspace.store.update_custom_pack(id, name, words)?)
}

pub(crate) fn delete_impl(workspace: &Workspace, id: &PackId) -> Result<()> {
    if !workspace.store.delete_custom_pack(id)? {
        return Err(px_core::Error::CustomPackNotFound(id.to_string()).into());
    }
    Ok(())
}

pub(crate) fn list_impl(workspace: &Workspace, format: OutputFormat) -> Result<String> {
    let packs = workspace.store.custom_packs()?;
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&packs)?),
        OutputFormat::Text if packs.is_empty() => Ok("No custom packs.".to_string()),
        OutputFormat::Text => Ok(packs
            .iter()
            .map(format_custom_pack)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

#[cfg(test)]
#[path = "pack_tests.rs"]
mod tests;

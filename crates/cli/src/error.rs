// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::SyncError;

/// All possible errors that can occur in the pxrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'phonix init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("{0}")]
    Store(#[from] px_core::Error),

    #[error("sync failed: {0}")]
    Sync(#[from] SyncError),

    #[error("no remote configured\n  hint: run 'phonix init --remote <url> --user <id>' to enable sync")]
    NoRemote,

    #[error("invalid remote URL '{0}'\n  hint: use ws://host:port or wss://host:port")]
    InvalidRemoteUrl(String),

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error("nothing to edit\n  hint: pass --name and/or --words")]
    NothingToEdit,

    #[error("data directory is in use by another phonix process")]
    Locked,

    #[error("export path cannot be empty")]
    ExportPathEmpty,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for pxrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

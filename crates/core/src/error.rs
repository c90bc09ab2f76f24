// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for px-core operations.

use thiserror::Error;

/// All possible errors that can occur in px-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid progress for pack {pack}: {reason}")]
    InvalidProgress { pack: String, reason: String },

    #[error("invalid custom pack {id}: {reason}")]
    InvalidCustomPack { id: String, reason: String },

    #[error("invalid pack id: '{0}'\n  hint: use a number for built-in packs or C<n> for custom packs")]
    InvalidPackId(String),

    #[error("invalid word status: '{0}'\n  hint: valid statuses are: tricky, mastered")]
    InvalidWordStatus(String),

    #[error("no progress recorded for pack {0}\n  hint: review at least one word before completing a pack")]
    NoProgress(String),

    #[error("custom pack not found: {0}")]
    CustomPackNotFound(String),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data in {key}: {reason}")]
    CorruptedData { key: String, reason: String },
}

impl Error {
    /// Returns true for errors caused by a malformed record rather than storage.
    ///
    /// Validation failures are never queued for remote replay.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidProgress { .. }
                | Error::InvalidCustomPack { .. }
                | Error::InvalidPackId(_)
                | Error::InvalidWordStatus(_)
                | Error::InvalidSnapshot(_)
        )
    }
}

/// A specialized Result type for px-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Identifiers for queued operations.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Prefix for queued operation ids.
pub const QUEUE_ID_PREFIX: &str = "q";

/// Generate an operation ID from its subject and enqueue time.
/// Format: {prefix}-{hash} where hash is first 8 hex chars of SHA256(subject + timestamp + seq)
pub fn generate_id(prefix: &str, subject: &str, at: &DateTime<Utc>, seq: u64) -> String {
    let input = format!("{}{}{}", subject, at.to_rfc3339(), seq);
    let hash = Sha256::digest(input.as_bytes());
    format!("{}-{}", prefix, hex::encode(&hash[..4]))
}

/// Generate a unique ID, appending an incrementing suffix on collision.
pub fn generate_unique_id<F>(
    prefix: &str,
    subject: &str,
    at: &DateTime<Utc>,
    seq: u64,
    exists: F,
) -> String
where
    F: Fn(&str) -> bool,
{
    let base_id = generate_id(prefix, subject, at, seq);
    if !exists(&base_id) {
        return base_id;
    }

    let mut suffix = 2;
    loop {
        let id = format!("{}-{}", base_id, suffix);
        if !exists(&id) {
            return id;
        }
        suffix += 1;
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL (JSON Lines) encoding for persisted operation lists.
//!
//! Each record is a single JSON line. Blank lines are skipped on read so a
//! hand-edited or partially rewritten blob still loads.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

/// Encodes records as JSON lines, each terminated by a newline.
pub fn encode<T: Serialize>(records: &[T]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Decodes all records from JSON lines.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    let mut records = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(line)?);
    }
    Ok(records)
}

#[cfg(test)]
#[path = "jsonl_tests.rs"]
mod tests;

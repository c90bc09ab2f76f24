// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed account store.
//!
//! One row per (learner, pack) in `pack_progress` and one row per
//! (learner, custom pack) in `custom_packs`. Word maps and word lists are
//! stored as JSON text.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use thiserror::Error;

use px_core::{CustomPack, PackId, ProgressRecord, RemoteProgress};

/// SQL schema for the account store.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS pack_progress (
    user_id TEXT NOT NULL,
    pack_id TEXT NOT NULL,
    words TEXT NOT NULL,
    starred TEXT NOT NULL DEFAULT '{}',
    completed INTEGER NOT NULL DEFAULT 0,
    completion_count INTEGER NOT NULL DEFAULT 0,
    last_reviewed TEXT,
    synced_at TEXT NOT NULL,
    PRIMARY KEY (user_id, pack_id)
);

CREATE TABLE IF NOT EXISTS custom_packs (
    user_id TEXT NOT NULL,
    local_id TEXT NOT NULL,
    name TEXT NOT NULL,
    words TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (user_id, local_id)
);

CREATE INDEX IF NOT EXISTS idx_custom_packs_updated ON custom_packs(user_id, updated_at);
"#;

/// Errors raised by the account store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("{0}")]
    Invalid(#[from] px_core::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("user id cannot be empty")]
    EmptyUser,

    #[error("corrupted row: {0}")]
    CorruptedData(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            StoreError::CorruptedData(format!("invalid timestamp '{value}' in column '{column}'"))
        })
}

fn parse_pack_id(value: &str) -> Result<PackId> {
    value
        .parse()
        .map_err(|_| StoreError::CorruptedData(format!("invalid pack id '{value}'")))
}

fn check_user(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(StoreError::EmptyUser);
    }
    Ok(())
}

/// Raw `pack_progress` row before JSON decoding.
struct ProgressRow {
    pack_id: String,
    words: String,
    starred: String,
    completed: bool,
    completion_count: u32,
    last_reviewed: Option<String>,
    synced_at: String,
}

impl ProgressRow {
    fn decode(self) -> Result<(PackId, RemoteProgress)> {
        let pack = parse_pack_id(&self.pack_id)?;
        let last_reviewed = self
            .last_reviewed
            .as_deref()
            .map(|s| parse_timestamp(s, "last_reviewed"))
            .transpose()?;
        let record = ProgressRecord {
            word_status: serde_json::from_str(&self.words)?,
            starred_status: serde_json::from_str(&self.starred)?,
            completed: self.completed,
            completion_count: self.completion_count,
            last_reviewed,
        };
        let synced_at = Some(parse_timestamp(&self.synced_at, "synced_at")?);
        Ok((pack, RemoteProgress { record, synced_at }))
    }
}

/// Raw `custom_packs` row before JSON decoding.
struct PackRow {
    local_id: String,
    name: String,
    words: String,
    created_at: String,
    updated_at: String,
}

impl PackRow {
    fn decode(self) -> Result<CustomPack> {
        Ok(CustomPack {
            id: parse_pack_id(&self.local_id)?,
            name: self.name,
            words: serde_json::from_str(&self.words)?,
            created_at: parse_timestamp(&self.created_at, "created_at")?,
            updated_at: parse_timestamp(&self.updated_at, "updated_at")?,
        })
    }
}

/// SQLite connection with account store operations.
pub struct AccountStore {
    conn: Connection,
}

impl AccountStore {
    /// Open the store at `path`, creating the schema if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Self::with_connection(conn)
    }

    /// Open a throwaway store (for tests).
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(AccountStore { conn })
    }

    /// Every progress row of a learner, keyed by pack.
    pub fn fetch_progress(&self, user_id: &str) -> Result<BTreeMap<PackId, RemoteProgress>> {
        check_user(user_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT pack_id, words, starred, completed, completion_count, last_reviewed, synced_at
             FROM pack_progress WHERE user_id = ?1",
        )?;
        let rows = stmt
            .query_map([user_id], |row| {
                Ok(ProgressRow {
                    pack_id: row.get(0)?,
                    words: row.get(1)?,
                    starred: row.get(2)?,
                    completed: row.get(3)?,
                    completion_count: row.get(4)?,
                    last_reviewed: row.get(5)?,
                    synced_at: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(ProgressRow::decode).collect()
    }

    /// Insert or replace one pack's progress; `synced_at` is assigned here.
    pub fn upsert_progress(
        &self,
        user_id: &str,
        pack: &PackId,
        record: &ProgressRecord,
        synced_at: DateTime<Utc>,
    ) -> Result<()> {
        check_user(user_id)?;
        record.validate(pack)?;
        self.conn.execute(
            "INSERT INTO pack_progress
                 (user_id, pack_id, words, starred, completed, completion_count, last_reviewed, synced_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(user_id, pack_id) DO UPDATE SET
                 words = excluded.words,
                 starred = excluded.starred,
                 completed = excluded.completed,
                 completion_count = excluded.completion_count,
                 last_reviewed = excluded.last_reviewed,
                 synced_at = excluded.synced_at",
            params![
                user_id,
                pack.to_string(),
                serde_json::to_string(&record.word_status)?,
                serde_json::to_string(&record.starred_status)?,
                record.completed,
                record.completion_count,
                record.last_reviewed.map(|t| t.to_rfc3339()),
                synced_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Every custom pack of a learner, oldest first.
    pub fn fetch_custom_packs(&self, user_id: &str) -> Result<Vec<CustomPack>> {
        check_user(user_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT local_id, name, words, created_at, updated_at
             FROM custom_packs WHERE user_id = ?1 ORDER BY created_at, local_id",
        )?;
        let rows = stmt
            .query_map([user_id], |row| {
                Ok(PackRow {
                    local_id: row.get(0)?,
                    name: row.get(1)?,
                    words: row.get(2)?,
                    created_at: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(PackRow::decode).collect()
    }

    /// Insert or replace one custom pack.
    pub fn upsert_custom_pack(&self, user_id: &str, pack: &CustomPack) -> Result<()> {
        check_user(user_id)?;
        pack.validate()?;
        self.conn.execute(
            "INSERT INTO custom_packs (user_id, local_id, name, words, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id, local_id) DO UPDATE SET
                 name = excluded.name,
                 words = excluded.words,
                 created_at = excluded.created_at,
                 updated_at = excluded.updated_at",
            params![
                user_id,
                pack.id.to_string(),
                pack.name,
                serde_json::to_string(&pack.words)?,
                pack.created_at.to_rfc3339(),
                pack.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Delete one custom pack. Returns false if it did not exist.
    pub fn delete_custom_pack(&self, user_id: &str, pack: &PackId) -> Result<bool> {
        check_user(user_id)?;
        let deleted = self.conn.execute(
            "DELETE FROM custom_packs WHERE user_id = ?1 AND local_id = ?2",
            params![user_id, pack.to_string()],
        )?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Word pack progress model.
//!
//! A [`ProgressRecord`] tracks per-word review state for one pack. Built-in
//! packs are keyed by number, user-authored [`CustomPack`]s by a `C<n>` string.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Identifier of a word pack.
///
/// Always serialized as a string so it can key JSON maps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PackId {
    /// Built-in pack shipped with the word-pack content.
    Builtin(u32),
    /// User-authored pack (`C1`, `C2`, ...).
    Custom(String),
}

impl PackId {
    /// Builds the id of the `n`th custom pack.
    pub fn custom(n: u32) -> Self {
        PackId::Custom(format!("C{n}"))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, PackId::Custom(_))
    }

    /// Returns `n` for custom ids of the form `C<n>`.
    pub fn custom_ordinal(&self) -> Option<u32> {
        match self {
            PackId::Custom(s) => s.strip_prefix('C').and_then(|n| n.parse().ok()),
            PackId::Builtin(_) => None,
        }
    }
}

impl fmt::Display for PackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackId::Builtin(n) => write!(f, "{n}"),
            PackId::Custom(s) => f.write_str(s),
        }
    }
}

impl FromStr for PackId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(Error::InvalidPackId(s.to_string()));
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            // "07" would display as "7" and collide with it
            if s.len() > 1 && s.starts_with('0') {
                return Err(Error::InvalidPackId(s.to_string()));
            }
            return s
                .parse::<u32>()
                .map(PackId::Builtin)
                .map_err(|_| Error::InvalidPackId(s.to_string()));
        }
        Ok(PackId::Custom(s.to_string()))
    }
}

impl From<u32> for PackId {
    fn from(n: u32) -> Self {
        PackId::Builtin(n)
    }
}

impl Serialize for PackId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PackId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PackIdVisitor;

        impl Visitor<'_> for PackIdVisitor {
            type Value = PackId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a pack number or a custom pack id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<PackId, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<PackId, E> {
                u32::try_from(v)
                    .map(PackId::Builtin)
                    .map_err(|_| E::custom(format!("pack number out of range: {v}")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<PackId, E> {
                u32::try_from(v)
                    .map(PackId::Builtin)
                    .map_err(|_| E::custom(format!("pack number out of range: {v}")))
            }
        }

        deserializer.deserialize_any(PackIdVisitor)
    }
}

/// Review outcome for a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordStatus {
    Tricky,
    Mastered,
}

impl fmt::Display for WordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordStatus::Tricky => f.write_str("tricky"),
            WordStatus::Mastered => f.write_str("mastered"),
        }
    }
}

impl FromStr for WordStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tricky" => Ok(WordStatus::Tricky),
            "mastered" => Ok(WordStatus::Mastered),
            _ => Err(Error::InvalidWordStatus(s.to_string())),
        }
    }
}

/// Reviewer flag on a word, independent of its [`WordStatus`].
///
/// Unstarring keeps the entry as `Unstarred` so the later side of a merge
/// can clear the other side's star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StarMark {
    Starred,
    Unstarred,
}

/// Per-pack progress.
///
/// Key presence in `word_status` means the word has been reviewed at least once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(rename = "words", alias = "wordStatus")]
    pub word_status: BTreeMap<String, WordStatus>,
    #[serde(rename = "starred", alias = "starredStatus", default)]
    pub starred_status: BTreeMap<String, StarMark>,
    pub completed: bool,
    #[serde(default)]
    pub completion_count: u32,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
}

/// Word counts for a single pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProgressStats {
    pub mastered: usize,
    pub tricky: usize,
    pub starred: usize,
}

impl ProgressRecord {
    /// Parses a record from loosely-typed JSON, reporting structural problems
    /// (missing word map, non-boolean `completed`, bad timestamp) against `pack`.
    pub fn from_value(pack: &PackId, value: serde_json::Value) -> Result<Self> {
        let record: ProgressRecord =
            serde_json::from_value(value).map_err(|e| Error::InvalidProgress {
                pack: pack.to_string(),
                reason: e.to_string(),
            })?;
        record.validate(pack)?;
        Ok(record)
    }

    /// Checks the record invariants.
    pub fn validate(&self, pack: &PackId) -> Result<()> {
        let blank = self
            .word_status
            .keys()
            .chain(self.starred_status.keys())
            .any(|w| w.trim().is_empty());
        if blank {
            return Err(Error::InvalidProgress {
                pack: pack.to_string(),
                reason: "word keys cannot be blank".to_string(),
            });
        }

        let touched = !self.word_status.is_empty() || !self.starred_status.is_empty();
        if touched && self.last_reviewed.is_none() {
            return Err(Error::InvalidProgress {
                pack: pack.to_string(),
                reason: "lastReviewed is required once a word has been reviewed".to_string(),
            });
        }

        Ok(())
    }

    /// Returns true when every word in `words` has a status.
    pub fn has_reviewed_all(&self, words: &[String]) -> bool {
        !words.is_empty() && words.iter().all(|w| self.word_status.contains_key(w))
    }

    pub fn is_starred(&self, word: &str) -> bool {
        self.starred_status.get(word) == Some(&StarMark::Starred)
    }

    /// Words currently starred, in key order.
    pub fn starred_words(&self) -> impl Iterator<Item = &str> {
        self.starred_status
            .iter()
            .filter(|(_, mark)| **mark == StarMark::Starred)
            .map(|(word, _)| word.as_str())
    }

    pub fn stats(&self) -> ProgressStats {
        let mastered = self
            .word_status
            .values()
            .filter(|s| **s == WordStatus::Mastered)
            .count();
        ProgressStats {
            mastered,
            tricky: self.word_status.len() - mastered,
            starred: self.starred_words().count(),
        }
    }
}

/// A user-authored word list.
///
/// The whole record is the unit of conflict resolution: `updated_at` advances
/// on every edit and decides which copy wins a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPack {
    pub id: PackId,
    pub name: String,
    pub words: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomPack {
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidCustomPack {
            id: self.id.to_string(),
            reason: reason.to_string(),
        };

        if !self.id.is_custom() {
            return Err(invalid("custom packs need a non-numeric id"));
        }
        if self.name.trim().is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if self.words.is_empty() {
            return Err(invalid("word list cannot be empty"));
        }
        if self.words.iter().any(|w| w.trim().is_empty()) {
            return Err(invalid("words cannot be blank"));
        }
        if self.updated_at < self.created_at {
            return Err(invalid("updatedAt is earlier than createdAt"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "pack_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    pack_id = { Error::InvalidPackId("x y".into()), "x y" },
    word_status = { Error::InvalidWordStatus("great".into()), "tricky, mastered" },
    no_progress = { Error::NoProgress("7".into()), "pack 7" },
    custom_missing = { Error::CustomPackNotFound("C4".into()), "C4" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_invalid_progress_display() {
    let err = Error::InvalidProgress {
        pack: "3".into(),
        reason: "missing field `words`".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("pack 3"));
    assert!(msg.contains("words"));
}

#[parameterized(
    progress = { Error::InvalidProgress { pack: "1".into(), reason: "bad".into() }, true },
    custom = { Error::InvalidCustomPack { id: "C1".into(), reason: "bad".into() }, true },
    snapshot = { Error::InvalidSnapshot("bad".into()), true },
    no_progress = { Error::NoProgress("1".into()), false },
    corrupted = { Error::CorruptedData { key: "k".into(), reason: "r".into() }, false },
)]
fn error_is_validation(err: Error, expected: bool) {
    assert_eq!(err.is_validation(), expected);
}

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}

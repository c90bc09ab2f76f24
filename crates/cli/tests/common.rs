// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Nothing listens here, so every connection attempt is refused at once.
pub const UNREACHABLE_REMOTE: &str = "ws://127.0.0.1:9";

pub fn phonix() -> Command {
    let mut cmd = cargo_bin_cmd!("phonix");
    cmd.env_remove("PHONIX_LOG");
    cmd
}

/// Helper to create an initialized temp directory (local-only mode)
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    phonix()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to create a temp directory configured for an account store that
/// cannot be reached
pub fn init_temp_remote() -> TempDir {
    let temp = TempDir::new().unwrap();
    phonix()
        .args(["init", "--remote", UNREACHABLE_REMOTE, "--user", "kid-1"])
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Run phonix in `temp` and return stdout, asserting success.
pub fn run_ok(temp: &TempDir, args: &[&str]) -> String {
    let output = phonix()
        .args(args)
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "phonix {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

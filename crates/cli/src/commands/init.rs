// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use crate::config::{init_work_dir, Config, RemoteConfig};
use crate::error::Result;

pub fn run(path: Option<String>, remote: Option<String>, user: Option<String>) -> Result<()> {
    let target_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };
    let config = build_config(remote.as_deref(), user.as_deref())?;
    let work_dir = run_impl(&target_path, &config)?;

    println!("Initialized phonix at {}", work_dir.display());
    match &config.remote {
        Some(remote) => {
            println!("Remote: {} (learner {})", remote.url, remote.user_id);
            println!();
            println!("Run 'phonix sync' to pull existing progress.");
        }
        None => println!("Mode: local only"),
    }
    Ok(())
}

/// Builds the initial config. A remote needs both a URL and a learner id;
/// clap enforces that they come together.
pub(crate) fn build_config(remote: Option<&str>, user: Option<&str>) -> Result<Config> {
    let remote = match (remote, user) {
        (Some(url), Some(user)) => Some(RemoteConfig::new(url, user)?),
        _ => None,
    };
    Ok(Config {
        offline: false,
        remote,
    })
}

/// Internal implementation that accepts the target directory for testing.
pub(crate) fn run_impl(target_path: &Path, config: &Config) -> Result<PathBuf> {
    let work_dir = init_work_dir(target_path, config)?;
    tracing::info!(path = %work_dir.display(), remote = config.is_remote_mode(), "initialized");
    Ok(work_dir)
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;

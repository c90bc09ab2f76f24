// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Learner configuration management.
//!
//! Configuration is stored in `.phonix/config.toml` and includes:
//! - `offline`: Never contact the remote, queue every change instead
//! - `remote`: Optional account store settings (URL, learner id, sync timing)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::sync::{EngineConfig, WsRemoteConfig};

const WORK_DIR_NAME: &str = ".phonix";
const CONFIG_FILE_NAME: &str = "config.toml";
const DATA_DIR_NAME: &str = "data";
const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Learner configuration stored in `.phonix/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Treat the device as offline regardless of remote reachability.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub offline: bool,
    /// Remote sync configuration (optional - if absent, runs in local-only mode).
    pub remote: Option<RemoteConfig>,
}

/// Account store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// WebSocket URL of the account store (`ws://...` or `wss://...`).
    pub url: String,
    /// Learner account id every record is stored under.
    pub user_id: String,
    /// Delay before failed queue items are retried, in seconds (default: 5).
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    /// Failures tolerated before an operation is set aside (default: 3).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// How long the success status is shown, in milliseconds (default: 2000).
    #[serde(default = "default_success_linger_ms")]
    pub success_linger_ms: u64,
    /// Max time to reach the account store, in seconds (default: 2).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Max time to wait for a reply, in seconds (default: 10).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_retry_delay_secs() -> u64 {
    5
}

fn default_max_retries() -> u32 {
    px_core::queue::MAX_RETRIES
}

fn default_success_linger_ms() -> u64 {
    2_000
}

fn default_connect_timeout_secs() -> u64 {
    2
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl RemoteConfig {
    /// Creates a remote config with default timings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRemoteUrl`] unless `url` is `ws://` or `wss://`,
    /// and [`Error::FieldEmpty`] for a blank user id.
    pub fn new(url: &str, user_id: &str) -> Result<Self> {
        let config = RemoteConfig {
            url: url.trim().to_string(),
            user_id: user_id.trim().to_string(),
            retry_delay_secs: default_retry_delay_secs(),
            max_retries: default_max_retries(),
            success_linger_ms: default_success_linger_ms(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let scheme_ok = ["ws://", "wss://"]
            .iter()
            .any(|scheme| self.url.len() > scheme.len() && self.url.starts_with(scheme));
        if !scheme_ok {
            return Err(Error::InvalidRemoteUrl(self.url.clone()));
        }
        if self.user_id.is_empty() {
            return Err(Error::FieldEmpty { field: "User id" });
        }
        Ok(())
    }

    /// Engine timings derived from this config.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            retry_delay: Duration::from_secs(self.retry_delay_secs),
            success_linger: Duration::from_millis(self.success_linger_ms),
        }
    }

    /// Connection settings for the WebSocket remote.
    pub fn ws_config(&self) -> WsRemoteConfig {
        WsRemoteConfig {
            url: self.url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

impl Config {
    /// Loads configuration from the given `.phonix/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        if let Some(remote) = &config.remote {
            remote.validate()?;
        }
        Ok(config)
    }

    /// Returns true if remote sync is configured.
    pub fn is_remote_mode(&self) -> bool {
        self.remote.is_some()
    }

    /// Returns the remote URL if configured.
    pub fn remote_url(&self) -> Option<&str> {
        self.remote.as_ref().map(|r| r.url.as_str())
    }

    /// Saves configuration to the given `.phonix/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }
}

/// Find the .phonix directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    find_work_dir_from(&std::env::current_dir()?)
}

/// Find the .phonix directory by walking up from `start`
pub fn find_work_dir_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Directory holding the progress, custom pack and queue blobs.
pub fn data_dir(work_dir: &Path) -> PathBuf {
    work_dir.join(DATA_DIR_NAME)
}

/// Initialize a new .phonix directory at the given path
pub fn init_work_dir(path: &Path, config: &Config) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    fs::create_dir_all(data_dir(&work_dir))?;
    config.save(&work_dir)?;
    write_gitignore(&work_dir)?;

    Ok(work_dir)
}

/// Write a .gitignore file to the work directory.
///
/// Learner data and the lock file are per device and never committed.
pub fn write_gitignore(work_dir: &Path) -> Result<()> {
    let content = "# Learner data (synced via remote)\ndata/\n\n# Runtime lock\nphonix.lock\n";
    fs::write(work_dir.join(GITIGNORE_FILE_NAME), content)?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

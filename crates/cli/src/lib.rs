// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! pxrs - offline-first phonics progress tracking with account sync.
//!
//! This crate provides the functionality behind the `phonix` CLI. Progress
//! and custom packs live in a local store (see [`px_core`]); when an account
//! store is configured, every change is pushed right away or queued for later.
//!
//! # Main Components
//!
//! - [`sync::SyncEngine`] - per-mutation sync, queue draining, and the initial reconcile
//! - [`sync::WsRemoteStore`] - the account store client over WebSocket
//! - [`Config`] - learner configuration (`.phonix/config.toml`)
//! - [`Error`] - error types for all commands
//!
//! # Initialization
//!
//! ```rust,ignore
//! use pxrs::{init_work_dir, find_work_dir, Config};
//!
//! // Local-only learner data
//! let work_dir = init_work_dir(Path::new("."), &Config::default())?;
//!
//! // Later, find it again from any subdirectory
//! let work_dir = find_work_dir()?;
//! let config = Config::load(&work_dir)?;
//! ```

mod cli;
pub mod colors;
mod commands;
mod display;
pub mod help;
pub mod logging;

pub mod config;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat, PackCommand, QueueCommand};
pub use config::{find_work_dir, init_work_dir, Config, RemoteConfig};
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;

/// Execute a parsed command line. This is the main entry point for library
/// users and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir)?;
    }
    let offline = cli.offline;

    match cli.command {
        Command::Init { path, remote, user } => commands::init::run(path, remote, user),
        Command::Mark { target, status } => {
            commands::practice::mark(offline, &target.pack, &target.word, status)
        }
        Command::Star { target } => {
            commands::practice::star(offline, &target.pack, &target.word, true)
        }
        Command::Unstar { target } => {
            commands::practice::star(offline, &target.pack, &target.word, false)
        }
        Command::Complete { pack } => commands::practice::complete(offline, &pack),
        Command::Reset { yes } => commands::practice::reset(yes),
        Command::Show { pack, output } => commands::show::run(pack.as_ref(), output.output),
        Command::Pack(cmd) => match cmd {
            PackCommand::New { name, words } => commands::pack::new(offline, &name, words),
            PackCommand::Edit { id, name, words } => {
                commands::pack::edit(offline, &id, name.as_deref(), words)
            }
            PackCommand::Delete { id } => commands::pack::delete(offline, &id),
            PackCommand::List { output } => commands::pack::list(output.output),
        },
        Command::Sync => commands::remote::sync(offline),
        Command::Status { output } => commands::remote::status(offline, output.output),
        Command::Queue(cmd) => match cmd {
            QueueCommand::List { output } => commands::queue::list(output.output),
            QueueCommand::Requeue => commands::queue::requeue(),
            QueueCommand::ClearDropped => commands::queue::clear_dropped(),
        },
        Command::Export { filepath } => commands::export::run(&filepath),
        Command::Import { filepath } => commands::import::run(&filepath),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "phonix", &mut std::io::stdout());
            Ok(())
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use crate::colors;
use crate::help;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use px_core::{PackId, WordStatus};

pub use args::{OutputArgs, WordArgs};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "phonix")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first phonics practice tracker with account sync")]
#[command(
    long_about = "Offline-first phonics practice tracker.\n\n\
    Progress is written locally first and synchronized with an account store when one is configured."
)]
#[command(help_template = help::template())]
#[command(before_help = help::commands())]
#[command(after_help = help::quickstart())]
#[command(styles = help::styles())]
pub struct Cli {
    /// Run as if phonix was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    /// Do not contact the account store; queue changes instead
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Practice
    // ─────────────────────────────────────────────────────────────────────────
    /// Record a word as tricky or mastered
    #[command(after_help = colors::examples("\
Examples:
  phonix mark 1 cat tricky       Mark 'cat' in built-in pack 1 as tricky
  phonix mark C2 ship mastered   Mark 'ship' in custom pack C2 as mastered"))]
    Mark {
        #[command(flatten)]
        target: WordArgs,

        /// Review outcome (tricky, mastered)
        status: WordStatus,
    },

    /// Star a word for later review
    Star {
        #[command(flatten)]
        target: WordArgs,
    },

    /// Remove the star from a word
    Unstar {
        #[command(flatten)]
        target: WordArgs,
    },

    /// Finish a practice session on a pack
    Complete {
        /// Pack id
        pack: PackId,
    },

    /// Show progress for one pack or all packs
    Show {
        /// Pack id (all packs when omitted)
        pack: Option<PackId>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage custom packs
    #[command(subcommand)]
    Pack(PackCommand),

    /// Remove all progress (custom packs are kept)
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Setup & Sync
    // ─────────────────────────────────────────────────────────────────────────
    /// Initialize learner data in the current directory
    #[command(after_help = colors::examples("\
Examples:
  phonix init                                          Local-only mode
  phonix init --remote ws://localhost:7891 --user <id>  Sync with an account store"))]
    Init {
        /// Directory to initialize (defaults to the current directory)
        path: Option<String>,

        /// Account store URL (ws:// or wss://)
        #[arg(long, requires = "user")]
        remote: Option<String>,

        /// Learner account id
        #[arg(long, requires = "remote", value_parser = non_empty_string)]
        user: Option<String>,
    },

    /// Reconcile local data with the account store
    Sync,

    /// Show sync status, pending changes and set-aside changes
    Status {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Inspect the sync queue
    #[command(subcommand)]
    Queue(QueueCommand),

    /// Export progress and custom packs as JSON
    Export {
        /// Output file path
        filepath: String,
    },

    /// Import progress and custom packs from JSON
    Import {
        /// Input file path
        filepath: String,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum PackCommand {
    /// Create a custom pack
    #[command(after_help = colors::examples("\
Examples:
  phonix pack new Digraphs ship chat thin   Create a pack with three words"))]
    New {
        /// Pack name
        #[arg(value_parser = non_empty_string)]
        name: String,

        /// Words in the pack
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },

    /// Rename a custom pack or replace its words
    Edit {
        /// Pack id (C<n>)
        id: PackId,

        /// New name
        #[arg(long, value_parser = non_empty_string)]
        name: Option<String>,

        /// New word list (comma-separated)
        #[arg(long, value_delimiter = ',')]
        words: Option<Vec<String>>,
    },

    /// Delete a custom pack
    Delete {
        /// Pack id (C<n>)
        id: PackId,
    },

    /// List custom packs
    List {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand)]
pub enum QueueCommand {
    /// List pending and set-aside operations
    List {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Move set-aside operations back into the queue
    Requeue,

    /// Discard set-aside operations
    ClearDropped,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;

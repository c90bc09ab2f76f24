// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` to reduce duplication
//! across commands that share common argument patterns.

use clap::Args;
use px_core::PackId;

use super::OutputFormat;

/// Output format selection.
#[derive(Args, Clone, Copy, Debug, Default)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// A word inside a pack.
#[derive(Args, Clone, Debug)]
pub struct WordArgs {
    /// Pack id: a number for built-in packs, C<n> for custom packs
    pub pack: PackId,

    /// Word to update
    pub word: String,
}

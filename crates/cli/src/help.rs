// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help text generation with colorization support.

use crate::colors;
use clap::builder::styling::Styles;

/// Generate clap Styles for help output.
pub fn styles() -> Styles {
    if !colors::should_colorize() {
        return Styles::plain();
    }

    use anstyle::{Ansi256Color, Color, Style};

    let color = |code| Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))));
    let header = color(colors::codes::HEADER);
    let literal = color(colors::codes::LITERAL);
    let context = color(colors::codes::CONTEXT);

    Styles::styled()
        .header(header)
        .usage(header)
        .literal(literal)
        .placeholder(context)
        .valid(context)
}

/// Main help template with colorized Options header.
pub fn template() -> String {
    format!(
        "{{about-with-newline}}
{{usage-heading}} {{usage}}

{{before-help}}{}
{{options}}{{after-help}}",
        colors::header("Options:")
    )
}

/// Commands list shown before options in main help.
pub fn commands() -> String {
    let rows = [
        ("mark", "Record a word as tricky or mastered"),
        ("[un]star", "Star or unstar a word"),
        ("complete", "Finish a practice session on a pack"),
        ("show", "Show progress"),
        ("pack", "Manage custom packs"),
        ("reset", "Remove all progress"),
    ];
    let setup = [
        ("init", "Initialize learner data"),
        ("sync", "Reconcile with the account store"),
        ("status", "Show sync status"),
        ("queue", "Inspect pending and set-aside changes"),
        ("export", "Export progress and custom packs"),
        ("import", "Import progress and custom packs"),
        ("completion", "Generate shell completions"),
    ];

    format!(
        "{}\n{}\n\n{}\n{}\n",
        colors::header("Practice:"),
        command_rows(&rows),
        colors::header("Setup & Sync:"),
        command_rows(&setup),
    )
}

fn command_rows(rows: &[(&str, &str)]) -> String {
    rows.iter()
        .map(|(name, about)| {
            let padding = " ".repeat(12usize.saturating_sub(name.len()));
            format!("  {}{padding}{about}", command_name(name))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a command name, dimming an `[un]` prefix.
fn command_name(name: &str) -> String {
    if !colors::should_colorize() {
        return name.to_string();
    }
    match name.strip_prefix("[un]") {
        Some(rest) => format!("{}{}", colors::context("[un]"), colors::literal(rest)),
        None => colors::literal(name),
    }
}

/// Quickstart help shown after options in main help.
pub fn quickstart() -> String {
    colors::examples(
        "\
Get started:
  phonix init                     Initialize local learner data
  phonix mark 1 cat tricky        Record a review outcome
  phonix show 1                   Show progress for pack 1
  phonix sync                     Reconcile with the account store",
    )
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;

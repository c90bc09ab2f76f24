// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! px-remote: reference account store for phonix progress sync.
//!
//! Keeps every learner's pack progress and custom packs in SQLite and serves
//! them over a request/response WebSocket protocol.

mod db;
mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// px-remote: Account store for phonix progress sync
#[derive(Parser, Debug)]
#[command(name = "px-remote")]
#[command(about = "WebSocket account store for phonix progress sync")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7891")]
    bind: SocketAddr,

    /// Directory for the account database
    #[arg(short, long, default_value = ".")]
    data: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting px-remote server");
    info!("  Bind address: {}", args.bind);
    info!(
        "  Database: {}",
        args.data.join(state::DB_FILE_NAME).display()
    );

    let state = state::ServerState::new(&args.data)?;

    server::run(args.bind, state).await?;

    Ok(())
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Progress sync with the px-remote account store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ LocalStore  │◄───►│ SyncEngine  │────►│ RemoteStore │────►│  Transport  │
//! │  (px-core)  │     │             │◄────│   (trait)   │◄────│   (trait)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                       │        ▲
//!                       ▼        │
//!               ┌─────────────┐  ┌──────────────┐
//!               │  SyncQueue  │  │ Connectivity │
//!               │  (px-core)  │  │  (watch)     │
//!               └─────────────┘  └──────────────┘
//! ```
//!
//! # Features
//!
//! - Local-first writes; the remote is updated afterwards
//! - Durable queue for operations made offline or that failed to push
//! - Drain on reconnect and fixed-delay retry of failed items
//! - Merge of remote state on initialize (newest review wins, union of words)
//! - Observable status through [`SyncStateBus`]
//! - Injectable remote and transport traits for testing

mod connectivity;
mod engine;
mod remote;
mod state;
mod transport;
mod ws_remote;

pub use connectivity::{ConnectivityMonitor, ConnectivityPort};
pub use engine::{
    EngineConfig, InitReport, SyncEngine, SyncError, SyncOutcome, SyncResult, RETRY_DELAY,
    SUCCESS_LINGER,
};
pub use remote::{RemoteError, RemoteFuture, RemoteResult, RemoteStore};
pub use state::{SyncState, SyncStateBus, SyncStatus};
pub use transport::{Transport, TransportError, WebSocketTransport};
pub use ws_remote::{WsRemoteConfig, WsRemoteStore};

#[cfg(test)]
pub(crate) mod test_helpers;

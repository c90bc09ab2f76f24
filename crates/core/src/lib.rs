// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! px-core: Shared library for phonix progress sync
//!
//! This crate provides the pack progress model, the local store, the durable
//! sync queue, the merge rules, and the wire protocol used by both the phonix
//! CLI and the px-remote account store.

pub mod clock;
pub mod error;
pub mod id;
pub mod jsonl;
pub mod merge;
pub mod pack;
pub mod persist;
pub mod protocol;
pub mod queue;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use merge::{merge_custom_packs, merge_progress, Reconcile};
pub use pack::{CustomPack, PackId, ProgressRecord, ProgressStats, StarMark, WordStatus};
pub use persist::{FilePersistence, MemoryPersistence, PersistencePort};
pub use protocol::{ClientMessage, RemoteProgress, ServerMessage};
pub use queue::{DrainReport, OpAction, OpKind, PendingOp, QueuedOperation, SyncQueue};
pub use store::{LocalStore, Snapshot};

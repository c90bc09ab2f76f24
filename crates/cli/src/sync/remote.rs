// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote store port.
//!
//! The account store is reached only through [`RemoteStore`], so the engine
//! can run against the WebSocket client, an in-memory fake, or anything else
//! that honors the upsert-by-(user, pack) contract.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use px_core::{CustomPack, PackId, ProgressRecord, RemoteProgress};

use super::transport::TransportError;

/// Error type for remote store operations.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The transport failed or the connection dropped.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server rejected the request.
    #[error("server error: {0}")]
    Server(String),

    /// The server answered with the wrong message type.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// No answer arrived in time.
    #[error("request timed out")]
    Timeout,
}

/// Result type for remote store operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by [`RemoteStore`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// Backend operations consumed by the sync engine.
pub trait RemoteStore: Send + Sync {
    /// Fetch every progress record of `user_id`.
    fn fetch_progress<'a>(
        &'a self,
        user_id: &'a str,
    ) -> RemoteFuture<'a, BTreeMap<PackId, RemoteProgress>>;

    /// Insert or replace one pack's progress.
    fn upsert_progress<'a>(
        &'a self,
        user_id: &'a str,
        pack_id: &'a PackId,
        record: &'a ProgressRecord,
    ) -> RemoteFuture<'a, ()>;

    /// Fetch every custom pack of `user_id`.
    fn fetch_custom_packs<'a>(&'a self, user_id: &'a str) -> RemoteFuture<'a, Vec<CustomPack>>;

    /// Insert or replace one custom pack.
    fn upsert_custom_pack<'a>(
        &'a self,
        user_id: &'a str,
        pack: &'a CustomPack,
    ) -> RemoteFuture<'a, ()>;

    /// Delete one custom pack.
    fn delete_custom_pack<'a>(
        &'a self,
        user_id: &'a str,
        pack_id: &'a PackId,
    ) -> RemoteFuture<'a, ()>;
}

impl<R: RemoteStore + ?Sized> RemoteStore for Arc<R> {
    fn fetch_progress<'a>(
        &'a self,
        user_id: &'a str,
    ) -> RemoteFuture<'a, BTreeMap<PackId, RemoteProgress>> {
        (**self).fetch_progress(user_id)
    }

    fn upsert_progress<'a>(
        &'a self,
        user_id: &'a str,
        pack_id: &'a PackId,
        record: &'a ProgressRecord,
    ) -> RemoteFuture<'a, ()> {
        (**self).upsert_progress(user_id, pack_id, record)
    }

    fn fetch_custom_packs<'a>(&'a self, user_id: &'a str) -> RemoteFuture<'a, Vec<CustomPack>> {
        (**self).fetch_custom_packs(user_id)
    }

    fn upsert_custom_pack<'a>(
        &'a self,
        user_id: &'a str,
        pack: &'a CustomPack,
    ) -> RemoteFuture<'a, ()> {
        (**self).upsert_custom_pack(user_id, pack)
    }

    fn delete_custom_pack<'a>(
        &'a self,
        user_id: &'a str,
        pack_id: &'a PackId,
    ) -> RemoteFuture<'a, ()> {
        (**self).delete_custom_pack(user_id, pack_id)
    }
}

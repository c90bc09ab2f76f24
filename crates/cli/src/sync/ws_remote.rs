// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! [`RemoteStore`] over a request/response WebSocket connection.
//!
//! One request is in flight at a time. The connection is opened lazily and
//! dropped on any transport failure, so the next request reconnects.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use px_core::protocol::{ClientMessage, ServerMessage};
use px_core::{CustomPack, PackId, ProgressRecord, RemoteProgress};

use super::remote::{RemoteError, RemoteFuture, RemoteResult, RemoteStore};
use super::transport::{Transport, TransportError, WebSocketTransport};

/// Configuration for the WebSocket remote.
#[derive(Debug, Clone)]
pub struct WsRemoteConfig {
    /// URL of the account store.
    pub url: String,
    /// Max time to establish a connection.
    pub connect_timeout: Duration,
    /// Max time to wait for a response.
    pub request_timeout: Duration,
}

impl Default for WsRemoteConfig {
    fn default() -> Self {
        WsRemoteConfig {
            url: "ws://localhost:7891".to_string(),
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Account store client speaking the px protocol.
pub struct WsRemoteStore<T: Transport = WebSocketTransport> {
    config: WsRemoteConfig,
    transport: Mutex<T>,
    next_request_id: AtomicU64,
}

impl WsRemoteStore<WebSocketTransport> {
    /// Create a remote with the default WebSocket transport.
    pub fn new(config: WsRemoteConfig) -> Self {
        Self::with_transport(config, WebSocketTransport::new())
    }
}

impl<T: Transport> WsRemoteStore<T> {
    /// Create a remote with a custom transport (for testing).
    pub fn with_transport(config: WsRemoteConfig, transport: T) -> Self {
        WsRemoteStore {
            config,
            transport: Mutex::new(transport),
            next_request_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Returns true if the server answers a ping within the connect timeout.
    pub async fn probe(&self) -> bool {
        let limit = self.config.connect_timeout;
        let ping = self.request(|request_id| ClientMessage::Ping { request_id });
        match tokio::time::timeout(limit, ping).await {
            Ok(Ok(ServerMessage::Pong { .. })) => true,
            Ok(Ok(other)) => {
                tracing::debug!(?other, "unexpected probe reply");
                false
            }
            Ok(Err(e)) => {
                tracing::debug!(error = %e, url = %self.config.url, "probe failed");
                false
            }
            Err(_) => false,
        }
    }

    /// Close the connection if open.
    pub async fn disconnect(&self) {
        let mut transport = self.transport.lock().await;
        let _ = transport.disconnect().await;
    }

    /// Send one request and wait for the response carrying its id.
    async fn request<F>(&self, build: F) -> RemoteResult<ServerMessage>
    where
        F: FnOnce(u64) -> ClientMessage,
    {
        let mut transport = self.transport.lock().await;

        if !transport.is_connected() {
            match tokio::time::timeout(
                self.config.connect_timeout,
                transport.connect(&self.config.url),
            )
            .await
            {
                Ok(result) => result?,
                Err(_) => return Err(RemoteError::Timeout),
            }
            tracing::debug!(url = %self.config.url, "connected to remote");
        }

        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        if let Err(e) = transport.send(build(request_id)).await {
            let _ = transport.disconnect().await;
            return Err(e.into());
        }

        loop {
            let received =
                match tokio::time::timeout(self.config.request_timeout, transport.recv()).await {
                    Ok(received) => received,
                    Err(_) => {
                        let _ = transport.disconnect().await;
                        return Err(RemoteError::Timeout);
                    }
                };

            let reply = match received {
                Ok(Some(reply)) => reply,
                Ok(None) => {
                    let _ = transport.disconnect().await;
                    return Err(TransportError::ConnectionClosed.into());
                }
                Err(e) => {
                    let _ = transport.disconnect().await;
                    return Err(e.into());
                }
            };

            match reply {
                ServerMessage::Error {
                    request_id: id,
                    message,
                } if id.is_none() || id == Some(request_id) => {
                    return Err(RemoteError::Server(message));
                }
                reply if reply.request_id() == Some(request_id) => return Ok(reply),
                stale => {
                    tracing::debug!(expected = request_id, got = ?stale.request_id(), "skipping stale response");
                }
            }
        }
    }
}

fn unexpected(reply: ServerMessage) -> RemoteError {
    RemoteError::UnexpectedResponse(format!("{reply:?}"))
}

fn expect_ack(reply: ServerMessage) -> RemoteResult<()> {
    match reply {
        ServerMessage::Ack { .. } => Ok(()),
        other => Err(unexpected(other)),
    }
}

impl<T: Transport> RemoteStore for WsRemoteStore<T> {
    fn fetch_progress<'a>(
        &'a self,
        user_id: &'a str,
    ) -> RemoteFuture<'a, BTreeMap<PackId, RemoteProgress>> {
        Box::pin(async move {
            let reply = self
                .request(|request_id| ClientMessage::FetchProgress {
                    request_id,
                    user_id: user_id.to_string(),
                })
                .await?;
            match reply {
                ServerMessage::Progress { progress, .. } => Ok(progress),
                other => Err(unexpected(other)),
            }
        })
    }

    fn upsert_progress<'a>(
        &'a self,
        user_id: &'a str,
        pack_id: &'a PackId,
        record: &'a ProgressRecord,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let reply = self
                .request(|request_id| ClientMessage::UpsertProgress {
                    request_id,
                    user_id: user_id.to_string(),
                    pack_id: pack_id.clone(),
                    record: record.clone(),
                })
                .await?;
            expect_ack(reply)
        })
    }

    fn fetch_custom_packs<'a>(&'a self, user_id: &'a str) -> RemoteFuture<'a, Vec<CustomPack>> {
        Box::pin(async move {
            let reply = self
                .request(|request_id| ClientMessage::FetchCustomPacks {
                    request_id,
                    user_id: user_id.to_string(),
                })
                .await?;
            match reply {
                ServerMessage::CustomPacks { packs, .. } => Ok(packs),
                other => Err(unexpected(other)),
            }
        })
    }

    fn upsert_custom_pack<'a>(
        &'a self,
        user_id: &'a str,
        pack: &'a CustomPack,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let reply = self
                .request(|request_id| ClientMessage::UpsertCustomPack {
                    request_id,
                    user_id: user_id.to_string(),
                    pack: pack.clone(),
                })
                .await?;
            expect_ack(reply)
        })
    }

    fn delete_custom_pack<'a>(
        &'a self,
        user_id: &'a str,
        pack_id: &'a PackId,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let reply = self
                .request(|request_id| ClientMessage::DeleteCustomPack {
                    request_id,
                    user_id: user_id.to_string(),
                    pack_id: pack_id.clone(),
                })
                .await?;
            expect_ack(reply)
        })
    }
}

#[cfg(test)]
#[path = "ws_remote_tests.rs"]
mod tests;

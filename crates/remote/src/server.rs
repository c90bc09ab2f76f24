// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Each connection is served by its own task. Every text frame carries one
//! request and gets exactly one reply echoing its `request_id`.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use px_core::protocol::{ClientMessage, ServerMessage};

use crate::state::ServerState;

/// Run the WebSocket server on the given address.
pub async fn run(
    addr: SocketAddr,
    state: ServerState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on: {}", addr);
    serve(listener, state).await
}

/// Accept connections from an already bound listener.
pub async fn serve(
    listener: TcpListener,
    state: ServerState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: ServerState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection from: {}", peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    while let Some(msg) = ws_stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let response = handle_client_message(&text, &state).await;
                let json = response.to_json()?;
                ws_sink.send(Message::Text(json.into())).await?;
            }
            Ok(Message::Binary(_)) => {
                warn!("Binary frame from {} ignored", peer_addr);
                let reply = ServerMessage::error(None, "binary frames are not supported");
                ws_sink.send(Message::Text(reply.to_json()?.into())).await?;
            }
            Ok(Message::Close(_)) => {
                info!("Client {} disconnected", peer_addr);
                break;
            }
            Ok(Message::Ping(data)) => {
                ws_sink.send(Message::Pong(data)).await?;
            }
            Ok(_) => {}
            Err(e) => {
                error!("WebSocket error from {}: {}", peer_addr, e);
                break;
            }
        }
    }

    info!("Connection closed: {}", peer_addr);
    Ok(())
}

/// Process one request frame. Always produces a reply.
pub(crate) async fn handle_client_message(text: &str, state: &ServerState) -> ServerMessage {
    let msg = match ClientMessage::from_json(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("Malformed request: {}", e);
            return ServerMessage::error(None, format!("malformed request: {}", e));
        }
    };
    debug!("Received message: {:?}", msg);

    let request_id = msg.request_id();
    let result = match msg {
        ClientMessage::FetchProgress { user_id, .. } => state
            .fetch_progress(&user_id)
            .await
            .map(|progress| {
                debug!("Progress response: {} pack(s) for {}", progress.len(), user_id);
                ServerMessage::Progress {
                    request_id,
                    progress,
                }
            }),

        ClientMessage::UpsertProgress {
            user_id,
            pack_id,
            record,
            ..
        } => state
            .upsert_progress(&user_id, &pack_id, &record)
            .await
            .map(|synced_at| ServerMessage::Ack {
                request_id,
                synced_at,
            }),

        ClientMessage::FetchCustomPacks { user_id, .. } => state
            .fetch_custom_packs(&user_id)
            .await
            .map(|packs| ServerMessage::CustomPacks { request_id, packs }),

        ClientMessage::UpsertCustomPack { user_id, pack, .. } => state
            .upsert_custom_pack(&user_id, &pack)
            .await
            .map(|synced_at| ServerMessage::Ack {
                request_id,
                synced_at,
            }),

        ClientMessage::DeleteCustomPack {
            user_id, pack_id, ..
        } => state
            .delete_custom_pack(&user_id, &pack_id)
            .await
            .map(|synced_at| ServerMessage::Ack {
                request_id,
                synced_at,
            }),

        ClientMessage::Ping { .. } => {
            debug!("Ping received: {}", request_id);
            Ok(ServerMessage::Pong { request_id })
        }
    };

    result.unwrap_or_else(|e| {
        warn!("Request {} failed: {}", request_id, e);
        ServerMessage::error(Some(request_id), e.to_string())
    })
}

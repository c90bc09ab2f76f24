// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages between a device and the account store.
//!
//! The protocol is request/response:
//! - Client sends one request per text frame, tagged with a `request_id`
//! - Server answers each request with exactly one message echoing that id

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pack::{CustomPack, PackId, ProgressRecord};

/// A progress record as held by the account store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProgress {
    #[serde(flatten)]
    pub record: ProgressRecord,
    /// Server-assigned time of the last upsert. Informational only.
    #[serde(rename = "syncedAt", default)]
    pub synced_at: Option<DateTime<Utc>>,
}

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Request every progress record of a user.
    FetchProgress { request_id: u64, user_id: String },

    /// Insert or replace one pack's progress, keyed by (user, pack).
    UpsertProgress {
        request_id: u64,
        user_id: String,
        pack_id: PackId,
        record: ProgressRecord,
    },

    /// Request every custom pack of a user.
    FetchCustomPacks { request_id: u64, user_id: String },

    /// Insert or replace one custom pack.
    UpsertCustomPack {
        request_id: u64,
        user_id: String,
        pack: CustomPack,
    },

    /// Delete one custom pack. Deleting a missing pack succeeds.
    DeleteCustomPack {
        request_id: u64,
        user_id: String,
        pack_id: PackId,
    },

    /// Ping message for connectivity probes.
    Ping { request_id: u64 },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Response to FetchProgress.
    Progress {
        request_id: u64,
        progress: BTreeMap<PackId, RemoteProgress>,
    },

    /// Response to FetchCustomPacks.
    CustomPacks {
        request_id: u64,
        packs: Vec<CustomPack>,
    },

    /// Response to a successful write.
    Ack {
        request_id: u64,
        synced_at: DateTime<Utc>,
    },

    /// Pong response to client Ping.
    Pong { request_id: u64 },

    /// Error message.
    ///
    /// `request_id` is absent when the request could not be parsed.
    Error {
        #[serde(default)]
        request_id: Option<u64>,
        message: String,
    },
}

impl ClientMessage {
    /// Returns the id the response must echo.
    pub fn request_id(&self) -> u64 {
        match self {
            ClientMessage::FetchProgress { request_id, .. }
            | ClientMessage::UpsertProgress { request_id, .. }
            | ClientMessage::FetchCustomPacks { request_id, .. }
            | ClientMessage::UpsertCustomPack { request_id, .. }
            | ClientMessage::DeleteCustomPack { request_id, .. }
            | ClientMessage::Ping { request_id } => *request_id,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Creates an Error message answering `request_id`.
    pub fn error(request_id: Option<u64>, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            request_id,
            message: message.into(),
        }
    }

    /// Returns the id of the request this message answers, if known.
    pub fn request_id(&self) -> Option<u64> {
        match self {
            ServerMessage::Progress { request_id, .. }
            | ServerMessage::CustomPacks { request_id, .. }
            | ServerMessage::Ack { request_id, .. }
            | ServerMessage::Pong { request_id } => Some(*request_id),
            ServerMessage::Error { request_id, .. } => *request_id,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;

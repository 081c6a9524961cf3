// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain records shared across the DocMind conversation core.
//!
//! Record shapes double as wire shapes: the persistence gateway and the
//! inference backend both speak these types directly, validated by serde
//! at the boundary. Timestamps are RFC 3339 UTC strings assigned by the
//! persistence layer; their lexicographic order is the chronological
//! order used as the ordering key.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Default title given to a freshly created session.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// A named conversation thread owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: String,
}

/// Author of a message turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One turn in a session. Immutable once written; there is no edit operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: String,
}

/// The insert shape for a message. The gateway returns the authoritative
/// [`ChatMessage`] (id and timestamp) from the insert itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMessage {
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
}

/// A selectable inference backend, as listed by the persistence layer.
///
/// `api_model_name` is the identifier passed to the inference backend;
/// `display_name` is the human label. Only active models are selectable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatModel {
    pub id: String,
    pub display_name: String,
    pub api_model_name: String,
    pub is_active: bool,
}

/// A chat turn request to the inference backend. Field names are the wire
/// contract of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub query: String,
    pub session_id: String,
    pub user_id: String,
    pub model_name: String,
    pub use_web: bool,
}

/// The inference backend's answer to a chat turn.
///
/// A missing or empty `response` is replaced by a fixed fallback string
/// before the assistant turn is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
}

/// A transient unit of document-ingestion work. Never persisted as a
/// first-class entity and never retried automatically.
///
/// `session_id` is optional: documents may be uploaded before any session
/// exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    pub file_name: String,
    pub data: Vec<u8>,
    pub user_id: String,
    pub session_id: Option<String>,
}

/// Backend acknowledgement of a completed document ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadAck {
    pub message: String,
}

/// Severity of a surfaced notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// An outcome surfaced to the user via the notification sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub detail: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            detail: detail.into(),
        }
    }

    pub fn success(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            detail: detail.into(),
        }
    }

    pub fn error(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            detail: detail.into(),
        }
    }
}

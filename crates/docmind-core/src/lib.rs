// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the DocMind conversation client.
//!
//! This crate provides the foundational error type, domain records, and
//! collaborator traits used throughout the DocMind workspace. The
//! conversation orchestrator in `docmind-chat` consumes the traits; the
//! gateway and backend crates implement them.

pub mod error;
pub mod traits;
pub mod types;

pub use error::DocmindError;
pub use types::{
    ChatMessage, ChatModel, ChatReply, ChatSession, ChatTurn, MessageRole, NewMessage, Notice,
    NoticeKind, UploadAck, UploadJob, DEFAULT_SESSION_TITLE,
};

pub use traits::{InferenceClient, NotificationSink, PersistenceGateway, TracingNotifier};

// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence gateway trait for the remote structured store.

use async_trait::async_trait;

use crate::error::DocmindError;
use crate::types::{ChatMessage, ChatModel, ChatSession, NewMessage};

/// Contract over the durable store holding sessions, messages, and models.
///
/// The store owns record identity and timestamps: inserts return the
/// authoritative row so callers never invent ids locally. Deleting a
/// session cascades to its messages at the storage level; the gateway
/// only issues the session delete.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Lists the user's sessions, newest first.
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>, DocmindError>;

    /// Creates a session with the given title and returns the stored row.
    async fn create_session(
        &self,
        user_id: &str,
        title: &str,
    ) -> Result<ChatSession, DocmindError>;

    /// Deletes a session by id. Deleting an absent id is not an error.
    async fn delete_session(&self, id: &str) -> Result<(), DocmindError>;

    /// Lists a session's messages in chronological (ascending) order.
    async fn list_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, DocmindError>;

    /// Inserts a message and returns the stored row with its authoritative
    /// id and timestamp.
    async fn insert_message(&self, message: &NewMessage) -> Result<ChatMessage, DocmindError>;

    /// Lists models, optionally restricted to `is_active = true`.
    async fn list_models(&self, active_only: bool) -> Result<Vec<ChatModel>, DocmindError>;
}

// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory persistence gateway for deterministic testing.
//!
//! `MockGateway` implements `PersistenceGateway` with plain vectors,
//! uuid row ids, and a deterministic millisecond clock, enabling fast
//! tests without a Supabase project.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use docmind_core::{
    ChatMessage, ChatModel, ChatSession, DocmindError, NewMessage, PersistenceGateway,
};

/// An in-memory stand-in for the remote structured store.
///
/// Row ids are random uuids (like the real store); timestamps advance by
/// one millisecond per write from a fixed epoch, so chronological order
/// equals write order and tests stay deterministic.
pub struct MockGateway {
    sessions: Mutex<Vec<ChatSession>>,
    messages: Mutex<Vec<ChatMessage>>,
    models: Mutex<Vec<ChatModel>>,
    clock_ms: AtomicI64,
    insert_message_calls: AtomicUsize,
    list_message_calls: AtomicUsize,
    fail_session_ops: AtomicBool,
    fail_message_inserts: AtomicBool,
    fail_message_lists: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            models: Mutex::new(Vec::new()),
            clock_ms: AtomicI64::new(0),
            insert_message_calls: AtomicUsize::new(0),
            list_message_calls: AtomicUsize::new(0),
            fail_session_ops: AtomicBool::new(false),
            fail_message_inserts: AtomicBool::new(false),
            fail_message_lists: AtomicBool::new(false),
        }
    }

    fn now(&self) -> String {
        let ms = self.clock_ms.fetch_add(1, Ordering::SeqCst);
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        (base + Duration::milliseconds(ms)).to_rfc3339()
    }

    /// Replace the model table contents.
    pub fn set_models(&self, models: Vec<ChatModel>) {
        *self.models.lock().unwrap() = models;
    }

    /// All messages stored for a session, chronological.
    pub fn stored_messages(&self, session_id: &str) -> Vec<ChatMessage> {
        let mut rows: Vec<ChatMessage> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        rows
    }

    /// All sessions stored for a user, newest first.
    pub fn stored_sessions(&self, user_id: &str) -> Vec<ChatSession> {
        let mut rows: Vec<ChatSession> = self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    pub fn insert_message_calls(&self) -> usize {
        self.insert_message_calls.load(Ordering::SeqCst)
    }

    pub fn list_message_calls(&self) -> usize {
        self.list_message_calls.load(Ordering::SeqCst)
    }

    /// Make session create/delete/list operations fail.
    pub fn fail_session_ops(&self, fail: bool) {
        self.fail_session_ops.store(fail, Ordering::SeqCst);
    }

    /// Make message inserts fail.
    pub fn fail_message_inserts(&self, fail: bool) {
        self.fail_message_inserts.store(fail, Ordering::SeqCst);
    }

    /// Make message history loads fail.
    pub fn fail_message_lists(&self, fail: bool) {
        self.fail_message_lists.store(fail, Ordering::SeqCst);
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersistenceGateway for MockGateway {
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>, DocmindError> {
        if self.fail_session_ops.load(Ordering::SeqCst) {
            return Err(DocmindError::gateway("mock: session op failed"));
        }
        Ok(self.stored_sessions(user_id))
    }

    async fn create_session(
        &self,
        user_id: &str,
        title: &str,
    ) -> Result<ChatSession, DocmindError> {
        if self.fail_session_ops.load(Ordering::SeqCst) {
            return Err(DocmindError::gateway("mock: session op failed"));
        }
        let session = ChatSession {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            created_at: self.now(),
        };
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session)
    }

    async fn delete_session(&self, id: &str) -> Result<(), DocmindError> {
        if self.fail_session_ops.load(Ordering::SeqCst) {
            return Err(DocmindError::gateway("mock: session op failed"));
        }
        self.sessions.lock().unwrap().retain(|s| s.id != id);
        // The real store cascades session deletes to message rows.
        self.messages.lock().unwrap().retain(|m| m.session_id != id);
        Ok(())
    }

    async fn list_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, DocmindError> {
        self.list_message_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_message_lists.load(Ordering::SeqCst) {
            return Err(DocmindError::gateway("mock: list_messages failed"));
        }
        Ok(self.stored_messages(session_id))
    }

    async fn insert_message(&self, message: &NewMessage) -> Result<ChatMessage, DocmindError> {
        self.insert_message_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_message_inserts.load(Ordering::SeqCst) {
            return Err(DocmindError::gateway("mock: insert_message failed"));
        }
        let row = ChatMessage {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: message.session_id.clone(),
            role: message.role,
            content: message.content.clone(),
            created_at: self.now(),
        };
        self.messages.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_models(&self, active_only: bool) -> Result<Vec<ChatModel>, DocmindError> {
        Ok(self
            .models
            .lock()
            .unwrap()
            .iter()
            .filter(|m| !active_only || m.is_active)
            .cloned()
            .collect())
    }
}

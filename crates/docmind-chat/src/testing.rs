// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-crate stub collaborators for orchestrator unit tests.
//!
//! Deliberately tiny: deterministic ids and timestamps, per-operation
//! failure switches, and a latch to hold a chat call in flight. The
//! full-featured mocks for consumers live in `docmind-test-utils`.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use docmind_core::{
    ChatMessage, ChatModel, ChatReply, ChatSession, ChatTurn, DocmindError, InferenceClient,
    MessageRole, NewMessage, Notice, NotificationSink, PersistenceGateway, UploadAck, UploadJob,
};

/// A session record with a fixed timestamp, for tests that don't care
/// about ordering.
pub fn session(id: &str, user_id: &str) -> ChatSession {
    ChatSession {
        id: id.to_string(),
        user_id: user_id.to_string(),
        title: "New Chat".to_string(),
        created_at: "2026-01-01T00:00:00.000Z".to_string(),
    }
}

/// In-memory persistence gateway with deterministic ids/timestamps and
/// failure switches.
pub struct StubGateway {
    sessions: Mutex<Vec<ChatSession>>,
    messages: Mutex<Vec<ChatMessage>>,
    models: Mutex<Vec<ChatModel>>,
    clock: AtomicU64,
    insert_calls: AtomicUsize,
    /// Remaining successful inserts before forced failure; i64::MAX
    /// disables the switch.
    inserts_allowed: AtomicI64,
    fail_lists: AtomicBool,
    fail_deletes: AtomicBool,
}

impl StubGateway {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            models: Mutex::new(Vec::new()),
            clock: AtomicU64::new(1),
            insert_calls: AtomicUsize::new(0),
            inserts_allowed: AtomicI64::new(i64::MAX),
            fail_lists: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }

    fn tick(&self) -> String {
        let n = self.clock.fetch_add(1, Ordering::SeqCst);
        format!("2026-01-01T00:00:00.{n:03}Z")
    }

    pub fn seed_session(&self, session: &ChatSession) {
        self.sessions.lock().unwrap().push(session.clone());
    }

    pub fn seed_message(&self, session_id: &str, role: MessageRole, content: &str) {
        let created_at = self.tick();
        let mut messages = self.messages.lock().unwrap();
        let id = format!("m-{}", messages.len() + 1);
        messages.push(ChatMessage {
            id,
            session_id: session_id.to_string(),
            role,
            content: content.to_string(),
            created_at,
        });
    }

    pub fn set_models(&self, models: Vec<ChatModel>) {
        *self.models.lock().unwrap() = models;
    }

    pub fn messages_for(&self, session_id: &str) -> Vec<ChatMessage> {
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

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.inserts_allowed
            .store(if fail { 0 } else { i64::MAX }, Ordering::SeqCst);
    }

    /// Let `n` inserts succeed, then fail the rest.
    pub fn fail_inserts_after(&self, n: i64) {
        self.inserts_allowed.store(n, Ordering::SeqCst);
    }

    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

impl Default for StubGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersistenceGateway for StubGateway {
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>, DocmindError> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(DocmindError::gateway("stub: list_sessions failed"));
        }
        let mut rows: Vec<ChatSession> = self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn create_session(
        &self,
        user_id: &str,
        title: &str,
    ) -> Result<ChatSession, DocmindError> {
        let created_at = self.tick();
        let mut sessions = self.sessions.lock().unwrap();
        let session = ChatSession {
            id: format!("sess-{}", sessions.len() + 1),
            user_id: user_id.to_string(),
            title: title.to_string(),
            created_at,
        };
        sessions.push(session.clone());
        Ok(session)
    }

    async fn delete_session(&self, id: &str) -> Result<(), DocmindError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(DocmindError::gateway("stub: delete_session failed"));
        }
        self.sessions.lock().unwrap().retain(|s| s.id != id);
        // Store-level cascade.
        self.messages.lock().unwrap().retain(|m| m.session_id != id);
        Ok(())
    }

    async fn list_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, DocmindError> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(DocmindError::gateway("stub: list_messages failed"));
        }
        Ok(self.messages_for(session_id))
    }

    async fn insert_message(&self, message: &NewMessage) -> Result<ChatMessage, DocmindError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.inserts_allowed.fetch_sub(1, Ordering::SeqCst) <= 0 {
            return Err(DocmindError::gateway("stub: insert_message failed"));
        }
        let created_at = self.tick();
        let mut messages = self.messages.lock().unwrap();
        let row = ChatMessage {
            id: format!("m-{}", messages.len() + 1),
            session_id: message.session_id.clone(),
            role: message.role,
            content: message.content.clone(),
            created_at,
        };
        messages.push(row.clone());
        Ok(row)
    }

    async fn list_models(&self, active_only: bool) -> Result<Vec<ChatModel>, DocmindError> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(DocmindError::gateway("stub: list_models failed"));
        }
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

/// Inference stub with queued replies and a latch that holds chat calls
/// in flight until released.
pub struct StubBackend {
    replies: Mutex<Vec<String>>,
    gate: tokio::sync::Semaphore,
    held: AtomicBool,
    chat_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    fail_chat: AtomicBool,
    upload_failure: Mutex<Option<String>>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(Vec::new()),
            gate: tokio::sync::Semaphore::new(0),
            held: AtomicBool::new(false),
            chat_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            fail_chat: AtomicBool::new(false),
            upload_failure: Mutex::new(None),
        }
    }

    /// Queue the next chat reply (FIFO).
    pub fn queue_reply(&self, text: &str) {
        self.replies.lock().unwrap().push(text.to_string());
    }

    /// Make subsequent chat calls block until [`release`](Self::release).
    pub fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    /// Let one held chat call proceed.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn fail_chat(&self, fail: bool) {
        self.fail_chat.store(fail, Ordering::SeqCst);
    }

    /// Make uploads fail with the given backend-style detail.
    pub fn fail_uploads(&self, detail: &str) {
        *self.upload_failure.lock().unwrap() = Some(detail.to_string());
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceClient for StubBackend {
    async fn chat(&self, _turn: &ChatTurn) -> Result<ChatReply, DocmindError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        if self.held.load(Ordering::SeqCst) {
            let permit = self.gate.acquire().await.expect("gate closed");
            permit.forget();
        }
        if self.fail_chat.load(Ordering::SeqCst) {
            return Err(DocmindError::inference("stub: chat failed"));
        }
        let mut replies = self.replies.lock().unwrap();
        let text = if replies.is_empty() {
            "stub reply".to_string()
        } else {
            replies.remove(0)
        };
        Ok(ChatReply {
            response: Some(text),
        })
    }

    async fn upload(&self, job: &UploadJob) -> Result<UploadAck, DocmindError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(detail) = self.upload_failure.lock().unwrap().clone() {
            return Err(DocmindError::upload(detail));
        }
        Ok(UploadAck {
            message: format!("Successfully processed {}", job.file_name),
        })
    }
}

/// Records every surfaced notice.
pub struct StubNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl StubNotifier {
    pub fn new() -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Default for StubNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for StubNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock inference backend for deterministic testing.
//!
//! `MockBackend` implements `InferenceClient` with pre-configured
//! replies, enabling fast, CI-runnable tests without a running backend.
//! Replies are popped from a FIFO queue; when the queue is empty a
//! default "mock reply" text is returned. A latch can hold chat calls in
//! flight to exercise the orchestrator's concurrency guard.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use docmind_core::{
    ChatReply, ChatTurn, DocmindError, InferenceClient, UploadAck, UploadJob,
};

/// A mock inference backend with queued replies and call recording.
pub struct MockBackend {
    replies: Arc<Mutex<VecDeque<String>>>,
    turns: Mutex<Vec<ChatTurn>>,
    uploads: Mutex<Vec<UploadJob>>,
    gate: Semaphore,
    held: AtomicBool,
    fail_chat: AtomicBool,
    upload_failure: Mutex<Option<String>>,
}

impl MockBackend {
    /// Create a new mock backend with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            turns: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            gate: Semaphore::new(0),
            held: AtomicBool::new(false),
            fail_chat: AtomicBool::new(false),
            upload_failure: Mutex::new(None),
        }
    }

    /// Create a mock backend pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<String>) -> Self {
        let backend = Self::new();
        *backend.replies.lock().unwrap() = VecDeque::from(replies);
        backend
    }

    /// Add a reply to the end of the queue.
    pub fn add_reply(&self, text: impl Into<String>) {
        self.replies.lock().unwrap().push_back(text.into());
    }

    /// Every chat turn received, in arrival order.
    pub fn turns(&self) -> Vec<ChatTurn> {
        self.turns.lock().unwrap().clone()
    }

    /// Every upload job received, in arrival order.
    pub fn uploads(&self) -> Vec<UploadJob> {
        self.uploads.lock().unwrap().clone()
    }

    /// Make subsequent chat calls block until [`release`](Self::release).
    pub fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    /// Let one held chat call proceed.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    /// Make chat calls fail with a transport-style error.
    pub fn fail_chat(&self, fail: bool) {
        self.fail_chat.store(fail, Ordering::SeqCst);
    }

    /// Make uploads fail with the given backend-style detail.
    pub fn fail_uploads(&self, detail: impl Into<String>) {
        *self.upload_failure.lock().unwrap() = Some(detail.into());
    }

    fn next_reply(&self) -> String {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "mock reply".to_string())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceClient for MockBackend {
    async fn chat(&self, turn: &ChatTurn) -> Result<ChatReply, DocmindError> {
        self.turns.lock().unwrap().push(turn.clone());
        if self.held.load(Ordering::SeqCst) {
            let permit = self.gate.acquire().await.expect("gate closed");
            permit.forget();
        }
        if self.fail_chat.load(Ordering::SeqCst) {
            return Err(DocmindError::inference("mock: chat failed"));
        }
        Ok(ChatReply {
            response: Some(self.next_reply()),
        })
    }

    async fn upload(&self, job: &UploadJob) -> Result<UploadAck, DocmindError> {
        self.uploads.lock().unwrap().push(job.clone());
        if let Some(detail) = self.upload_failure.lock().unwrap().clone() {
            return Err(DocmindError::upload(detail));
        }
        Ok(UploadAck {
            message: format!("Successfully processed {}", job.file_name),
        })
    }
}

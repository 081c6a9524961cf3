// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session state machine that drives the three-step send protocol.
//!
//! Each session cycles between `Idle` and `Sending` for its whole
//! lifetime. A send must persist the user turn before the inference call
//! begins, and the inference call must resolve before the assistant turn
//! is persisted, so the durable record of an exchange always has the
//! user's turn physically preceding the assistant's.
//!
//! Shared state (the in-flight set and the current transcript) lives
//! behind a `std::sync::Mutex` that is never held across an await; the
//! sequential suspension points of the protocol provide the ordering, the
//! lock only protects the short synchronous sections between them.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use docmind_core::{
    ChatMessage, ChatModel, ChatSession, ChatTurn, DocmindError, InferenceClient, MessageRole,
    NewMessage, Notice, NotificationSink, PersistenceGateway,
};
use tracing::{debug, info, warn};

/// Fixed text persisted as the assistant turn when the backend answers
/// with no response text.
pub const FALLBACK_REPLY: &str = "I couldn't generate a response.";

/// Why a send was ignored. Precondition rejections are silent no-ops:
/// nothing is persisted, requested, notified, or logged as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyInput,
    NoSession,
    NoModel,
    AlreadySending,
}

/// Outcome of a [`MessageOrchestrator::send`] call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Both turns persisted and appended to the transcript.
    Sent,
    /// A precondition rejected the send before any I/O.
    Ignored(IgnoreReason),
}

/// Input to a send: the raw text plus whatever the caller currently has
/// selected. Missing selections degrade to an ignored send rather than an
/// error.
#[derive(Debug, Clone, Copy)]
pub struct SendRequest<'a> {
    pub text: &'a str,
    pub session: Option<&'a ChatSession>,
    pub model: Option<&'a ChatModel>,
    pub use_web: bool,
}

/// One entry of the in-memory message sequence.
///
/// A send appends a `Pending` user entry immediately (so the turn shows
/// before the store answers) and replaces it with the authoritative
/// `Persisted` row once the insert resolves -- never duplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    Pending {
        /// Correlates the optimistic entry with its settling write.
        token: u64,
        role: MessageRole,
        content: String,
    },
    Persisted(ChatMessage),
}

/// The message sequence for whichever session is current.
#[derive(Debug)]
struct Transcript {
    session_id: String,
    entries: Vec<TranscriptEntry>,
}

#[derive(Debug, Default)]
struct OrchestratorState {
    transcript: Option<Transcript>,
    /// Session ids with a send in flight. Membership IS the `Sending`
    /// state; absence is `Idle`.
    in_flight: HashSet<String>,
    next_token: u64,
}

/// Releases the per-session `Sending` flag on every exit path, including
/// early returns and panics, so a failed send never leaves the session
/// permanently locked.
struct InFlightGuard<'a> {
    state: &'a Mutex<OrchestratorState>,
    session_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock_state(self.state);
        state.in_flight.remove(&self.session_id);
    }
}

fn lock_state(state: &Mutex<OrchestratorState>) -> MutexGuard<'_, OrchestratorState> {
    // A poisoned lock only means a panic elsewhere; the state itself is
    // a plain set + vec and stays usable.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drives the send protocol and owns the in-memory message sequence for
/// the current session.
pub struct MessageOrchestrator {
    gateway: Arc<dyn PersistenceGateway>,
    inference: Arc<dyn InferenceClient>,
    notifier: Arc<dyn NotificationSink>,
    state: Mutex<OrchestratorState>,
}

impl MessageOrchestrator {
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        inference: Arc<dyn InferenceClient>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            gateway,
            inference,
            notifier,
            state: Mutex::new(OrchestratorState::default()),
        }
    }

    /// Sends one chat turn through the three-step protocol.
    ///
    /// Precondition rejections return `Ok(Ignored(..))` without any I/O.
    /// Failures after the protocol has started are surfaced through the
    /// notification sink and returned; partial state (a user turn with no
    /// assistant turn) is left as-is for the user to re-drive.
    pub async fn send(&self, request: SendRequest<'_>) -> Result<SendOutcome, DocmindError> {
        let text = request.text.trim();
        if text.is_empty() {
            return Ok(SendOutcome::Ignored(IgnoreReason::EmptyInput));
        }
        let Some(session) = request.session else {
            return Ok(SendOutcome::Ignored(IgnoreReason::NoSession));
        };
        let Some(model) = request.model else {
            return Ok(SendOutcome::Ignored(IgnoreReason::NoModel));
        };

        // Check-and-set of the Sending flag and the optimistic append are
        // one critical section: after it, this session rejects further
        // sends until the guard drops.
        let token;
        {
            let mut state = lock_state(&self.state);
            if !state.in_flight.insert(session.id.clone()) {
                debug!(session_id = session.id.as_str(), "send already in flight");
                return Ok(SendOutcome::Ignored(IgnoreReason::AlreadySending));
            }
            token = state.next_token;
            state.next_token += 1;
            if let Some(t) = state.transcript.as_mut()
                && t.session_id == session.id
            {
                t.entries.push(TranscriptEntry::Pending {
                    token,
                    role: MessageRole::User,
                    content: text.to_string(),
                });
            }
        }
        let _guard = InFlightGuard {
            state: &self.state,
            session_id: session.id.clone(),
        };

        self.run_send(session, model, text, request.use_web, token)
            .await
            .map(|()| SendOutcome::Sent)
    }

    /// Steps 3-5 of the protocol. The caller holds the `Sending` flag.
    async fn run_send(
        &self,
        session: &ChatSession,
        model: &ChatModel,
        text: &str,
        use_web: bool,
        token: u64,
    ) -> Result<(), DocmindError> {
        // Step 3: the user turn must be durable before any inference.
        let user_row = NewMessage {
            session_id: session.id.clone(),
            role: MessageRole::User,
            content: text.to_string(),
        };
        let user_msg = match self.gateway.insert_message(&user_row).await {
            Ok(msg) => msg,
            Err(e) => {
                self.drop_pending(token);
                warn!(session_id = session.id.as_str(), error = %e, "user turn persist failed");
                self.notifier.notify(Notice::error("Error", e.to_string()));
                return Err(e);
            }
        };
        self.settle(token, user_msg);
        debug!(session_id = session.id.as_str(), "user turn persisted");

        // Step 4: no client-side timeout, no retry; the session stays in
        // Sending until this resolves or fails.
        let turn = ChatTurn {
            query: text.to_string(),
            session_id: session.id.clone(),
            user_id: session.user_id.clone(),
            model_name: model.api_model_name.clone(),
            use_web,
        };
        let reply = match self.inference.chat(&turn).await {
            Ok(reply) => reply,
            Err(e) => {
                // The user turn stays persisted with no assistant turn;
                // the user can re-send.
                warn!(session_id = session.id.as_str(), error = %e, "inference failed");
                self.notifier.notify(Notice::error("Error", e.to_string()));
                return Err(e);
            }
        };

        let content = reply
            .response
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string());

        // Step 5: persist and append the assistant turn.
        let assistant_row = NewMessage {
            session_id: session.id.clone(),
            role: MessageRole::Assistant,
            content,
        };
        let assistant_msg = match self.gateway.insert_message(&assistant_row).await {
            Ok(msg) => msg,
            Err(e) => {
                warn!(session_id = session.id.as_str(), error = %e, "assistant turn persist failed");
                self.notifier.notify(Notice::error("Error", e.to_string()));
                return Err(e);
            }
        };
        self.append(assistant_msg);
        debug!(session_id = session.id.as_str(), "assistant turn persisted");
        Ok(())
    }

    /// Discards the in-memory sequence and loads the session's history,
    /// oldest first. On load failure the transcript is installed empty for
    /// the new session and the error is returned.
    pub async fn activate(&self, session: &ChatSession) -> Result<(), DocmindError> {
        {
            let mut state = lock_state(&self.state);
            state.transcript = Some(Transcript {
                session_id: session.id.clone(),
                entries: Vec::new(),
            });
        }

        let messages = match self.gateway.list_messages(&session.id).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(session_id = session.id.as_str(), error = %e, "history load failed");
                self.notifier.notify(Notice::error("Error", e.to_string()));
                return Err(e);
            }
        };

        let mut state = lock_state(&self.state);
        if let Some(t) = state.transcript.as_mut()
            && t.session_id == session.id
        {
            t.entries = messages.into_iter().map(TranscriptEntry::Persisted).collect();
            info!(
                session_id = session.id.as_str(),
                count = t.entries.len(),
                "session history loaded"
            );
        }
        Ok(())
    }

    /// Drops the transcript entirely (no session remains selected).
    pub fn clear(&self) {
        let mut state = lock_state(&self.state);
        state.transcript = None;
    }

    /// Whether a send is in flight for the given session.
    pub fn is_sending(&self, session_id: &str) -> bool {
        lock_state(&self.state).in_flight.contains(session_id)
    }

    /// The current session id and its message sequence, as the UI should
    /// render it.
    pub fn snapshot(&self) -> Option<(String, Vec<TranscriptEntry>)> {
        let state = lock_state(&self.state);
        state
            .transcript
            .as_ref()
            .map(|t| (t.session_id.clone(), t.entries.clone()))
    }

    /// Replaces the pending entry carrying `token` with the authoritative
    /// row. Falls back to a plain append when the pending entry is gone
    /// (the user switched away and back mid-send).
    fn settle(&self, token: u64, message: ChatMessage) {
        let mut state = lock_state(&self.state);
        let Some(t) = state.transcript.as_mut() else {
            return;
        };
        if t.session_id != message.session_id {
            // Late completion for a session that is no longer displayed:
            // the store has the row, the foreign transcript stays untouched.
            return;
        }
        let pending_at = t.entries.iter().position(
            |entry| matches!(entry, TranscriptEntry::Pending { token: pending, .. } if *pending == token),
        );
        match pending_at {
            Some(index) => t.entries[index] = TranscriptEntry::Persisted(message),
            None => push_unique(&mut t.entries, message),
        }
    }

    /// Removes the pending entry carrying `token` after a failed persist.
    fn drop_pending(&self, token: u64) {
        let mut state = lock_state(&self.state);
        if let Some(t) = state.transcript.as_mut() {
            t.entries.retain(|entry| {
                !matches!(entry, TranscriptEntry::Pending { token: pending, .. } if *pending == token)
            });
        }
    }

    /// Appends a persisted row to the transcript it belongs to.
    fn append(&self, message: ChatMessage) {
        let mut state = lock_state(&self.state);
        if let Some(t) = state.transcript.as_mut()
            && t.session_id == message.session_id
        {
            push_unique(&mut t.entries, message);
        }
    }
}

/// Appends unless a row with the same id is already present (a history
/// load that raced a settling send may have brought it in).
fn push_unique(entries: &mut Vec<TranscriptEntry>, message: ChatMessage) {
    let already_present = entries
        .iter()
        .any(|entry| matches!(entry, TranscriptEntry::Persisted(m) if m.id == message.id));
    if !already_present {
        entries.push(TranscriptEntry::Persisted(message));
    }
}

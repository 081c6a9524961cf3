// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered session list and current-session pointer.
//!
//! The store mediates create/select/delete against the persistence
//! gateway and is the single owner of "which session is current". It does
//! not own message sequences; a `Switched` selection tells the caller to
//! reload the transcript via the orchestrator.

use docmind_core::{ChatSession, DocmindError, PersistenceGateway, DEFAULT_SESSION_TITLE};
use tracing::{info, warn};

/// Result of selecting a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The current session changed; the caller must load its history.
    Switched(ChatSession),
    /// The id was already current; nothing to do.
    Unchanged,
    /// No session with that id is in the list.
    NotFound,
}

/// Result of deleting a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    /// The deleted session was current. `replacement` is the
    /// next-most-recent remaining session (already made current), or
    /// `None` if the list is now empty.
    RemovedCurrent { replacement: Option<ChatSession> },
    /// A non-current session was removed; the current sequence is
    /// unaffected.
    Removed,
}

/// The user's chat sessions, newest first, plus the current pointer.
///
/// The acting user is explicit construction-time context; there is no
/// ambient identity.
pub struct SessionStore {
    user_id: String,
    sessions: Vec<ChatSession>,
    current: Option<String>,
}

impl SessionStore {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            sessions: Vec::new(),
            current: None,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The sessions as last fetched, newest first.
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn current(&self) -> Option<&ChatSession> {
        let id = self.current.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Re-fetches the session list. On failure the last-known list is
    /// kept rather than cleared, and the error is returned.
    pub async fn refresh(
        &mut self,
        gateway: &dyn PersistenceGateway,
    ) -> Result<(), DocmindError> {
        let sessions = match gateway.list_sessions(&self.user_id).await {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!(error = %e, "session list refresh failed, keeping last-known list");
                return Err(e);
            }
        };
        self.sessions = sessions;

        // Repair the pointer: keep it when still present, otherwise fall
        // back to the newest session (the store may have changed under us,
        // e.g. a delete from another device).
        let still_present = self
            .current
            .as_deref()
            .is_some_and(|id| self.sessions.iter().any(|s| s.id == id));
        if !still_present {
            self.current = self.sessions.first().map(|s| s.id.clone());
        }
        Ok(())
    }

    /// Creates an empty session with the default title, puts it at the
    /// head of the list, and makes it current.
    pub async fn create(
        &mut self,
        gateway: &dyn PersistenceGateway,
    ) -> Result<ChatSession, DocmindError> {
        let session = gateway
            .create_session(&self.user_id, DEFAULT_SESSION_TITLE)
            .await?;
        info!(session_id = session.id.as_str(), "session created");
        self.sessions.insert(0, session.clone());
        self.current = Some(session.id.clone());
        Ok(session)
    }

    /// Sets the current session. Selecting the already-current session is
    /// a no-op.
    pub fn select(&mut self, id: &str) -> Selection {
        if self.current.as_deref() == Some(id) {
            return Selection::Unchanged;
        }
        match self.sessions.iter().find(|s| s.id == id) {
            Some(session) => {
                let session = session.clone();
                self.current = Some(session.id.clone());
                Selection::Switched(session)
            }
            None => Selection::NotFound,
        }
    }

    /// Deletes a session from persistence first, then from the in-memory
    /// list. Does not guard against a send in flight for that session;
    /// the late completion writes to the store and nothing else.
    pub async fn delete(
        &mut self,
        gateway: &dyn PersistenceGateway,
        id: &str,
    ) -> Result<Deletion, DocmindError> {
        gateway.delete_session(id).await?;
        info!(session_id = id, "session deleted");

        let was_current = self.current.as_deref() == Some(id);
        self.sessions.retain(|s| s.id != id);

        if !was_current {
            return Ok(Deletion::Removed);
        }

        let replacement = self.sessions.first().cloned();
        self.current = replacement.as_ref().map(|s| s.id.clone());
        Ok(Deletion::RemovedCurrent { replacement })
    }
}

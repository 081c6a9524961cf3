// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation session orchestration for DocMind.
//!
//! This crate is the consistency core of the client: it keeps chat
//! sessions, their message histories, the active model selection, and the
//! document-upload side channel coherent across the persistence gateway
//! and the inference backend.
//!
//! The hard part lives in [`MessageOrchestrator`]: a per-session
//! `Idle`/`Sending` state machine that drives the three-step send protocol
//! (persist the user turn, request inference, persist the assistant turn)
//! with at most one send in flight per session and a transcript that is
//! updated optimistically and settled from authoritative store rows.
//!
//! [`SessionStore`] owns the ordered session list and the current-session
//! pointer; [`ModelRegistry`] projects the active model set and pins the
//! user's selection; [`UploadCoordinator`] runs document ingestion
//! concurrently with, but never reordering, message sends.

pub mod models;
pub mod orchestrator;
pub mod session_store;
pub mod upload;

pub use models::ModelRegistry;
pub use orchestrator::{
    IgnoreReason, MessageOrchestrator, SendOutcome, SendRequest, TranscriptEntry, FALLBACK_REPLY,
};
pub use session_store::{Deletion, Selection, SessionStore};
pub use upload::UploadCoordinator;

#[cfg(test)]
pub(crate) mod testing;

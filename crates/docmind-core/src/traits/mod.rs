// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for the DocMind conversation core.
//!
//! The core consumes these contracts; the `docmind-supabase` and
//! `docmind-backend` crates implement them, and `docmind-test-utils`
//! provides deterministic mocks. All async traits use `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod gateway;
pub mod inference;
pub mod notify;

pub use gateway::PersistenceGateway;
pub use inference::InferenceClient;
pub use notify::{NotificationSink, TracingNotifier};

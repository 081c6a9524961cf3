// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Supabase implementation of the DocMind persistence gateway.
//!
//! Talks PostgREST over HTTPS: `chat_sessions`, `chat_messages`, and
//! `ai_models` tables under `/rest/v1`, with filters and ordering
//! expressed as query parameters. Inserts ask for
//! `Prefer: return=representation` so the authoritative row (id and
//! timestamp) comes back from the insert itself.
//!
//! Nothing here retries: a failed store operation surfaces immediately
//! and the user re-drives it.

mod gateway;

pub use gateway::SupabaseGateway;

// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the DocMind inference backend.
//!
//! The backend exposes two operations over a network boundary:
//! `POST /chat` answers one chat turn given the query, session, user,
//! model name, and web-search flag; `POST /upload` ingests a PDF into the
//! user's knowledge context via multipart form data.
//!
//! The chat call carries no client-side timeout and is never retried: it
//! resolves when the backend answers or the transport fails, and the
//! orchestrator holds the session in `Sending` for exactly that long.

mod client;

pub use client::BackendClient;

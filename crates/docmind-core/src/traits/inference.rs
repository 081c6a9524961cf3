// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inference client trait for the remote chat and ingestion backend.

use async_trait::async_trait;

use crate::error::DocmindError;
use crate::types::{ChatReply, ChatTurn, UploadAck, UploadJob};

/// Contract over the remote service that answers chat turns and ingests
/// uploaded documents into a user's knowledge context.
///
/// Both operations cross a network boundary. Neither is retried by the
/// caller; a failure surfaces to the user, who re-drives the operation.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Answers one chat turn. The call has no client-side timeout: it
    /// resolves when the backend answers or the transport fails.
    async fn chat(&self, turn: &ChatTurn) -> Result<ChatReply, DocmindError>;

    /// Ingests an uploaded document. Once the backend acknowledges, the
    /// document becomes usable context for subsequent chat turns; that
    /// ingestion pipeline is outside this contract's visibility.
    async fn upload(&self, job: &UploadJob) -> Result<UploadAck, DocmindError>;
}

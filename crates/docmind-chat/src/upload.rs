// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document ingestion as a side channel next to message sends.
//!
//! An upload and a send may be concurrently in flight for the same
//! session; the coordinator deliberately ignores the orchestrator's
//! per-session flag. The two operations only meet through the shared
//! session identity: once the backend finishes ingesting, the document is
//! context for subsequent chat turns.

use std::sync::Arc;

use docmind_core::{
    DocmindError, InferenceClient, Notice, NotificationSink, UploadAck, UploadJob,
};
use tracing::{info, warn};

/// Drives one-shot document uploads. No partial-upload resume: a failed
/// upload is retried in full by the user.
pub struct UploadCoordinator {
    inference: Arc<dyn InferenceClient>,
    notifier: Arc<dyn NotificationSink>,
}

impl UploadCoordinator {
    pub fn new(inference: Arc<dyn InferenceClient>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            inference,
            notifier,
        }
    }

    /// Ingests one document. The job is checked against the backend's own
    /// admission rules first (PDF only, non-empty) so obviously doomed
    /// uploads never cross the network.
    pub async fn upload(&self, job: UploadJob) -> Result<UploadAck, DocmindError> {
        if !job.file_name.to_ascii_lowercase().ends_with(".pdf") {
            let err = DocmindError::upload("Only PDF files are supported.");
            self.notifier
                .notify(Notice::error("Upload Failed", err.to_string()));
            return Err(err);
        }
        if job.data.is_empty() {
            let err = DocmindError::upload(format!("{} is empty.", job.file_name));
            self.notifier
                .notify(Notice::error("Upload Failed", err.to_string()));
            return Err(err);
        }

        self.notifier.notify(Notice::info(
            "Uploading...",
            format!("Processing {}", job.file_name),
        ));
        info!(
            file = job.file_name.as_str(),
            bytes = job.data.len(),
            session_id = job.session_id.as_deref().unwrap_or("<none>"),
            "upload started"
        );

        match self.inference.upload(&job).await {
            Ok(ack) => {
                self.notifier
                    .notify(Notice::success("Success", ack.message.clone()));
                Ok(ack)
            }
            Err(e) => {
                warn!(file = job.file_name.as_str(), error = %e, "upload failed");
                self.notifier
                    .notify(Notice::error("Upload Failed", e.to_string()));
                Err(e)
            }
        }
    }
}

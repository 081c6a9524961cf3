// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request construction and error unwrapping for the backend API.

use async_trait::async_trait;
use docmind_config::model::BackendConfig;
use docmind_core::{ChatReply, ChatTurn, DocmindError, InferenceClient, UploadAck, UploadJob};
use reqwest::multipart;
use serde::Deserialize;
use tracing::debug;

/// FastAPI-style error body: `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: String,
}

/// HTTP client for the DocMind inference backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Creates a new backend client from the `[backend]` config section.
    pub fn new(config: &BackendConfig) -> Result<Self, DocmindError> {
        // No .timeout(): a chat turn may legitimately run long and the
        // state machine blocks in Sending until it resolves or fails.
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| DocmindError::Inference {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Extracts the backend-provided detail from a non-success response,
    /// falling back to the raw status and body.
    async fn detail_for(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(err) => err.detail,
            Err(_) => format!("backend returned {status}: {body}"),
        }
    }
}

#[async_trait]
impl InferenceClient for BackendClient {
    async fn chat(&self, turn: &ChatTurn) -> Result<ChatReply, DocmindError> {
        debug!(
            session_id = turn.session_id.as_str(),
            model = turn.model_name.as_str(),
            use_web = turn.use_web,
            "requesting chat turn"
        );

        let response = self
            .client
            .post(self.endpoint("/chat"))
            .json(turn)
            .send()
            .await
            .map_err(|e| DocmindError::Inference {
                message: format!("chat request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !response.status().is_success() {
            return Err(DocmindError::inference(Self::detail_for(response).await));
        }

        response.json().await.map_err(|e| DocmindError::Inference {
            message: format!("malformed chat response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    async fn upload(&self, job: &UploadJob) -> Result<UploadAck, DocmindError> {
        debug!(
            file = job.file_name.as_str(),
            bytes = job.data.len(),
            "uploading document"
        );

        let file_part = multipart::Part::bytes(job.data.clone())
            .file_name(job.file_name.clone())
            .mime_str("application/pdf")
            .map_err(|e| DocmindError::Upload {
                message: format!("invalid upload part: {e}"),
                source: Some(Box::new(e)),
            })?;

        let mut form = multipart::Form::new()
            .part("file", file_part)
            .text("user_id", job.user_id.clone());
        if let Some(session_id) = &job.session_id {
            form = form.text("session_id", session_id.clone());
        }

        let response = self
            .client
            .post(self.endpoint("/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| DocmindError::Upload {
                message: format!("upload request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !response.status().is_success() {
            return Err(DocmindError::upload(Self::detail_for(response).await));
        }

        response.json().await.map_err(|e| DocmindError::Upload {
            message: format!("malformed upload response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

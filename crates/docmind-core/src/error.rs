// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the DocMind conversation core.

use thiserror::Error;

/// The primary error type used across the DocMind collaborator traits and
/// core operations.
///
/// Precondition rejections (empty input, nothing selected, a send already
/// in flight) are deliberately *not* errors; see
/// `docmind_chat::SendOutcome`.
#[derive(Debug, Error)]
pub enum DocmindError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Persistence gateway errors (connectivity, constraint violation, malformed rows).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Inference backend errors (chat request failed at the transport or service level).
    #[error("inference error: {message}")]
    Inference {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Document ingestion errors. `message` carries the backend-provided
    /// detail when present, otherwise a generic transport description.
    #[error("upload error: {message}")]
    Upload {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DocmindError {
    /// Construct a gateway error from a message alone.
    pub fn gateway(message: impl Into<String>) -> Self {
        DocmindError::Gateway {
            message: message.into(),
            source: None,
        }
    }

    /// Construct an inference error from a message alone.
    pub fn inference(message: impl Into<String>) -> Self {
        DocmindError::Inference {
            message: message.into(),
            source: None,
        }
    }

    /// Construct an upload error from a message alone.
    pub fn upload(message: impl Into<String>) -> Self {
        DocmindError::Upload {
            message: message.into(),
            source: None,
        }
    }
}

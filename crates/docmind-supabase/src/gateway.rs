// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Supabase PostgREST API.
//!
//! Provides [`SupabaseGateway`] which handles request construction,
//! authentication headers, representation-returning inserts, and error
//! body unwrapping.

use async_trait::async_trait;
use docmind_config::model::SupabaseConfig;
use docmind_core::{
    ChatMessage, ChatModel, ChatSession, DocmindError, NewMessage, PersistenceGateway,
};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;

/// Table names in the Supabase project.
const SESSIONS_TABLE: &str = "chat_sessions";
const MESSAGES_TABLE: &str = "chat_messages";
const MODELS_TABLE: &str = "ai_models";

/// PostgREST error body shape.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
}

/// Supabase-backed persistence gateway.
///
/// Holds a pooled `reqwest` client with the `apikey` and bearer
/// authorization headers baked in at construction.
#[derive(Debug, Clone)]
pub struct SupabaseGateway {
    client: reqwest::Client,
    base_url: String,
}

impl SupabaseGateway {
    /// Creates a new gateway from the `[supabase]` config section.
    ///
    /// Fails with a config error if no service key is available.
    pub fn new(config: &SupabaseConfig) -> Result<Self, DocmindError> {
        let key = config.service_key.as_deref().ok_or_else(|| {
            DocmindError::Config(
                "supabase.service_key required (set via config or DOCMIND_SUPABASE_SERVICE_KEY)"
                    .to_string(),
            )
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(key).map_err(|e| {
                DocmindError::Config(format!("invalid supabase key header value: {e}"))
            })?,
        );
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                DocmindError::Config(format!("invalid supabase key header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DocmindError::Gateway {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// Maps a non-success response to a gateway error, unwrapping the
    /// PostgREST error body when it parses.
    async fn error_for(response: reqwest::Response) -> DocmindError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<PostgrestError>(&body) {
            Ok(err) => format!("store returned {status}: {}", err.message),
            Err(_) => format!("store returned {status}: {body}"),
        };
        DocmindError::gateway(message)
    }

    fn transport_error(e: reqwest::Error) -> DocmindError {
        DocmindError::Gateway {
            message: format!("store request failed: {e}"),
            source: Some(Box::new(e)),
        }
    }

    /// Issues a representation-returning insert and unwraps the single row.
    async fn insert_returning<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        body: serde_json::Value,
    ) -> Result<T, DocmindError> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("prefer", "return=representation")
            .json(&body)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let mut rows: Vec<T> = response.json().await.map_err(|e| DocmindError::Gateway {
            message: format!("malformed insert representation: {e}"),
            source: Some(Box::new(e)),
        })?;
        if rows.len() != 1 {
            return Err(DocmindError::gateway(format!(
                "insert into {table} returned {} rows, expected 1",
                rows.len()
            )));
        }
        Ok(rows.remove(0))
    }

    async fn select<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, DocmindError> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(query)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        response.json().await.map_err(|e| DocmindError::Gateway {
            message: format!("malformed {table} rows: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[async_trait]
impl PersistenceGateway for SupabaseGateway {
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>, DocmindError> {
        let sessions = self
            .select(
                SESSIONS_TABLE,
                &[
                    ("select", "*".to_string()),
                    ("user_id", format!("eq.{user_id}")),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await?;
        debug!(user_id, count = sessions.len(), "listed sessions");
        Ok(sessions)
    }

    async fn create_session(
        &self,
        user_id: &str,
        title: &str,
    ) -> Result<ChatSession, DocmindError> {
        let session: ChatSession = self
            .insert_returning(
                SESSIONS_TABLE,
                serde_json::json!([{ "user_id": user_id, "title": title }]),
            )
            .await?;
        debug!(session_id = session.id.as_str(), "created session");
        Ok(session)
    }

    async fn delete_session(&self, id: &str) -> Result<(), DocmindError> {
        let response = self
            .client
            .delete(self.table_url(SESSIONS_TABLE))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        // Deleting an absent id matches zero rows and still succeeds;
        // message rows go with the session via the store-level cascade.
        debug!(session_id = id, "deleted session");
        Ok(())
    }

    async fn list_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, DocmindError> {
        let messages = self
            .select(
                MESSAGES_TABLE,
                &[
                    ("select", "*".to_string()),
                    ("session_id", format!("eq.{session_id}")),
                    ("order", "created_at.asc".to_string()),
                ],
            )
            .await?;
        debug!(session_id, count = messages.len(), "listed messages");
        Ok(messages)
    }

    async fn insert_message(&self, message: &NewMessage) -> Result<ChatMessage, DocmindError> {
        let row: ChatMessage = self
            .insert_returning(
                MESSAGES_TABLE,
                serde_json::json!([{
                    "session_id": message.session_id,
                    "role": message.role,
                    "content": message.content,
                }]),
            )
            .await?;
        debug!(
            message_id = row.id.as_str(),
            session_id = row.session_id.as_str(),
            role = %row.role,
            "inserted message"
        );
        Ok(row)
    }

    async fn list_models(&self, active_only: bool) -> Result<Vec<ChatModel>, DocmindError> {
        let mut query = vec![("select", "*".to_string())];
        if active_only {
            query.push(("is_active", "eq.true".to_string()));
        }
        self.select(MODELS_TABLE, &query).await
    }
}

// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the DocMind client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level DocMind configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DocmindConfig {
    /// Client identity and logging settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Supabase persistence gateway settings.
    #[serde(default)]
    pub supabase: SupabaseConfig,

    /// Inference backend settings.
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Client identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// The user this client acts as. Passed explicitly into the session
    /// store and orchestrator; there is no ambient user context.
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            log_level: default_log_level(),
        }
    }
}

fn default_user_id() -> String {
    "local".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Supabase persistence gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SupabaseConfig {
    /// Base URL of the Supabase project (PostgREST lives under `/rest/v1`).
    #[serde(default = "default_supabase_url")]
    pub url: String,

    /// Service role key. `None` requires the `DOCMIND_SUPABASE_SERVICE_KEY`
    /// environment variable before the gateway can be constructed.
    #[serde(default)]
    pub service_key: Option<String>,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: default_supabase_url(),
            service_key: None,
        }
    }
}

fn default_supabase_url() -> String {
    // Supabase CLI local stack default.
    "http://localhost:54321".to_string()
}

/// Inference backend configuration.
///
/// The backend's network location is the only environment-level setting
/// the conversation core depends on; model API keys live server-side.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL of the DocMind inference service.
    #[serde(default = "default_backend_url")]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./docmind.toml` > `~/.config/docmind/docmind.toml` > `/etc/docmind/docmind.toml`
//! with environment variable overrides via `DOCMIND_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::DocmindConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/docmind/docmind.toml` (system-wide)
/// 3. `~/.config/docmind/docmind.toml` (user XDG config)
/// 4. `./docmind.toml` (local directory)
/// 5. `DOCMIND_*` environment variables
pub fn load_config() -> Result<DocmindConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DocmindConfig::default()))
        .merge(Toml::file("/etc/docmind/docmind.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("docmind/docmind.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("docmind.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<DocmindConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DocmindConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DocmindConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DocmindConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `DOCMIND_SUPABASE_SERVICE_KEY` must
/// map to `supabase.service_key`, not `supabase.service.key`.
fn env_provider() -> Env {
    Env::prefixed("DOCMIND_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: DOCMIND_SUPABASE_SERVICE_KEY -> "supabase_service_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("app_", "app.", 1)
            .replacen("supabase_", "supabase.", 1)
            .replacen("backend_", "backend.", 1);
        mapped.into()
    })
}

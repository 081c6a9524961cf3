// SPDX-FileCopyrightText: 2026 DocMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as plausible URLs and a non-empty user id.

use crate::diagnostic::ConfigError;
use crate::model::DocmindConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &DocmindConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.app.user_id.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "app.user_id must not be empty".to_string(),
        });
    }

    check_http_url(&mut errors, "supabase.url", &config.supabase.url);
    check_http_url(&mut errors, "backend.base_url", &config.backend.base_url);

    let level = config.app.log_level.trim();
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level must be one of trace, debug, info, warn, error; got `{level}`"
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(errors: &mut Vec<ConfigError>, key: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{key} must not be empty"),
        });
    } else if !value.starts_with("http://") && !value.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("{key} `{value}` must be an http(s) URL"),
        });
    }
}

// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::BiliConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &BiliConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.server.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "server.log_level `{}` is not one of {}",
                config.server.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let base_url = config.http.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "http.base_url must not be empty".to_string(),
        });
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("http.base_url `{base_url}` must start with http:// or https://"),
        });
    }

    for (key, value) in [
        ("http.timeout_secs", config.http.timeout_secs),
        ("http.page_timeout_secs", config.http.page_timeout_secs),
        ("http.reply_timeout_secs", config.http.reply_timeout_secs),
        ("wbi.key_ttl_secs", config.wbi.key_ttl_secs),
    ] {
        if value == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be greater than zero"),
            });
        }
    }

    if config.retry.max_attempts < 1 {
        errors.push(ConfigError::Validation {
            message: "retry.max_attempts must be at least 1".to_string(),
        });
    }

    if config.enrich.max_concurrent < 1 {
        errors.push(ConfigError::Validation {
            message: "enrich.max_concurrent must be at least 1".to_string(),
        });
    }

    if let Some(sessdata) = &config.credentials.sessdata
        && sessdata.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "credentials.sessdata must not be blank when set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

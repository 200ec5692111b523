// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for bilicomments.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Every section is optional and defaults to the values the platform
/// client was tuned against.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BiliConfig {
    /// Process-level settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Retry executor defaults.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Nested-reply enrichment settings.
    #[serde(default)]
    pub enrich: EnrichConfig,

    /// Request signing settings.
    #[serde(default)]
    pub wbi: WbiConfig,

    /// Fallback credentials.
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Platform API root. Overridden in tests.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Socket timeout for metadata lookups and the key lookup.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Socket timeout for top-level comment pages.
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,

    /// Socket timeout for nested-reply fetches.
    #[serde(default = "default_reply_timeout_secs")]
    pub reply_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            page_timeout_secs: default_page_timeout_secs(),
            reply_timeout_secs: default_reply_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.bilibili.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_page_timeout_secs() -> u64 {
    10
}

fn default_reply_timeout_secs() -> u64 {
    10
}

/// Retry executor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts per operation, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_delay_ms() -> u64 {
    1000
}

/// Nested-reply enrichment configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnrichConfig {
    /// Process-wide ceiling on in-flight nested-reply fetches.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
        }
    }
}

fn default_max_concurrent() -> usize {
    10
}

/// Request signing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WbiConfig {
    /// How long a fetched key pair stays valid, in seconds.
    #[serde(default = "default_key_ttl_secs")]
    pub key_ttl_secs: u64,
}

impl Default for WbiConfig {
    fn default() -> Self {
        Self {
            key_ttl_secs: default_key_ttl_secs(),
        }
    }
}

fn default_key_ttl_secs() -> u64 {
    12 * 60 * 60
}

/// Fallback credentials, used when neither the tool argument nor
/// `BILIBILI_SESSDATA` provides one.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub sessdata: Option<String>,
}

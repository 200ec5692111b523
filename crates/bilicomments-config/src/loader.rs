// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./bilicomments.toml` > `~/.config/bilicomments/bilicomments.toml`
//! > `/etc/bilicomments/bilicomments.toml`, with `BILICOMMENTS_` environment
//! overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::BiliConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/bilicomments/bilicomments.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "bilicomments.toml";

/// Per-user config file under the XDG config directory, if one exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bilicomments").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/bilicomments/bilicomments.toml`
/// 3. `~/.config/bilicomments/bilicomments.toml`
/// 4. `./bilicomments.toml`
/// 5. `BILICOMMENTS_*` environment variables
pub fn load_config() -> Result<BiliConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<BiliConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BiliConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BiliConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BiliConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for the standard hierarchy, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BiliConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider mapping `BILICOMMENTS_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys such as
/// `max_attempts` contain underscores themselves. Figment passes the key in
/// its original case, so it is lowercased before the section is split off.
fn env_provider() -> Env {
    Env::prefixed("BILICOMMENTS_").map(|key| {
        let mapped = key
            .as_str()
            .to_ascii_lowercase()
            .replacen("server_", "server.", 1)
            .replacen("http_", "http.", 1)
            .replacen("retry_", "retry.", 1)
            .replacen("enrich_", "enrich.", 1)
            .replacen("wbi_", "wbi.", 1)
            .replacen("credentials_", "credentials.", 1);
        mapped.into()
    })
}

// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the configuration system.

use bilicomments_config::diagnostic::ConfigError;
use bilicomments_config::model::BiliConfig;
use bilicomments_config::{load_and_validate_str, load_config, load_config_from_str};

/// Valid TOML with every section deserializes.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[server]
log_level = "debug"

[http]
base_url = "http://127.0.0.1:9000"
timeout_secs = 20
page_timeout_secs = 8
reply_timeout_secs = 5

[retry]
max_attempts = 5
delay_ms = 250

[enrich]
max_concurrent = 4

[wbi]
key_ttl_secs = 600

[credentials]
sessdata = "abc123"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.http.base_url, "http://127.0.0.1:9000");
    assert_eq!(config.http.timeout_secs, 20);
    assert_eq!(config.http.page_timeout_secs, 8);
    assert_eq!(config.http.reply_timeout_secs, 5);
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.delay_ms, 250);
    assert_eq!(config.enrich.max_concurrent, 4);
    assert_eq!(config.wbi.key_ttl_secs, 600);
    assert_eq!(config.credentials.sessdata.as_deref(), Some("abc123"));
}

/// An empty document yields the compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").unwrap();
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.delay_ms, 1000);
    assert_eq!(config.enrich.max_concurrent, 10);
    assert_eq!(config.wbi.key_ttl_secs, 43_200);
    assert_eq!(config.http.base_url, "https://api.bilibili.com");
    assert!(config.credentials.sessdata.is_none());
}

#[test]
fn unknown_field_is_rejected() {
    let toml = r#"
[retry]
max_atempts = 2
"#;
    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = err.to_string();
    assert!(
        err_str.contains("unknown field") || err_str.contains("max_atempts"),
        "got: {err_str}"
    );
}

#[test]
fn unknown_field_produces_suggestion() {
    let toml = r#"
[retry]
max_atempts = 2
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey { suggestion, .. } => suggestion.clone(),
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("max_attempts"));
}

#[test]
fn wrong_type_produces_invalid_type() {
    let toml = r#"
[enrich]
max_concurrent = "ten"
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("max_concurrent"))),
        "got: {errors:?}"
    );
}

#[test]
fn semantic_validation_runs_after_parse() {
    let toml = r#"
[retry]
max_attempts = 0
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("max_attempts"))));
}

#[test]
fn local_file_and_env_override_are_layered() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "bilicomments.toml",
            r#"
[retry]
max_attempts = 4
delay_ms = 10
"#,
        )?;
        jail.set_env("BILICOMMENTS_RETRY_MAX_ATTEMPTS", "6");
        jail.set_env("BILICOMMENTS_ENRICH_MAX_CONCURRENT", "2");

        let config: BiliConfig = load_config()?;
        assert_eq!(config.retry.max_attempts, 6);
        assert_eq!(config.retry.delay_ms, 10);
        assert_eq!(config.enrich.max_concurrent, 2);
        Ok(())
    });
}

#[test]
fn env_overrides_reach_every_section() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("BILICOMMENTS_SERVER_LOG_LEVEL", "debug");
        jail.set_env("BILICOMMENTS_HTTP_REPLY_TIMEOUT_SECS", "4");
        jail.set_env("BILICOMMENTS_WBI_KEY_TTL_SECS", "60");
        jail.set_env("BILICOMMENTS_CREDENTIALS_SESSDATA", "from-env");

        let config: BiliConfig = load_config()?;
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.http.reply_timeout_secs, 4);
        assert_eq!(config.wbi.key_ttl_secs, 60);
        assert_eq!(config.credentials.sessdata.as_deref(), Some("from-env"));
        Ok(())
    });
}

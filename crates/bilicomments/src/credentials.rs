// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cookie resolution and identifier checks for the tool front-end.

/// Environment variable holding a bare SESSDATA value.
pub const SESSDATA_ENV_VAR: &str = "BILIBILI_SESSDATA";

/// Minimum length of a dynamic id.
const MIN_DYNAMIC_ID_LEN: usize = 10;

/// Whether `cookie` looks usable: non-empty and carrying `SESSDATA`.
pub fn validate_cookie(cookie: &str) -> bool {
    !cookie.is_empty() && cookie.contains("SESSDATA")
}

pub fn cookie_from_sessdata(sessdata: &str) -> String {
    format!("SESSDATA={sessdata}")
}

/// Picks the cookie for one call.
///
/// Priority:
/// 1. The explicit `cookie` argument, if it validates
/// 2. `BILIBILI_SESSDATA` from the environment, trimmed
/// 3. `credentials.sessdata` from the config file
///
/// Returns `None` when no source yields a cookie.
pub fn resolve_cookie(param: Option<&str>, configured: Option<&str>) -> Option<String> {
    let from_env = std::env::var(SESSDATA_ENV_VAR).ok();
    resolve_cookie_from(param, from_env.as_deref(), configured)
}

fn resolve_cookie_from(
    param: Option<&str>,
    from_env: Option<&str>,
    configured: Option<&str>,
) -> Option<String> {
    if let Some(cookie) = param
        && validate_cookie(cookie)
    {
        return Some(cookie.to_string());
    }

    [from_env, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|sessdata| !sessdata.is_empty())
        .map(cookie_from_sessdata)
}

/// Whether a session value is available without a per-call argument.
pub fn has_ambient_sessdata(configured: Option<&str>) -> bool {
    resolve_cookie(None, configured).is_some()
}

/// Dynamic ids are long all-digit strings.
pub fn validate_dynamic_id(id: &str) -> bool {
    id.len() >= MIN_DYNAMIC_ID_LEN && id.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn cookie_must_carry_sessdata() {
        assert!(validate_cookie("SESSDATA=abc; bili_jct=def"));
        assert!(!validate_cookie(""));
        assert!(!validate_cookie("buvid3=xyz"));
    }

    #[test]
    fn sessdata_is_wrapped() {
        assert_eq!(cookie_from_sessdata("abc"), "SESSDATA=abc");
    }

    #[test]
    fn explicit_argument_wins() {
        assert_eq!(
            resolve_cookie_from(Some("SESSDATA=arg"), Some("env"), Some("cfg")).as_deref(),
            Some("SESSDATA=arg")
        );
    }

    #[test]
    fn invalid_argument_falls_back_to_env() {
        assert_eq!(
            resolve_cookie_from(Some("buvid3=x"), Some("  env-value  "), Some("cfg")).as_deref(),
            Some("SESSDATA=env-value")
        );
    }

    #[test]
    fn blank_env_falls_back_to_config() {
        assert_eq!(
            resolve_cookie_from(None, Some("   "), Some("cfg")).as_deref(),
            Some("SESSDATA=cfg")
        );
    }

    #[test]
    fn nothing_resolves_to_none() {
        assert_eq!(resolve_cookie_from(None, None, None), None);
        assert_eq!(resolve_cookie_from(Some(""), Some(""), Some("")), None);
    }

    #[test]
    #[serial]
    fn reads_sessdata_from_environment() {
        // SAFETY: test-only env mutation, serialized with #[serial].
        unsafe { std::env::set_var(SESSDATA_ENV_VAR, "from-env") };
        let cookie = resolve_cookie(None, Some("cfg"));
        unsafe { std::env::remove_var(SESSDATA_ENV_VAR) };

        assert_eq!(cookie.as_deref(), Some("SESSDATA=from-env"));
    }

    #[test]
    #[serial]
    fn missing_environment_uses_config() {
        unsafe { std::env::remove_var(SESSDATA_ENV_VAR) };
        assert!(has_ambient_sessdata(Some("cfg")));
        assert!(!has_ambient_sessdata(None));
    }

    #[test]
    fn dynamic_id_format() {
        assert!(validate_dynamic_id("900000000000000001"));
        assert!(validate_dynamic_id("1234567890"));
        assert!(!validate_dynamic_id("123456789"));
        assert!(!validate_dynamic_id("12345abcde12"));
        assert!(!validate_dynamic_id(""));
    }
}

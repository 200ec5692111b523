// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WBI request signing.
//!
//! Signed endpoints require two extra query parameters: `wts`, the current
//! unix time in seconds, and `w_rid`, an MD5 digest over the sorted,
//! encoded parameters followed by a mixin key. The mixin key is derived from
//! two fragments served by the navigation endpoint and is cached for 12
//! hours.

pub mod cache;
pub mod mixin;
pub mod sign;

pub use cache::{KeyCache, KeySource, DEFAULT_KEY_TTL};
pub use mixin::{key_from_url, MixinKey, WbiKeys, MIXIN_KEY_ENC_TAB};
pub use sign::{encode_query, sign, Params, SignedRequest};

use bilicomments_core::BiliError;

/// Signs `params` with the cached mixin key at the current time.
///
/// Key lookup failures propagate unchanged; whatever retry wraps the
/// caller decides what happens next.
pub async fn sign_params<S>(
    cache: &KeyCache,
    source: &S,
    credential: &str,
    params: &Params,
) -> Result<SignedRequest, BiliError>
where
    S: KeySource + ?Sized,
{
    let mixin = cache.mixin_key(source, credential).await?;
    Ok(sign(params, &mixin, chrono::Utc::now().timestamp()))
}

// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-request signature computation.
//!
//! Given the same parameters, mixin key and second-resolution timestamp,
//! [`sign`] always produces the same `w_rid`.

use std::collections::BTreeMap;

use md5::{Digest, Md5};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::mixin::MixinKey;

/// Request parameters. `BTreeMap` keeps keys in byte order, which is the
/// order the platform signs them in.
pub type Params = BTreeMap<String, String>;

/// Characters left unescaped by a URI component encoder.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Characters removed from values before digesting.
const STRIPPED: &[char] = &['!', '\'', '(', ')', '*'];

/// Parameters with `wts` and `w_rid` injected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    params: Params,
    wts: i64,
    w_rid: String,
}

impl SignedRequest {
    pub fn wts(&self) -> i64 {
        self.wts
    }

    pub fn w_rid(&self) -> &str {
        &self.w_rid
    }

    /// All parameters, including `wts` and `w_rid`.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Query string to send, with the caller's original values.
    pub fn query_string(&self) -> String {
        encode_query(&self.params)
    }
}

/// Encodes parameters as `key=value` pairs joined with `&`, in key order.
pub fn encode_query(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Signs `params` at unix time `wts`.
pub fn sign(params: &Params, mixin_key: &MixinKey, wts: i64) -> SignedRequest {
    let mut params = params.clone();
    params.insert("wts".to_string(), wts.to_string());

    let query = params
        .iter()
        .map(|(k, v)| {
            let v: String = v.chars().filter(|c| !STRIPPED.contains(c)).collect();
            format!("{}={}", encode_component(k), encode_component(&v))
        })
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Md5::new();
    hasher.update(query.as_bytes());
    hasher.update(mixin_key.as_str().as_bytes());
    let w_rid = hex::encode(hasher.finalize());

    params.insert("w_rid".to_string(), w_rid.clone());
    SignedRequest { params, wts, w_rid }
}

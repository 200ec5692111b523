// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Bilibili web API.
//!
//! Provides [`BiliClient`], which owns the connection pool, the signing key
//! cache and the reply pool for the whole process. Comment endpoints are
//! signed; metadata lookups are not. Every call runs under the retry
//! executor; only nested-reply fetches soft-fail.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bilicomments_config::BiliConfig;
use bilicomments_core::{BiliError, CommentPage, Replies, Reply, SortMode};
use bilicomments_resilience::{retry, retry_soft, Outcome, RetryPolicy};
use bilicomments_wbi::{encode_query, sign_params, KeyCache, KeySource, Params, WbiKeys};
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::aggregate::{aggregate, paginate};
use crate::enrich::{without_replies, ReplyPool};
use crate::types::{
    DynamicInfo, Envelope, NavData, RawDynamicDetail, RawPage, RawReplyPage, VideoInfo,
    VIDEO_COMMENT_TYPE,
};

const NAV_PATH: &str = "/x/web-interface/nav";
const VIEW_PATH: &str = "/x/web-interface/view";
const REPLY_PATH: &str = "/x/v2/reply";
const REPLY_REPLY_PATH: &str = "/x/v2/reply/reply";
const DYNAMIC_DETAIL_PATH: &str = "/x/polymer/web-dynamic/v1/detail";

/// Platform ceiling for one top-level page.
pub const MAX_PAGE_SIZE: u64 = 49;

/// Platform ceiling for one nested-reply page.
pub const MAX_REPLY_PAGE_SIZE: u64 = 10;

const ACCEPT: &str = "application/json, text/plain, */*";
const ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8";
const ORIGIN: &str = "https://www.bilibili.com";

/// What a comment thread is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Video,
    Dynamic,
}

/// Object whose comments are fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentTarget {
    pub kind: TargetKind,
    /// Object id (`oid`) the comment endpoints expect.
    pub oid: String,
    pub comment_type: i64,
}

impl CommentTarget {
    pub fn video(aid: u64) -> Self {
        Self {
            kind: TargetKind::Video,
            oid: aid.to_string(),
            comment_type: VIDEO_COMMENT_TYPE,
        }
    }

    pub fn dynamic(info: &DynamicInfo) -> Self {
        Self {
            kind: TargetKind::Dynamic,
            oid: info.oid.clone(),
            comment_type: info.comment_type,
        }
    }

    fn page_label(&self) -> &'static str {
        match self.kind {
            TargetKind::Video => "fetching comments failed",
            TargetKind::Dynamic => "fetching dynamic comments failed",
        }
    }
}

/// One page request, already validated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
    /// Omitted from the query when `None`.
    pub sort: Option<SortMode>,
    pub include_replies: bool,
}

/// HTTP client for Bilibili API communication.
///
/// Cheap to clone; clones share the connection pool, the key cache and the
/// reply pool.
#[derive(Clone)]
pub struct BiliClient {
    http: reqwest::Client,
    base_url: String,
    keys: Arc<KeyCache>,
    pool: ReplyPool,
    retry: RetryPolicy,
    timeout: Duration,
    page_timeout: Duration,
    reply_timeout: Duration,
}

impl BiliClient {
    /// Creates a client from the loaded configuration.
    pub fn new(config: &BiliConfig) -> Result<Self, BiliError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(&config.http.user_agent)
                .map_err(|e| BiliError::Config(format!("invalid user agent header value: {e}")))?,
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );
        headers.insert(header::ORIGIN, HeaderValue::from_static(ORIGIN));

        let timeout = Duration::from_secs(config.http.timeout_secs);
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| BiliError::Config(format!("failed to build HTTP client: {e}")))?;

        let retry = RetryPolicy::new("request failed")
            .with_max_attempts(config.retry.max_attempts)
            .with_delay(Duration::from_millis(config.retry.delay_ms));

        Ok(Self {
            http,
            base_url: config.http.base_url.trim_end_matches('/').to_string(),
            keys: Arc::new(KeyCache::new(Duration::from_secs(config.wbi.key_ttl_secs))),
            pool: ReplyPool::new(config.enrich.max_concurrent),
            retry,
            timeout,
            page_timeout: Duration::from_secs(config.http.page_timeout_secs),
            reply_timeout: Duration::from_secs(config.http.reply_timeout_secs),
        })
    }

    /// Returns the shared reply pool.
    pub fn pool(&self) -> &ReplyPool {
        &self.pool
    }

    /// Resolves a `BV` id to the video's numeric id and title.
    pub async fn get_video_info(&self, bvid: &str, cookie: &str) -> Result<VideoInfo, BiliError> {
        let query = encode_query(&Params::from([("bvid".to_string(), bvid.to_string())]));
        let referer = format!("https://www.bilibili.com/video/{bvid}");
        let policy = self.policy("fetching video info failed");

        let envelope: Envelope<VideoInfo> = retry(&policy, || {
            self.get_envelope(VIEW_PATH, &query, cookie, Some(referer.as_str()), self.timeout)
        })
        .await?;
        envelope.into_data()
    }

    /// Resolves a dynamic to the comment target the reply endpoints expect.
    pub async fn get_dynamic_detail(
        &self,
        dynamic_id: &str,
        cookie: &str,
    ) -> Result<DynamicInfo, BiliError> {
        let query = encode_query(&Params::from([("id".to_string(), dynamic_id.to_string())]));
        let referer = format!("https://t.bilibili.com/{dynamic_id}");
        let policy = self.policy("fetching dynamic detail failed");

        let envelope: Envelope<RawDynamicDetail> = retry(&policy, || {
            self.get_envelope(DYNAMIC_DETAIL_PATH, &query, cookie, Some(referer.as_str()), self.timeout)
        })
        .await?;
        let info = DynamicInfo::from_detail(dynamic_id, envelope.into_data()?);
        debug!(
            dynamic_id,
            oid = %info.oid,
            comment_type = info.comment_type,
            "dynamic resolved"
        );
        Ok(info)
    }

    /// Fetches one signed top-level page and returns the raw envelope.
    ///
    /// Transport failures are retried and then raised. A non-zero envelope
    /// code is not retried; the caller decides how to report it.
    pub async fn fetch_comments(
        &self,
        target: &CommentTarget,
        page: u64,
        page_size: u64,
        sort: Option<SortMode>,
        cookie: &str,
    ) -> Result<Envelope<RawPage>, BiliError> {
        let mut params = Params::new();
        params.insert("type".into(), target.comment_type.to_string());
        params.insert("oid".into(), target.oid.clone());
        params.insert("pn".into(), page.to_string());
        params.insert("ps".into(), page_size.min(MAX_PAGE_SIZE).to_string());
        if let Some(sort) = sort {
            params.insert("sort".into(), sort.as_param().to_string());
        }

        let policy = self.policy(target.page_label());
        retry(&policy, || async {
            let query = self.signed_query(&params, cookie).await?;
            self.get_envelope(REPLY_PATH, &query, cookie, None, self.page_timeout)
                .await
        })
        .await
    }

    /// Fetches the first nested replies under `root`.
    ///
    /// A non-zero code or a missing list reads as no replies. Exhausted
    /// transport retries yield [`Replies::FetchFailed`], never an error.
    pub async fn fetch_replies(&self, target: &CommentTarget, root: u64, cookie: &str) -> Replies {
        let mut params = Params::new();
        params.insert("type".into(), target.comment_type.to_string());
        params.insert("oid".into(), target.oid.clone());
        params.insert("root".into(), root.to_string());
        params.insert("ps".into(), MAX_REPLY_PAGE_SIZE.to_string());

        let policy = self.policy(format!("fetching replies failed (rpid: {root})"));
        let outcome = retry_soft(&policy, || async {
            let query = self.signed_query(&params, cookie).await?;
            let envelope: Envelope<RawReplyPage> = self
                .get_envelope(REPLY_REPLY_PATH, &query, cookie, None, self.reply_timeout)
                .await?;
            Ok::<_, BiliError>(replies_from(envelope))
        })
        .await;

        match outcome {
            Outcome::Done(replies) => Replies::Fetched(replies),
            Outcome::FetchFailed => Replies::FetchFailed,
        }
    }

    /// Fetches one page, derives its metadata and enriches it.
    pub async fn load_page(
        &self,
        target: &CommentTarget,
        request: &PageRequest,
        cookie: &str,
    ) -> Result<CommentPage, BiliError> {
        let raw = self
            .fetch_comments(target, request.page, request.page_size, request.sort, cookie)
            .await?
            .into_data()?;

        let meta = paginate(&raw);
        let comments = aggregate(&raw);
        info!(
            oid = %target.oid,
            page = meta.current_page,
            total_pages = meta.total_pages,
            comments = comments.len(),
            "comment page fetched"
        );

        let comments = if request.include_replies {
            self.pool
                .enrich(comments, |comment| {
                    let root = comment.id;
                    async move { self.fetch_replies(target, root, cookie).await }
                })
                .await
        } else {
            without_replies(comments)
        };

        Ok(CommentPage { meta, comments })
    }

    /// Drops the cached signing key.
    pub async fn clear_signing_keys(&self) {
        self.keys.clear().await;
    }

    fn policy(&self, label: impl Into<String>) -> RetryPolicy {
        let mut policy = self.retry.clone();
        policy.label = label.into();
        policy
    }

    async fn signed_query(&self, params: &Params, cookie: &str) -> Result<String, BiliError> {
        let signed = sign_params(&self.keys, self, cookie, params).await?;
        Ok(signed.query_string())
    }

    /// Issues one GET and decodes the envelope. Not retried here.
    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
        cookie: &str,
        referer: Option<&str>,
        timeout: Duration,
    ) -> Result<Envelope<T>, BiliError> {
        let url = if query.is_empty() {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}{path}?{query}", self.base_url)
        };

        let mut request = self
            .http
            .get(&url)
            .header(header::COOKIE, cookie)
            .timeout(timeout);
        if let Some(referer) = referer {
            request = request.header(header::REFERER, referer);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        debug!(path, status = %status, "response received");

        if !status.is_success() {
            return Err(BiliError::Network {
                message: format!("API returned {status}"),
                timed_out: false,
                source: None,
            });
        }

        let body = response.text().await.map_err(transport_error)?;
        serde_json::from_str(&body).map_err(|e| BiliError::Decode(format!("{path}: {e}")))
    }
}

#[async_trait]
impl KeySource for BiliClient {
    async fn fetch_keys(&self, credential: &str) -> Result<WbiKeys, BiliError> {
        let envelope: Envelope<NavData> = self
            .get_envelope(NAV_PATH, "", credential, None, self.timeout)
            .await?;

        if envelope.code != 0 {
            return Err(BiliError::Signing(format!(
                "key lookup failed ({}): {}",
                envelope.code, envelope.message
            )));
        }
        let img = envelope
            .data
            .and_then(|nav| nav.wbi_img)
            .ok_or_else(|| BiliError::Signing("key lookup returned no key urls".into()))?;
        WbiKeys::from_urls(&img.img_url, &img.sub_url)
    }
}

fn replies_from(envelope: Envelope<RawReplyPage>) -> Vec<Reply> {
    if envelope.code != 0 {
        debug!(code = envelope.code, "reply lookup returned non-zero code");
        return Vec::new();
    }
    envelope
        .data
        .and_then(|page| page.replies)
        .map(|replies| replies.iter().map(Reply::from).collect())
        .unwrap_or_default()
}

fn transport_error(e: reqwest::Error) -> BiliError {
    let timed_out = e.is_timeout();
    BiliError::network(format!("HTTP request failed: {e}"), timed_out, e)
}

// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Comment tools: argument schemas, validation and execution.
//!
//! Every argument is checked before the first network call. Execution
//! returns the rendered page; the MCP layer turns an error into a readable
//! failure text instead of a protocol error.

use std::str::FromStr;

use bilicomments_client::{BiliClient, CommentTarget, PageRequest};
use bilicomments_core::{BiliError, CommentPage, OutputFormat, SortMode};
use bilicomments_render::{render_json, render_markdown, Subject};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info};

use crate::credentials::{resolve_cookie, validate_dynamic_id};

/// Largest page size a caller may request.
pub const MAX_TOOL_PAGE_SIZE: i64 = 20;

/// Message used when a dynamic's comment page reports code -404.
const DYNAMIC_NOT_FOUND: &str = "the dynamic does not exist or has been deleted; check that the dynamic_id is correct";

pub const VIDEO_FAILURE_PREFIX: &str = "Failed to fetch comments";
pub const DYNAMIC_FAILURE_PREFIX: &str = "Failed to fetch dynamic comments";

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    MAX_TOOL_PAGE_SIZE
}

fn default_true() -> bool {
    true
}

fn default_output_format() -> String {
    OutputFormat::Markdown.to_string()
}

/// Numeric video id, as a number or a string with an optional `av` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum VideoAid {
    Number(u64),
    Text(String),
}

impl VideoAid {
    fn parse(&self) -> Result<u64, BiliError> {
        match self {
            Self::Number(aid) => Ok(*aid),
            Self::Text(text) => {
                let trimmed = text.trim();
                let digits = trimmed
                    .strip_prefix("av")
                    .or_else(|| trimmed.strip_prefix("AV"))
                    .unwrap_or(trimmed);
                digits.parse().map_err(|_| {
                    BiliError::InvalidInput(format!("invalid aid `{text}`: expected a numeric video id"))
                })
            }
        }
    }
}

/// Arguments of `get_video_comments`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoCommentsArgs {
    /// Video BV id. Provide this or `aid`.
    #[serde(default)]
    pub bvid: Option<String>,
    /// Numeric video id, optionally prefixed with `av`. Provide this or `bvid`.
    #[serde(default)]
    pub aid: Option<VideoAid>,
    /// Page number, starting at 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Comments per page, 1-20.
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    /// Sort order: 0 by time, 1 by popularity.
    #[serde(default)]
    pub sort: i64,
    /// Fetch nested replies for each comment.
    #[serde(default = "default_true")]
    pub include_replies: bool,
    /// Output format: `markdown` or `json`.
    #[serde(default = "default_output_format")]
    pub output_format: String,
    /// Bilibili cookie containing SESSDATA. Optional when the server has one configured.
    #[serde(default)]
    pub cookie: Option<String>,
}

/// Arguments of `get_dynamic_comments`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DynamicCommentsArgs {
    /// Dynamic id, a long numeric string.
    #[serde(rename = "dynamic_id")]
    pub dynamic_id: String,
    /// Page number, starting at 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Comments per page, 1-20.
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    /// Fetch nested replies for each comment.
    #[serde(default = "default_true")]
    pub include_replies: bool,
    /// Output format: `markdown` or `json`.
    #[serde(default = "default_output_format")]
    pub output_format: String,
    /// Bilibili cookie containing SESSDATA. Optional when the server has one configured.
    #[serde(default)]
    pub cookie: Option<String>,
}

enum VideoRef {
    Aid(u64),
    Bvid(String),
}

/// Executes the comment tools against one shared client.
#[derive(Clone)]
pub struct CommentTools {
    client: BiliClient,
    configured_sessdata: Option<String>,
}

impl CommentTools {
    pub fn new(client: BiliClient, configured_sessdata: Option<String>) -> Self {
        Self {
            client,
            configured_sessdata,
        }
    }

    /// Fetches and renders one page of video comments.
    pub async fn video_comments(&self, args: VideoCommentsArgs) -> Result<String, BiliError> {
        let cookie = self.cookie(args.cookie.as_deref())?;

        let bvid = args
            .bvid
            .as_deref()
            .map(str::trim)
            .filter(|bvid| !bvid.is_empty());
        let video = match (&args.aid, bvid) {
            (Some(aid), _) => VideoRef::Aid(aid.parse()?),
            (None, Some(bvid)) => VideoRef::Bvid(bvid.to_string()),
            (None, None) => {
                return Err(BiliError::InvalidInput(
                    "one of `bvid` or `aid` is required".into(),
                ));
            }
        };
        let page_size = validate_page_size(args.page_size)?;
        let page = validate_page(args.page)?;
        let sort = SortMode::from_param(args.sort)
            .ok_or_else(|| BiliError::InvalidInput("`sort` must be 0 or 1".into()))?;
        let format = parse_output_format(&args.output_format)?;

        let aid = match video {
            VideoRef::Aid(aid) => aid,
            VideoRef::Bvid(bvid) => {
                let info = self.client.get_video_info(&bvid, &cookie).await?;
                debug!(bvid = %bvid, aid = info.aid, title = %info.title, "video resolved");
                info.aid
            }
        };

        let request = PageRequest {
            page,
            page_size,
            sort: Some(sort),
            include_replies: args.include_replies,
        };
        let loaded = self
            .client
            .load_page(&CommentTarget::video(aid), &request, &cookie)
            .await?;
        info!(aid, page, comments = loaded.comments.len(), "video comments served");

        render(&loaded, format, Subject::Video)
    }

    /// Fetches and renders one page of dynamic comments.
    pub async fn dynamic_comments(&self, args: DynamicCommentsArgs) -> Result<String, BiliError> {
        let cookie = self.cookie(args.cookie.as_deref())?;

        let dynamic_id = args.dynamic_id.trim();
        if dynamic_id.is_empty() {
            return Err(BiliError::InvalidInput("`dynamic_id` is required".into()));
        }
        if !validate_dynamic_id(dynamic_id) {
            return Err(BiliError::InvalidInput(format!(
                "invalid dynamic_id `{dynamic_id}`: expected a long numeric id"
            )));
        }
        let page_size = validate_page_size(args.page_size)?;
        let page = validate_page(args.page)?;
        let format = parse_output_format(&args.output_format)?;

        let detail = self.client.get_dynamic_detail(dynamic_id, &cookie).await?;
        let request = PageRequest {
            page,
            page_size,
            sort: None,
            include_replies: args.include_replies,
        };
        let loaded = self
            .client
            .load_page(&CommentTarget::dynamic(&detail), &request, &cookie)
            .await
            .map_err(dynamic_not_found)?;
        info!(
            dynamic_id,
            page,
            comments = loaded.comments.len(),
            "dynamic comments served"
        );

        render(
            &loaded,
            format,
            Subject::Dynamic {
                type_label: &detail.type_label,
            },
        )
    }

    fn cookie(&self, param: Option<&str>) -> Result<String, BiliError> {
        resolve_cookie(param, self.configured_sessdata.as_deref()).ok_or_else(|| {
            BiliError::InvalidInput(
                "a valid Bilibili cookie is required; pass `cookie` or set BILIBILI_SESSDATA"
                    .into(),
            )
        })
    }
}

/// Text shown to the caller when a tool call fails.
pub fn failure_text(prefix: &str, err: &BiliError) -> String {
    format!("❌ {prefix}: {err}")
}

fn validate_page_size(page_size: i64) -> Result<u64, BiliError> {
    if !(1..=MAX_TOOL_PAGE_SIZE).contains(&page_size) {
        return Err(BiliError::InvalidInput(format!(
            "`pageSize` must be between 1 and {MAX_TOOL_PAGE_SIZE}"
        )));
    }
    Ok(page_size.unsigned_abs())
}

fn validate_page(page: i64) -> Result<u64, BiliError> {
    if page < 1 {
        return Err(BiliError::InvalidInput(
            "`page` must be greater than or equal to 1".into(),
        ));
    }
    Ok(page.unsigned_abs())
}

fn parse_output_format(value: &str) -> Result<OutputFormat, BiliError> {
    OutputFormat::from_str(value).map_err(|_| {
        BiliError::InvalidInput("`outputFormat` must be `markdown` or `json`".into())
    })
}

fn dynamic_not_found(err: BiliError) -> BiliError {
    match err {
        BiliError::Api { code: -404, .. } => BiliError::Api {
            code: -404,
            message: DYNAMIC_NOT_FOUND.into(),
        },
        other => other,
    }
}

fn render(page: &CommentPage, format: OutputFormat, subject: Subject<'_>) -> Result<String, BiliError> {
    match format {
        OutputFormat::Markdown => Ok(render_markdown(page, subject)),
        OutputFormat::Json => render_json(page),
    }
}

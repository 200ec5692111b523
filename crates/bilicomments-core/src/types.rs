// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Comment data model shared between the fetch client and the renderers.
//!
//! Everything here is a value object built per request from a remote
//! payload. Nothing outlives the request that produced it.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Author of a comment or reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub level: u32,
    pub sex: String,
}

/// A top-level comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Platform comment id (`rpid`).
    pub id: u64,
    pub author: Author,
    pub body: String,
    pub like_count: u64,
    /// Unix seconds.
    pub created_at: i64,
    /// Number of nested replies the platform reports for this comment.
    pub reply_count: u64,
    /// Location label with the platform prefix removed.
    pub location: String,
}

/// A nested reply under a top-level comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub id: u64,
    pub author: Author,
    pub body: String,
    pub like_count: u64,
    pub created_at: i64,
}

/// Outcome of fetching the nested replies for one comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replies {
    /// Replies in platform order. Empty when the comment has none or
    /// enrichment was skipped.
    Fetched(Vec<Reply>),
    /// Every retry was exhausted; the rest of the page is unaffected.
    FetchFailed,
}

impl Replies {
    /// Fetched replies, or an empty slice for the failed marker.
    pub fn as_slice(&self) -> &[Reply] {
        match self {
            Self::Fetched(replies) => replies,
            Self::FetchFailed => &[],
        }
    }

    pub fn is_fetch_failed(&self) -> bool {
        matches!(self, Self::FetchFailed)
    }
}

/// A comment paired with its nested replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedComment {
    pub comment: Comment,
    pub replies: Replies,
}

/// Pagination metadata derived from a raw page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub page_size: u64,
}

impl PageMeta {
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev_page(&self) -> bool {
        self.current_page > 1
    }
}

/// One enriched page, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentPage {
    pub meta: PageMeta,
    pub comments: Vec<EnrichedComment>,
}

/// Output mode requested by the caller.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

/// Ordering of the top-level comment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Time,
    Hot,
}

impl SortMode {
    /// Wire value of the `sort` query parameter.
    pub fn as_param(self) -> u8 {
        match self {
            Self::Time => 0,
            Self::Hot => 1,
        }
    }

    pub fn from_param(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Time),
            1 => Some(Self::Hot),
            _ => None,
        }
    }
}

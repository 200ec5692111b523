// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured (JSON) rendering of a comment page.

use bilicomments_core::{Author, BiliError, Comment, CommentPage, EnrichedComment, Reply};
use serde::Serialize;

/// Top-level JSON document.
#[derive(Debug, Serialize)]
pub struct JsonDocument<'a> {
    pub metadata: JsonMetadata,
    pub comments: Vec<JsonEntry<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonMetadata {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub page_size: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// A comment with its replies. A failed reply fetch renders as an empty
/// list with `repliesFetchFailed` set.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonEntry<'a> {
    pub comment: JsonComment<'a>,
    pub replies: Vec<JsonReply<'a>>,
    pub replies_fetch_failed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonComment<'a> {
    pub id: u64,
    pub user: &'a Author,
    pub content: &'a str,
    pub like: u64,
    pub time: i64,
    pub reply_count: u64,
    pub location: &'a str,
}

#[derive(Debug, Serialize)]
pub struct JsonReply<'a> {
    pub id: u64,
    pub user: &'a Author,
    pub content: &'a str,
    pub like: u64,
    pub time: i64,
}

impl<'a> From<&'a Comment> for JsonComment<'a> {
    fn from(comment: &'a Comment) -> Self {
        Self {
            id: comment.id,
            user: &comment.author,
            content: &comment.body,
            like: comment.like_count,
            time: comment.created_at,
            reply_count: comment.reply_count,
            location: &comment.location,
        }
    }
}

impl<'a> From<&'a Reply> for JsonReply<'a> {
    fn from(reply: &'a Reply) -> Self {
        Self {
            id: reply.id,
            user: &reply.author,
            content: &reply.body,
            like: reply.like_count,
            time: reply.created_at,
        }
    }
}

impl<'a> From<&'a EnrichedComment> for JsonEntry<'a> {
    fn from(entry: &'a EnrichedComment) -> Self {
        Self {
            comment: JsonComment::from(&entry.comment),
            replies: entry.replies.as_slice().iter().map(JsonReply::from).collect(),
            replies_fetch_failed: entry.replies.is_fetch_failed(),
        }
    }
}

/// Builds the document for `page`.
pub fn json_document(page: &CommentPage) -> JsonDocument<'_> {
    let meta = page.meta;
    JsonDocument {
        metadata: JsonMetadata {
            current_page: meta.current_page,
            total_pages: meta.total_pages,
            total_count: meta.total_count,
            page_size: meta.page_size,
            has_next_page: meta.has_next_page(),
            has_prev_page: meta.has_prev_page(),
        },
        comments: page.comments.iter().map(JsonEntry::from).collect(),
    }
}

/// Renders `page` as pretty-printed JSON.
pub fn render_json(page: &CommentPage) -> Result<String, BiliError> {
    serde_json::to_string_pretty(&json_document(page))
        .map_err(|e| BiliError::Internal(format!("failed to serialize comments: {e}")))
}

// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bilibili comment fetching for bilicomments.
//!
//! [`BiliClient`] talks to the platform; [`aggregate`] and [`paginate`]
//! turn a raw page into the comment model; [`ReplyPool`] attaches nested
//! replies under a shared concurrency ceiling.

pub mod aggregate;
pub mod client;
pub mod enrich;
pub mod types;

pub use aggregate::{aggregate, paginate, DEFAULT_PAGE_SIZE};
pub use client::{
    BiliClient, CommentTarget, PageRequest, TargetKind, MAX_PAGE_SIZE, MAX_REPLY_PAGE_SIZE,
};
pub use enrich::{without_replies, ReplyPool, DEFAULT_MAX_CONCURRENT};
pub use types::{DynamicInfo, Envelope, RawComment, RawPage, VideoInfo};

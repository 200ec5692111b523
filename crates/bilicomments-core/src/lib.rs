// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for bilicomments.
//!
//! Holds the error taxonomy and the comment data model consumed by the
//! fetch client and the renderers.

pub mod error;
pub mod types;

pub use error::{api_error_message, BiliError};
pub use types::{
    Author, Comment, CommentPage, EnrichedComment, OutputFormat, PageMeta, Replies, Reply, SortMode,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn output_format_parses_lowercase() {
        assert_eq!(OutputFormat::from_str("markdown").unwrap(), OutputFormat::Markdown);
        assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("yaml").is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn sort_mode_wire_values() {
        assert_eq!(SortMode::from_param(0), Some(SortMode::Time));
        assert_eq!(SortMode::from_param(1), Some(SortMode::Hot));
        assert_eq!(SortMode::from_param(2), None);
        assert_eq!(SortMode::Hot.as_param(), 1);
    }

    #[test]
    fn page_meta_navigation() {
        let meta = PageMeta {
            current_page: 2,
            total_pages: 5,
            total_count: 100,
            page_size: 20,
        };
        assert!(meta.has_next_page());
        assert!(meta.has_prev_page());

        let last = PageMeta {
            current_page: 5,
            ..meta
        };
        assert!(!last.has_next_page());
    }

    #[test]
    fn page_meta_serializes_camel_case() {
        let meta = PageMeta {
            current_page: 1,
            total_pages: 0,
            total_count: 0,
            page_size: 20,
        };
        let json = serde_json::to_value(meta).unwrap();
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["pageSize"], 20);
    }

    #[test]
    fn failed_replies_read_as_empty() {
        assert!(Replies::FetchFailed.as_slice().is_empty());
        assert!(Replies::FetchFailed.is_fetch_failed());
        assert!(!Replies::Fetched(Vec::new()).is_fetch_failed());
    }
}

// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable (Markdown) rendering of a comment page.

use bilicomments_core::{CommentPage, EnrichedComment, PageMeta, Replies};
use chrono::{DateTime, FixedOffset};

/// Seconds east of UTC for displayed timestamps (China Standard Time).
const DISPLAY_OFFSET_SECS: i32 = 8 * 60 * 60;

/// What the page belongs to, for the report header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject<'a> {
    Video,
    Dynamic { type_label: &'a str },
}

impl Subject<'_> {
    fn noun(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Dynamic { .. } => "dynamic",
        }
    }
}

/// Renders `page` as a Markdown report.
pub fn render_markdown(page: &CommentPage, subject: Subject<'_>) -> String {
    let meta = page.meta;
    let mut md = String::new();

    match subject {
        Subject::Video => md.push_str("## 📺 Bilibili comment report\n\n"),
        Subject::Dynamic { type_label } => {
            md.push_str("## 📱 Bilibili dynamic comment report\n\n");
            md.push_str(&format!("📱 **Dynamic type**: {type_label}\n"));
        }
    }
    md.push_str(&format!(
        "📄 **Page**: {} / {}\n",
        meta.current_page, meta.total_pages
    ));
    md.push_str(&format!("📊 **Total comments**: {}\n\n", meta.total_count));

    if page.comments.is_empty() {
        md.push_str("😴 **This page has no comments.**\n\n");
        md.push_str(&format!(
            "✅ Done. If the {} has more comments, try requesting another page.",
            subject.noun()
        ));
        return md;
    }

    md.push_str("### 💬 Comments\n");
    for entry in &page.comments {
        push_entry(&mut md, entry);
    }

    md.push_str("---\n\n");
    md.push_str(&footer(&meta));
    md
}

fn push_entry(md: &mut String, entry: &EnrichedComment) {
    let comment = &entry.comment;
    md.push_str(&format!(
        "**👤 {}** (Lv.{}) | 👍 {} | 🕐 {}\n",
        comment.author.name,
        comment.author.level,
        comment.like_count,
        format_time(comment.created_at, "%Y-%m-%d %H:%M:%S"),
    ));
    md.push_str(&format!("> {}\n", comment.body.replace('\n', "\n> ")));

    match &entry.replies {
        Replies::FetchFailed => {
            md.push_str("  ↳ ⚠️ *Replies to this comment failed to load, please try again later.*\n");
        }
        Replies::Fetched(replies) if !replies.is_empty() => {
            md.push_str(&format!(
                "\n**📝 Replies** (showing {} of {}):\n",
                replies.len(),
                comment.reply_count,
            ));
            for reply in replies {
                md.push_str(&format!(
                    "  ↳ **{}**: {} *(👍{} | {})*\n",
                    reply.author.name,
                    reply.body,
                    reply.like_count,
                    format_time(reply.created_at, "%m-%d %H:%M"),
                ));
            }
            let shown = replies.len() as u64;
            if comment.reply_count > shown {
                md.push_str(&format!(
                    "  ↳ *...{} more replies*\n",
                    comment.reply_count - shown
                ));
            }
        }
        Replies::Fetched(_) => {}
    }

    md.push_str("\n---\n\n");
}

fn footer(meta: &PageMeta) -> String {
    let mut md = format!("✅ **Loaded page {}.**\n", meta.current_page);
    if meta.has_next_page() {
        let next = meta.current_page + 1;
        md.push_str(&format!(
            "💡 To browse the next page (page {next}), pass `page: {next}` in the next request."
        ));
    } else {
        md.push_str("🏁 Reached the last page.");
    }
    md
}

/// Formats unix seconds in UTC+8.
fn format_time(secs: i64, pattern: &str) -> String {
    let Some(offset) = FixedOffset::east_opt(DISPLAY_OFFSET_SECS) else {
        return secs.to_string();
    };
    DateTime::from_timestamp(secs, 0)
        .map(|utc| utc.with_timezone(&offset).format(pattern).to_string())
        .unwrap_or_else(|| secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{comment, reply};

    fn page(current_page: u64, total_pages: u64, comments: Vec<EnrichedComment>) -> CommentPage {
        CommentPage {
            meta: PageMeta {
                current_page,
                total_pages,
                total_count: 42,
                page_size: 20,
            },
            comments,
        }
    }

    #[test]
    fn timestamps_render_in_utc_plus_eight() {
        // 2023-11-14 22:13:20 UTC.
        assert_eq!(
            format_time(1_700_000_000, "%Y-%m-%d %H:%M:%S"),
            "2023-11-15 06:13:20"
        );
        assert_eq!(format_time(1_700_000_000, "%m-%d %H:%M"), "11-15 06:13");
    }

    #[test]
    fn empty_page_message() {
        let md = render_markdown(&page(1, 0, Vec::new()), Subject::Video);
        assert!(md.starts_with("## 📺 Bilibili comment report"));
        assert!(md.contains("📄 **Page**: 1 / 0"));
        assert!(md.contains("This page has no comments."));
        assert!(md.contains("If the video has more comments"));
        assert!(!md.contains("Comments\n"));
    }

    #[test]
    fn dynamic_header_shows_type_label() {
        let md = render_markdown(
            &page(1, 1, Vec::new()),
            Subject::Dynamic {
                type_label: "image dynamic",
            },
        );
        assert!(md.starts_with("## 📱 Bilibili dynamic comment report"));
        assert!(md.contains("📱 **Dynamic type**: image dynamic"));
        assert!(md.contains("If the dynamic has more comments"));
    }

    #[test]
    fn comment_with_partial_replies_shows_remaining_count() {
        let md = render_markdown(
            &page(
                1,
                3,
                vec![EnrichedComment {
                    comment: comment(1, 5),
                    replies: Replies::Fetched(vec![reply(10), reply(11)]),
                }],
            ),
            Subject::Video,
        );

        assert!(md.contains("**👤 user1** (Lv.4) | 👍 9 | 🕐 2023-11-15 06:13:20"));
        assert!(md.contains("> comment 1\n> second line"));
        assert!(md.contains("(showing 2 of 5)"));
        assert!(md.contains("  ↳ **replier10**: reply 10"));
        assert!(md.contains("...3 more replies"));
        assert!(md.contains("pass `page: 2`"));
    }

    #[test]
    fn failed_fetch_is_flagged_without_dropping_the_page() {
        let md = render_markdown(
            &page(
                3,
                3,
                vec![
                    EnrichedComment {
                        comment: comment(1, 2),
                        replies: Replies::FetchFailed,
                    },
                    EnrichedComment {
                        comment: comment(2, 0),
                        replies: Replies::Fetched(Vec::new()),
                    },
                ],
            ),
            Subject::Video,
        );

        assert!(md.contains("⚠️ *Replies to this comment failed to load"));
        assert!(md.contains("**👤 user2**"));
        assert!(md.contains("🏁 Reached the last page."));
    }

    #[test]
    fn all_replies_shown_has_no_more_line() {
        let md = render_markdown(
            &page(
                1,
                1,
                vec![EnrichedComment {
                    comment: comment(1, 1),
                    replies: Replies::Fetched(vec![reply(10)]),
                }],
            ),
            Subject::Video,
        );
        assert!(md.contains("showing 1 of 1"));
        assert!(!md.contains("more replies"));
    }
}

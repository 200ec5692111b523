// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Bilibili web API and their conversion into the
//! comment data model.
//!
//! Every field the platform is known to omit or null out is optional or
//! defaulted, so a sparse payload decodes instead of failing the request.

use bilicomments_core::{api_error_message, Author, BiliError, Comment, Reply};
use serde::Deserialize;

/// Prefix the platform puts in front of every location label.
const LOCATION_PREFIX: &str = "IP属地：";

/// Shown when the platform does not report a location.
pub const UNKNOWN_LOCATION: &str = "unknown";

/// Shown when the platform does not report a sex.
pub const UNKNOWN_SEX: &str = "unknown";

// --- Envelope ---

/// The `{code, message, data}` envelope every endpoint answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Zero on success, any other value is an application-level failure.
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Returns the payload, or an [`BiliError::Api`] for a non-zero code.
    ///
    /// Known codes use the local message table; unknown codes pass the
    /// platform's message through.
    pub fn into_data(self) -> Result<T, BiliError> {
        if self.code != 0 {
            return Err(BiliError::Api {
                code: self.code,
                message: api_error_message(self.code, &self.message),
            });
        }
        self.data
            .ok_or_else(|| BiliError::Decode("envelope has code 0 but no data".into()))
    }
}

// --- Comment pages ---

/// Top-level comment page (`/x/v2/reply`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub page: Option<RawPageInfo>,
    /// Promoted ("hot") comments, listed before the normal ones.
    #[serde(default)]
    pub hots: Option<Vec<RawComment>>,
    #[serde(default)]
    pub replies: Option<Vec<RawComment>>,
}

/// Paging block of a [`RawPage`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPageInfo {
    #[serde(default)]
    pub num: Option<u64>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Nested reply page (`/x/v2/reply/reply`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReplyPage {
    #[serde(default)]
    pub replies: Option<Vec<RawComment>>,
}

/// One comment or reply as the platform sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComment {
    #[serde(default)]
    pub rpid: u64,
    #[serde(default)]
    pub member: RawMember,
    #[serde(default)]
    pub content: RawContent,
    #[serde(default)]
    pub like: u64,
    #[serde(default)]
    pub ctime: i64,
    #[serde(default)]
    pub rcount: u64,
    #[serde(default)]
    pub reply_control: Option<RawReplyControl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMember {
    #[serde(default)]
    pub uname: String,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub level_info: Option<RawLevelInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLevelInfo {
    #[serde(default)]
    pub current_level: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContent {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReplyControl {
    #[serde(default)]
    pub location: Option<String>,
}

impl RawComment {
    fn author(&self) -> Author {
        Author {
            name: self.member.uname.clone(),
            level: self
                .member
                .level_info
                .as_ref()
                .map(|info| info.current_level)
                .unwrap_or(0),
            sex: self
                .member
                .sex
                .as_deref()
                .filter(|sex| !sex.is_empty())
                .unwrap_or(UNKNOWN_SEX)
                .to_string(),
        }
    }

    fn location(&self) -> String {
        self.reply_control
            .as_ref()
            .and_then(|control| control.location.as_deref())
            .map(|location| location.replace(LOCATION_PREFIX, ""))
            .filter(|location| !location.is_empty())
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
    }
}

impl From<&RawComment> for Comment {
    fn from(raw: &RawComment) -> Self {
        Self {
            id: raw.rpid,
            author: raw.author(),
            body: raw.content.message.clone(),
            like_count: raw.like,
            created_at: raw.ctime,
            reply_count: raw.rcount,
            location: raw.location(),
        }
    }
}

impl From<&RawComment> for Reply {
    fn from(raw: &RawComment) -> Self {
        Self {
            id: raw.rpid,
            author: raw.author(),
            body: raw.content.message.clone(),
            like_count: raw.like,
            created_at: raw.ctime,
        }
    }
}

// --- Metadata lookups ---

/// Navigation payload; only the signing key URLs are read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavData {
    #[serde(default)]
    pub wbi_img: Option<WbiImg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WbiImg {
    pub img_url: String,
    pub sub_url: String,
}

/// Video metadata (`/x/web-interface/view`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VideoInfo {
    pub aid: u64,
    #[serde(default)]
    pub title: String,
}

/// Dynamic detail payload (`/x/polymer/web-dynamic/v1/detail`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDynamicDetail {
    #[serde(default)]
    pub item: Option<RawDynamicItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDynamicItem {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub basic: Option<RawDynamicBasic>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDynamicBasic {
    #[serde(default)]
    pub comment_id_str: Option<String>,
    #[serde(default)]
    pub comment_type: Option<i64>,
}

/// Comment type the platform uses for plain dynamics.
pub const DEFAULT_DYNAMIC_COMMENT_TYPE: i64 = 17;

/// Comment type for videos.
pub const VIDEO_COMMENT_TYPE: i64 = 1;

const DYNAMIC_TYPE_LABELS: &[(&str, &str)] = &[
    ("DYNAMIC_TYPE_AV", "video dynamic"),
    ("DYNAMIC_TYPE_DRAW", "image dynamic"),
    ("DYNAMIC_TYPE_WORD", "text dynamic"),
    ("DYNAMIC_TYPE_ARTICLE", "article dynamic"),
    ("DYNAMIC_TYPE_FORWARD", "forwarded dynamic"),
];

/// Label used for dynamic types missing from the table.
pub const GENERIC_DYNAMIC_LABEL: &str = "dynamic";

/// Resolved comment target of a dynamic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicInfo {
    /// Human-readable kind of dynamic.
    pub type_label: String,
    /// Object id the comment endpoints expect.
    pub oid: String,
    pub comment_type: i64,
    /// Raw platform type, when present.
    pub original_type: Option<String>,
}

impl DynamicInfo {
    /// Resolves a detail payload, falling back to the dynamic id itself and
    /// the default comment type when the platform leaves them out.
    pub fn from_detail(dynamic_id: &str, detail: RawDynamicDetail) -> Self {
        let item = detail.item.unwrap_or_default();
        let basic = item.basic.unwrap_or_default();

        let oid = basic
            .comment_id_str
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| dynamic_id.to_string());
        let type_label = item
            .kind
            .as_deref()
            .and_then(|kind| {
                DYNAMIC_TYPE_LABELS
                    .iter()
                    .find(|(known, _)| *known == kind)
                    .map(|(_, label)| *label)
            })
            .unwrap_or(GENERIC_DYNAMIC_LABEL)
            .to_string();

        Self {
            type_label,
            oid,
            comment_type: basic.comment_type.unwrap_or(DEFAULT_DYNAMIC_COMMENT_TYPE),
            original_type: item.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn comment_conversion_strips_location_prefix() {
        let raw: RawComment = serde_json::from_value(json!({
            "rpid": 42,
            "member": {"uname": "alice", "sex": "女", "level_info": {"current_level": 5}},
            "content": {"message": "hello"},
            "like": 7,
            "ctime": 1700000000,
            "rcount": 3,
            "reply_control": {"location": "IP属地：广东"}
        }))
        .unwrap();

        let comment = Comment::from(&raw);
        assert_eq!(comment.id, 42);
        assert_eq!(comment.author.name, "alice");
        assert_eq!(comment.author.level, 5);
        assert_eq!(comment.author.sex, "女");
        assert_eq!(comment.location, "广东");
        assert_eq!(comment.reply_count, 3);
    }

    #[test]
    fn sparse_comment_uses_defaults() {
        let raw: RawComment = serde_json::from_value(json!({"rpid": 1})).unwrap();
        let comment = Comment::from(&raw);
        assert_eq!(comment.author.level, 0);
        assert_eq!(comment.author.sex, UNKNOWN_SEX);
        assert_eq!(comment.location, UNKNOWN_LOCATION);
        assert_eq!(comment.reply_count, 0);
    }

    #[test]
    fn null_lists_decode_as_none() {
        let page: RawPage =
            serde_json::from_value(json!({"page": {}, "hots": null, "replies": null})).unwrap();
        assert!(page.hots.is_none());
        assert!(page.replies.is_none());
    }

    #[test]
    fn envelope_maps_known_codes() {
        let envelope: Envelope<RawPage> =
            serde_json::from_value(json!({"code": -404, "message": "啥都木有", "data": null}))
                .unwrap();
        let err = envelope.into_data().unwrap_err();
        assert!(matches!(err, BiliError::Api { code: -404, .. }));
        assert_eq!(
            err.to_string(),
            "Bilibili API error (-404): content does not exist or has been deleted"
        );
    }

    #[test]
    fn envelope_passes_unknown_message_through() {
        let envelope: Envelope<RawPage> =
            serde_json::from_value(json!({"code": 12002, "message": "comments are closed"}))
                .unwrap();
        let err = envelope.into_data().unwrap_err();
        assert_eq!(err.to_string(), "Bilibili API error (12002): comments are closed");
    }

    #[test]
    fn dynamic_detail_resolves_target() {
        let detail: RawDynamicDetail = serde_json::from_value(json!({
            "item": {
                "type": "DYNAMIC_TYPE_DRAW",
                "basic": {"comment_id_str": "123456", "comment_type": 11}
            }
        }))
        .unwrap();

        let info = DynamicInfo::from_detail("900000000000000001", detail);
        assert_eq!(info.oid, "123456");
        assert_eq!(info.comment_type, 11);
        assert_eq!(info.type_label, "image dynamic");
        assert_eq!(info.original_type.as_deref(), Some("DYNAMIC_TYPE_DRAW"));
    }

    #[test]
    fn dynamic_detail_falls_back_to_id_and_default_type() {
        let detail: RawDynamicDetail =
            serde_json::from_value(json!({"item": {"type": "DYNAMIC_TYPE_LIVE"}})).unwrap();

        let info = DynamicInfo::from_detail("900000000000000001", detail);
        assert_eq!(info.oid, "900000000000000001");
        assert_eq!(info.comment_type, DEFAULT_DYNAMIC_COMMENT_TYPE);
        assert_eq!(info.type_label, GENERIC_DYNAMIC_LABEL);
    }
}

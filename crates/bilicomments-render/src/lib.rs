// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renderers turning an enriched comment page into tool output.

pub mod json;
pub mod markdown;

pub use json::{json_document, render_json, JsonDocument};
pub use markdown::{render_markdown, Subject};

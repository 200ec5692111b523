// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure derivations over a raw comment page.

use bilicomments_core::{Comment, PageMeta};

use crate::types::RawPage;

/// Page size assumed when the platform omits it.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Promoted comments first, then normal ones, each in platform order.
/// Missing lists count as empty.
pub fn aggregate(page: &RawPage) -> Vec<Comment> {
    page.hots
        .iter()
        .chain(page.replies.iter())
        .flatten()
        .map(Comment::from)
        .collect()
}

/// Derives pagination metadata, defaulting every missing field.
pub fn paginate(page: &RawPage) -> PageMeta {
    let info = page.page.as_ref();
    let current_page = info.and_then(|info| info.num).unwrap_or(1);
    let total_count = info.and_then(|info| info.count).unwrap_or(0);
    let page_size = info.and_then(|info| info.size).unwrap_or(DEFAULT_PAGE_SIZE);
    let total_pages = if page_size > 0 {
        total_count.div_ceil(page_size)
    } else {
        1
    };

    PageMeta {
        current_page,
        total_pages,
        total_count,
        page_size,
    }
}

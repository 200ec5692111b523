// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded-concurrency nested-reply enrichment.
//!
//! A [`ReplyPool`] owns the permit budget. Clones share it, so one pool held
//! by the process-wide client caps in-flight reply fetches across every
//! concurrent request, not per request.

use std::future::Future;
use std::sync::Arc;

use bilicomments_core::{Comment, EnrichedComment, Replies};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::debug;

/// Default ceiling of simultaneously in-flight reply fetches.
pub const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Shared permit budget for nested-reply fetches.
#[derive(Debug, Clone)]
pub struct ReplyPool {
    permits: Arc<Semaphore>,
    max_concurrent: usize,
}

impl ReplyPool {
    /// Creates a pool with `max_concurrent` permits (at least one).
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Pairs each comment with its nested replies.
    ///
    /// Comments reporting zero replies get an empty list without a call.
    /// The others wait for a permit in input order and then run `fetch`;
    /// the output is aligned index-for-index with `comments` whatever order
    /// the fetches complete in.
    pub async fn enrich<F, Fut>(&self, comments: Vec<Comment>, fetch: F) -> Vec<EnrichedComment>
    where
        F: Fn(&Comment) -> Fut,
        Fut: Future<Output = Replies>,
    {
        let pending = comments.iter().filter(|c| c.reply_count > 0).count();
        debug!(
            comments = comments.len(),
            pending,
            max_concurrent = self.max_concurrent,
            "enriching comments with nested replies"
        );

        let tasks = comments.iter().map(|comment| {
            let fetch = &fetch;
            async move {
                if comment.reply_count == 0 {
                    return Replies::Fetched(Vec::new());
                }
                // The semaphore is never closed, so acquire only fails if
                // that invariant breaks; treat it like an exhausted fetch.
                let Ok(_permit) = self.permits.acquire().await else {
                    return Replies::FetchFailed;
                };
                fetch(comment).await
            }
        });
        let replies = join_all(tasks).await;

        comments
            .into_iter()
            .zip(replies)
            .map(|(comment, replies)| EnrichedComment { comment, replies })
            .collect()
    }
}

impl Default for ReplyPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT)
    }
}

/// Pairs every comment with an empty reply list, issuing no calls.
pub fn without_replies(comments: Vec<Comment>) -> Vec<EnrichedComment> {
    comments
        .into_iter()
        .map(|comment| EnrichedComment {
            comment,
            replies: Replies::Fetched(Vec::new()),
        })
        .collect()
}

// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded retry with a constant inter-attempt delay.
//!
//! `Attempt(n)` either succeeds, or fails and, while `n < max_attempts`,
//! sleeps for the fixed delay before `Attempt(n + 1)`. After the last
//! failure the policy's `soft_fail` flag picks the exit: the
//! [`Outcome::FetchFailed`] marker, or a classified [`BiliError`].

use std::future::Future;
use std::time::Duration;

use bilicomments_core::BiliError;
use tracing::{debug, warn};

/// Default number of attempts, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Lifecycle settings for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts. Zero is treated as one.
    pub max_attempts: u32,
    /// Constant delay; no backoff, no jitter.
    pub delay: Duration,
    /// Prefix of the user-facing message when retries are exhausted.
    pub label: String,
    /// Return [`Outcome::FetchFailed`] instead of an error on exhaustion.
    pub soft_fail: bool,
}

impl RetryPolicy {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_DELAY,
            label: label.into(),
            soft_fail: false,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn soft_fail(mut self, soft_fail: bool) -> Self {
        self.soft_fail = soft_fail;
        self
    }
}

/// Result of a retried operation that did not raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Done(T),
    /// Retries exhausted under `soft_fail`.
    FetchFailed,
}

/// Runs `operation` under `policy`.
///
/// Returns `Err` only when retries are exhausted and `soft_fail` is off.
pub async fn run<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<Outcome<T>, BiliError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BiliError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(label = %policy.label, attempt, "succeeded after retry");
                }
                return Ok(Outcome::Done(value));
            }
            Err(err) => {
                warn!(
                    label = %policy.label,
                    attempt,
                    max_attempts,
                    error = %err,
                    "attempt failed"
                );
                last_error = Some(err);
                if attempt < max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    if policy.soft_fail {
        return Ok(Outcome::FetchFailed);
    }
    Err(exhausted(&policy.label, last_error))
}

/// Runs `operation` with soft-fail forced off.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, operation: F) -> Result<T, BiliError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BiliError>>,
{
    let policy = policy.clone().soft_fail(false);
    match run(&policy, operation).await? {
        Outcome::Done(value) => Ok(value),
        Outcome::FetchFailed => Err(exhausted(&policy.label, None)),
    }
}

/// Runs `operation` with soft-fail forced on. Never raises.
pub async fn retry_soft<T, F, Fut>(policy: &RetryPolicy, operation: F) -> Outcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BiliError>>,
{
    let policy = policy.clone().soft_fail(true);
    run(&policy, operation).await.unwrap_or(Outcome::FetchFailed)
}

fn exhausted(label: &str, last_error: Option<BiliError>) -> BiliError {
    match last_error {
        Some(err) if err.is_timeout() => BiliError::Timeout {
            label: label.to_string(),
        },
        Some(err) => BiliError::RequestFailed {
            label: label.to_string(),
            message: err.to_string(),
        },
        None => BiliError::RequestFailed {
            label: label.to_string(),
            message: "unknown network error".to_string(),
        },
    }
}

// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilience primitives for remote calls.

pub mod retry;

pub use retry::{
    retry, retry_soft, run, Outcome, RetryPolicy, DEFAULT_DELAY, DEFAULT_MAX_ATTEMPTS,
};

// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide mixin key cache with single-flight refill.
//!
//! The slot mutex is held across the remote lookup, so on expiry exactly one
//! caller refetches while every other caller waits and then reads the fresh
//! key. A failed refill leaves the slot empty; the next caller tries again.

use std::time::Duration;

use async_trait::async_trait;
use bilicomments_core::BiliError;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::mixin::{MixinKey, WbiKeys};

/// Default validity window of a fetched key pair.
pub const DEFAULT_KEY_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Where fresh key fragments come from.
#[async_trait]
pub trait KeySource: Send + Sync {
    /// Performs one authenticated lookup. Not retried here.
    async fn fetch_keys(&self, credential: &str) -> Result<WbiKeys, BiliError>;
}

struct CachedKey {
    mixin: MixinKey,
    fetched_at: Instant,
}

/// Cache holding the current mixin key.
pub struct KeyCache {
    ttl: Duration,
    slot: Mutex<Option<CachedKey>>,
}

impl KeyCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Returns the live mixin key, refilling from `source` when the cache is
    /// cold or older than the TTL.
    pub async fn mixin_key<S>(&self, source: &S, credential: &str) -> Result<MixinKey, BiliError>
    where
        S: KeySource + ?Sized,
    {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref()
            && cached.fetched_at.elapsed() < self.ttl
        {
            return Ok(cached.mixin.clone());
        }

        debug!("signing keys missing or expired, refetching");
        let mixin = source.fetch_keys(credential).await?.mixin_key()?;
        info!("signing keys refreshed");

        *slot = Some(CachedKey {
            mixin: mixin.clone(),
            fetched_at: Instant::now(),
        });
        Ok(mixin)
    }

    /// Drops the cached key so the next caller refetches.
    pub async fn clear(&self) {
        *self.slot.lock().await = None;
    }
}

impl Default for KeyCache {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_TTL)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingSource {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl KeySource for CountingSource {
        async fn fetch_keys(&self, _credential: &str) -> Result<WbiKeys, BiliError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            if self.fail {
                return Err(BiliError::Signing("nav lookup failed".into()));
            }
            Ok(WbiKeys {
                img_key: "7cd084941338484aae1ad9425b84077c".into(),
                sub_key: "4932caff0ff746eab6f01bf08b70ac45".into(),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn warm_cache_does_not_refetch() {
        let cache = KeyCache::default();
        let source = CountingSource::new(false);

        let first = cache.mixin_key(&source, "SESSDATA=x").await.unwrap();
        let second = cache.mixin_key(&source, "SESSDATA=x").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.as_str(), "ea1db124af3c7062474693fa704f4ff8");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_cache_refetches() {
        let cache = KeyCache::new(Duration::from_secs(60));
        let source = CountingSource::new(false);

        cache.mixin_key(&source, "c").await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        cache.mixin_key(&source, "c").await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_misses_share_one_refill() {
        let cache = Arc::new(KeyCache::default());
        let source = Arc::new(CountingSource::new(false));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let source = Arc::clone(&source);
            handles.push(tokio::spawn(async move {
                cache.mixin_key(source.as_ref(), "c").await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refill_propagates_and_is_not_cached() {
        let cache = KeyCache::default();
        let source = CountingSource::new(true);

        assert!(matches!(
            cache.mixin_key(&source, "c").await,
            Err(BiliError::Signing(_))
        ));
        assert!(cache.mixin_key(&source, "c").await.is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_forces_refetch() {
        let cache = KeyCache::default();
        let source = CountingSource::new(false);

        cache.mixin_key(&source, "c").await.unwrap();
        cache.clear().await;
        cache.mixin_key(&source, "c").await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}

//! # Request governance
//!
//! Every tool goes through a [`Governor`] before touching an upstream API:
//! the call is first charged against a per-key [`RateLimiter`] window, then
//! served from the [`TtlCache`] if possible, and only on a miss does the
//! upstream fetch run. Fresh results are cached for the policy's TTL.
//!
//! Cache hits still consume rate budget.

pub mod cache;
pub mod rate_limiter;

pub use cache::TtlCache;
pub use rate_limiter::RateLimiter;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::blockchain::models::ToolError;

/// Per-tool limits for governed calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallPolicy {
    pub max_calls: u32,
    pub window: Duration,
    pub ttl: Duration,
}

impl CallPolicy {
    pub const fn new(max_calls: u32, window: Duration, ttl: Duration) -> Self {
        Self {
            max_calls,
            window,
            ttl,
        }
    }
}

/// Shared limiter and cache, cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct Governor {
    limiter: Arc<RateLimiter>,
    cache: Arc<TtlCache<Value>>,
}

impl Governor {
    pub fn new(limiter: Arc<RateLimiter>, cache: Arc<TtlCache<Value>>) -> Self {
        Self { limiter, cache }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn cache(&self) -> &Arc<TtlCache<Value>> {
        &self.cache
    }

    /// Charge one call against `key` without consulting the cache.
    pub fn check_rate(&self, key: &str, policy: &CallPolicy) -> Result<(), ToolError> {
        if self.limiter.allow(key, policy.max_calls, policy.window) {
            Ok(())
        } else {
            warn!(key, max_calls = policy.max_calls, "Rate limit exceeded");
            Err(ToolError::RateLimitExceeded)
        }
    }

    /// Rate limit, then cache lookup, then `fetch` on a miss.
    ///
    /// The value is stored as JSON so a single cache serves every tool; a
    /// cached entry that no longer deserializes as `T` is treated as a miss.
    pub async fn guarded<T, F, Fut>(
        &self,
        key: &str,
        policy: &CallPolicy,
        fetch: F,
    ) -> Result<T, ToolError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ToolError>>,
    {
        self.check_rate(key, policy)?;

        if let Some(cached) = self.cache.get(key) {
            match serde_json::from_value::<T>(cached) {
                Ok(value) => {
                    debug!(key, "Cache hit");
                    return Ok(value);
                }
                Err(e) => warn!(key, error = %e, "Discarding unreadable cache entry"),
            }
        }

        debug!(key, "Cache miss, fetching upstream");
        let fresh = fetch().await?;
        match serde_json::to_value(&fresh) {
            Ok(value) => self.cache.set(key, value, policy.ttl),
            Err(e) => warn!(key, error = %e, "Result not cacheable"),
        }
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::advance;

    const POLICY: CallPolicy = CallPolicy::new(3, Duration::from_secs(60), Duration::from_secs(60));

    #[tokio::test]
    async fn test_cache_hit_skips_fetch() {
        let governor = Governor::default();
        let counter = AtomicUsize::new(0);
        let fetches = &counter;

        for _ in 0..2 {
            let value: String = governor
                .guarded("k", &POLICY, move || async move {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok("fresh".to_string())
                })
                .await
                .unwrap();
            assert_eq!(value, "fresh");
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_hits_consume_quota() {
        let governor = Governor::default();
        for _ in 0..3 {
            let _: u32 = governor.guarded("k", &POLICY, || async { Ok(1) }).await.unwrap();
        }
        let err = governor
            .guarded::<u32, _, _>("k", &POLICY, || async { Ok(1) })
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::RateLimitExceeded);
    }

    #[tokio::test]
    async fn test_rate_limited_call_never_fetches() {
        let governor = Governor::default();
        let policy = CallPolicy::new(0, Duration::from_secs(60), Duration::from_secs(60));
        let counter = AtomicUsize::new(0);
        let fetches = &counter;
        let result = governor
            .guarded::<u32, _, _>("k", &policy, move || async move {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok(1)
            })
            .await;
        assert_eq!(result, Err(ToolError::RateLimitExceeded));
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let governor = Governor::default();
        let result = governor
            .guarded::<u32, _, _>("k", &POLICY, || async {
                Err(ToolError::UpstreamCall("boom".into()))
            })
            .await;
        assert!(result.is_err());
        assert!(governor.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_refetches() {
        let governor = Governor::default();
        let counter = AtomicUsize::new(0);
        let fetches = &counter;
        let fetch = move || async move {
            Ok::<usize, ToolError>(fetches.fetch_add(1, Ordering::SeqCst))
        };

        assert_eq!(governor.guarded("k", &POLICY, fetch).await.unwrap(), 0);
        advance(Duration::from_secs(61)).await;
        assert_eq!(governor.guarded("k", &POLICY, fetch).await.unwrap(), 1);
    }
}

//! Token bucket rate limiter for quote providers.
//!
//! Each provider gets its own bucket sized from its [`RateLimit`]. The
//! registry only ever calls [`RateLimiter::try_acquire`]: a provider whose
//! bucket is empty is skipped for that request instead of being waited on.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use log::{debug, warn};

use crate::models::ProviderId;
use crate::provider::RateLimit;

/// Token bucket for a single provider.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
    /// Tokens per second.
    rate: f64,
    capacity: f64,
}

impl TokenBucket {
    fn from_limit(limit: &RateLimit) -> Self {
        let capacity = f64::from(limit.burst_capacity.max(1));
        Self {
            tokens: capacity,
            last_update: Instant::now(),
            rate: f64::from(limit.requests_per_minute) / 60.0,
            capacity,
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_update = now;
    }

    fn try_acquire(&mut self) -> bool {
        self.refill();

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Per-provider token buckets.
///
/// Providers that were never registered get a bucket with the default
/// [`RateLimit`] on first use.
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, TokenBucket>>,
    limits: Mutex<HashMap<String, RateLimit>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            limits: Mutex::new(HashMap::new()),
        }
    }

    /// Lock the buckets mutex, recovering from poison if necessary.
    ///
    /// The worst outcome of a poisoned bucket map is a slightly wrong token
    /// count.
    fn lock_buckets(&self) -> MutexGuard<'_, HashMap<String, TokenBucket>> {
        self.buckets.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter buckets mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn lock_limits(&self) -> MutexGuard<'_, HashMap<String, RateLimit>> {
        self.limits.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter limits mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Set the limit for `provider`, replacing any existing bucket.
    pub fn register(&self, provider: &ProviderId, limit: &RateLimit) {
        self.lock_limits().insert(provider.to_string(), limit.clone());
        self.lock_buckets().remove(provider.as_ref());
    }

    /// Take a token for `provider` if one is available.
    pub fn try_acquire(&self, provider: &ProviderId) -> bool {
        let limit = self
            .lock_limits()
            .get(provider.as_ref())
            .cloned()
            .unwrap_or_default();

        let mut buckets = self.lock_buckets();
        let bucket = buckets
            .entry(provider.to_string())
            .or_insert_with(|| TokenBucket::from_limit(&limit));

        let acquired = bucket.try_acquire();
        if !acquired {
            debug!("Rate limiter: no token available for '{}'", provider);
        }
        acquired
    }

    /// Tokens currently available for `provider`.
    pub fn remaining_tokens(&self, provider: &ProviderId) -> f64 {
        let mut buckets = self.lock_buckets();
        match buckets.get_mut(provider.as_ref()) {
            Some(bucket) => {
                bucket.refill();
                bucket.tokens
            }
            None => {
                drop(buckets);
                let limit = self
                    .lock_limits()
                    .get(provider.as_ref())
                    .cloned()
                    .unwrap_or_default();
                f64::from(limit.burst_capacity.max(1))
            }
        }
    }

    /// Refill `provider`'s bucket to capacity.
    pub fn reset(&self, provider: &ProviderId) {
        self.lock_buckets().remove(provider.as_ref());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::time::Duration;

    fn limit(requests_per_minute: u32, burst_capacity: u32) -> RateLimit {
        RateLimit {
            requests_per_minute,
            burst_capacity,
        }
    }

    #[test]
    fn test_token_bucket_refill() {
        let mut bucket = TokenBucket::from_limit(&limit(60, 1)); // 1 token/second

        assert!(bucket.try_acquire());
        assert!(!bucket.try_acquire());

        bucket.last_update = Instant::now() - Duration::from_secs(2);
        assert!(bucket.try_acquire());
    }

    #[test]
    fn test_unregistered_provider_uses_default_limit() {
        let limiter = RateLimiter::new();
        let provider: ProviderId = Cow::Borrowed("TEST_PROVIDER");
        let burst = RateLimit::default().burst_capacity;

        for _ in 0..burst {
            assert!(limiter.try_acquire(&provider));
        }
        assert!(!limiter.try_acquire(&provider));
    }

    #[test]
    fn test_registered_limit_is_respected() {
        let limiter = RateLimiter::new();
        let provider: ProviderId = Cow::Borrowed("RAPIDAPI_YAHOO");
        limiter.register(&provider, &limit(30, 3));

        assert!((limiter.remaining_tokens(&provider) - 3.0).abs() < 0.01);
        for _ in 0..3 {
            assert!(limiter.try_acquire(&provider));
        }
        assert!(!limiter.try_acquire(&provider));
    }

    #[test]
    fn test_per_provider_isolation() {
        let limiter = RateLimiter::new();
        let provider_a: ProviderId = Cow::Borrowed("PROVIDER_A");
        let provider_b: ProviderId = Cow::Borrowed("PROVIDER_B");
        limiter.register(&provider_a, &limit(1, 1));

        assert!(limiter.try_acquire(&provider_a));
        assert!(!limiter.try_acquire(&provider_a));
        assert!(limiter.try_acquire(&provider_b));
    }

    #[test]
    fn test_reset_restores_capacity() {
        let limiter = RateLimiter::new();
        let provider: ProviderId = Cow::Borrowed("RESET_PROVIDER");
        limiter.register(&provider, &limit(1, 1));

        assert!(limiter.try_acquire(&provider));
        assert!(!limiter.try_acquire(&provider));

        limiter.reset(&provider);
        assert!(limiter.try_acquire(&provider));
    }

    #[test]
    fn test_zero_burst_still_allows_one_call() {
        let limiter = RateLimiter::new();
        let provider: ProviderId = Cow::Borrowed("TINY");
        limiter.register(&provider, &limit(60, 0));
        assert!(limiter.try_acquire(&provider));
    }
}

//! Read-through access to the upstream API with admission control.

use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::cache::ResponseCache;
use crate::metrics::{CACHE_HITS, CACHE_MISSES, CACHE_SIZE, THROTTLED_TOTAL};
use crate::throttle::RequestThrottle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    pub max_requests_per_window: usize,
    pub window: Duration,
    pub cache_ttl: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_requests_per_window: 10,
            window: Duration::from_secs(60),
            cache_ttl: Duration::from_secs(5 * 60),
        }
    }
}

/// Result of a guarded fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Served from the response cache; the producer did not run.
    Cached(Arc<Value>),
    /// Produced by the upstream call and now cached.
    Fresh(Arc<Value>),
    /// The resource budget is spent. `wait` is the time until the oldest
    /// admitted call leaves the window.
    Throttled { wait: Duration },
}

/// Process-wide throttle and response cache, constructed once at startup and
/// shared by every handler.
pub struct UpstreamGuard {
    throttle: RequestThrottle,
    cache: ResponseCache,
}

impl UpstreamGuard {
    pub fn new(config: &GuardConfig) -> Self {
        Self {
            throttle: RequestThrottle::new(config.max_requests_per_window, config.window),
            cache: ResponseCache::new(config.cache_ttl),
        }
    }

    pub fn try_admit(&self, resource_key: &str) -> bool {
        self.throttle.try_admit(resource_key)
    }

    pub fn time_until_reset(&self, resource_key: &str) -> Duration {
        self.throttle.time_until_reset(resource_key)
    }

    pub fn get_cached(&self, cache_key: &str) -> Option<Arc<Value>> {
        self.cache.get(cache_key)
    }

    pub fn set_cache(&self, cache_key: &str, value: Value) {
        self.cache.put(cache_key, value);
        CACHE_SIZE.set(self.cache.len() as f64);
    }

    /// Cache lookup, then admission, then `producer`, then store.
    ///
    /// Producer errors are returned as-is and nothing is cached. The producer
    /// runs outside any store lock, so concurrent misses on the same key may
    /// both reach upstream; the last write wins.
    pub async fn fetch_with_policy<F, Fut, E>(
        &self,
        cache_key: &str,
        resource_key: &str,
        producer: F,
    ) -> Result<Outcome, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        self.fetch_with_max_age(cache_key, resource_key, self.cache.ttl(), producer)
            .await
    }

    /// [`fetch_with_policy`](Self::fetch_with_policy) with a stricter staleness
    /// bound for callers such as the live feed.
    pub async fn fetch_with_max_age<F, Fut, E>(
        &self,
        cache_key: &str,
        resource_key: &str,
        max_age: Duration,
        producer: F,
    ) -> Result<Outcome, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        if let Some(payload) = self.cache.get_within(cache_key, max_age) {
            CACHE_HITS.inc();
            debug!(key = cache_key, "cache hit");
            return Ok(Outcome::Cached(payload));
        }
        CACHE_MISSES.inc();

        if !self.throttle.try_admit(resource_key) {
            let wait = self.throttle.time_until_reset(resource_key);
            THROTTLED_TOTAL.inc();
            info!(
                resource = resource_key,
                wait_ms = wait.as_millis() as u64,
                "rate limit exceeded"
            );
            return Ok(Outcome::Throttled { wait });
        }

        let payload = Arc::new(producer().await?);
        self.cache.put_shared(cache_key, Arc::clone(&payload));
        CACHE_SIZE.set(self.cache.len() as f64);
        Ok(Outcome::Fresh(payload))
    }
}

impl Default for UpstreamGuard {
    fn default() -> Self {
        Self::new(&GuardConfig::default())
    }
}

use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

// Cache entry with timestamp
#[derive(Clone)]
pub struct CacheEntry {
    pub payload: Arc<Value>,
    pub stored_at: Instant,
}

impl CacheEntry {
    fn is_older_than(&self, age: Duration) -> bool {
        self.stored_at.elapsed() > age
    }
}

/// Last successful upstream response per cache key.
///
/// One fixed TTL, no capacity bound. Expired entries are evicted lazily when
/// they are next read; nothing sweeps in the background.
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<Value>> {
        self.get_within(key, self.ttl)
    }

    /// Like [`get`](Self::get) but also treats entries older than `max_age` as
    /// misses. Only entries past the cache TTL are evicted.
    pub fn get_within(&self, key: &str, max_age: Duration) -> Option<Arc<Value>> {
        let ttl = self.ttl;
        // remove_if re-checks under the shard lock, so a concurrent put survives
        if self.entries.remove_if(key, |_, entry| entry.is_older_than(ttl)).is_some() {
            return None;
        }

        let entry = self.entries.get(key)?;
        if entry.is_older_than(max_age.min(ttl)) {
            return None;
        }
        Some(Arc::clone(&entry.payload))
    }

    pub fn put(&self, key: &str, payload: Value) {
        self.put_shared(key, Arc::new(payload));
    }

    pub fn put_shared(&self, key: &str, payload: Arc<Value>) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                payload,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

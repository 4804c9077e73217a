use dashmap::DashMap;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

// Admission times for one resource key, oldest first
#[derive(Default)]
pub struct ThrottleEntry {
    pub timestamps: VecDeque<Instant>,
}

impl ThrottleEntry {
    // Drop every admission that has left the trailing window
    fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(oldest) = self.timestamps.front() {
            if now.duration_since(*oldest) < window {
                break;
            }
            self.timestamps.pop_front();
        }
    }
}

/// Fixed-window limiter keyed by resource class ("matches", "live", ...).
///
/// Each key keeps the instants of its admitted calls. A denied attempt prunes
/// the key but is not counted, so the reset time stays predictable.
pub struct RequestThrottle {
    entries: DashMap<String, ThrottleEntry>,
    max_requests: usize,
    window: Duration,
}

impl RequestThrottle {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn try_admit(&self, key: &str) -> bool {
        let now = Instant::now();

        // entry guard holds the shard lock for the whole prune-then-append
        let mut entry = self.entries.entry(key.to_string()).or_default();
        entry.prune(now, self.window);

        if entry.timestamps.len() >= self.max_requests {
            return false;
        }

        entry.timestamps.push_back(now);
        true
    }

    /// Time until the oldest recorded call leaves the window. Zero for unknown keys.
    pub fn time_until_reset(&self, key: &str) -> Duration {
        let Some(entry) = self.entries.get(key) else {
            return Duration::ZERO;
        };
        match entry.timestamps.front() {
            Some(oldest) => self.window.saturating_sub(oldest.elapsed()),
            None => Duration::ZERO,
        }
    }
}

use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("scoreboard_requests_total", "Total number of dashboard API requests").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("scoreboard_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("scoreboard_cache_misses_total", "Total cache misses").unwrap();
    pub static ref THROTTLED_TOTAL: Counter =
        register_counter!("scoreboard_throttled_total", "Upstream calls refused by the local rate limit").unwrap();
    pub static ref UPSTREAM_ERRORS: Counter =
        register_counter!("scoreboard_upstream_errors_total", "Failed upstream API calls").unwrap();
    pub static ref UPSTREAM_LATENCY: Histogram = register_histogram!(
        "scoreboard_upstream_latency_seconds",
        "Upstream API latency in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("scoreboard_cache_size", "Current number of items in cache").unwrap();
}

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    // football-data.org answered 429
    #[error("upstream rate limit exceeded")]
    RateLimited,

    #[error("API Error: {status} - {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed upstream payload: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rate limit must allow at least one request per window")]
    ZeroRateLimit,

    #[error("rate window must be longer than zero seconds")]
    ZeroRateWindow,

    #[error("an API key is required (--api-key or FOOTBALL_DATA_API_KEY)")]
    MissingApiKey,
}

mod health;
mod leagues;
mod live;
mod matches;
mod metrics;
mod standings;

pub use health::health_handler;
pub use leagues::{la_liga_handler, premier_league_handler};
pub use live::live_handler;
pub use matches::{MatchesQuery, matches_handler};
pub use metrics::metrics_handler;
pub use standings::{StandingsQuery, standings_handler};

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{error, warn};

use crate::error::UpstreamError;
use crate::policy::Outcome;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/matches", get(matches_handler))
        .route("/api/live", get(live_handler))
        .route("/api/standings", get(standings_handler))
        .route("/api/premier-league", get(premier_league_handler))
        .route("/api/la-liga", get(la_liga_handler))
        .with_state(state)
}

// ISO-8601 with millisecond precision, e.g. 2024-12-01T17:40:00.123Z
pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// How a route reports failures: what it was fetching, the hint shown when the
/// local budget is spent, and the empty payload merged into every error body.
pub(crate) struct Failure {
    pub what: &'static str,
    pub wait_hint: &'static str,
    pub fallback: Value,
    /// Answer an upstream 429 with a plain 500 instead of a dedicated 429 body.
    pub upstream_limit_as_failure: bool,
}

impl Failure {
    fn body(&self, fields: Value) -> Value {
        let mut body = Map::new();
        if let Value::Object(fields) = fields {
            body.extend(fields);
        }
        if let Value::Object(fallback) = &self.fallback {
            body.extend(fallback.clone());
        }
        Value::Object(body)
    }
}

/// Turn a guarded fetch into the HTTP response the dashboard expects.
pub(crate) fn reply(outcome: Result<Outcome, UpstreamError>, failure: Failure) -> Response {
    match outcome {
        Ok(Outcome::Cached(payload)) | Ok(Outcome::Fresh(payload)) => Json(&*payload).into_response(),
        Ok(Outcome::Throttled { wait }) => {
            let wait_ms = wait.as_millis() as u64;
            let body = failure.body(json!({
                "error": "Rate limit exceeded",
                "details": format!("Please wait {} seconds{}", wait_ms.div_ceil(1000), failure.wait_hint),
                "waitTime": wait_ms,
            }));
            (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response()
        }
        Err(UpstreamError::RateLimited) if !failure.upstream_limit_as_failure => {
            warn!(what = failure.what, "football-data API rate limit hit");
            let body = failure.body(json!({
                "error": "API rate limit exceeded",
                "details": "The Football API is temporarily unavailable. Please try again in 60 seconds.",
            }));
            (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response()
        }
        Err(e) => {
            error!(what = failure.what, error = %e, "request failed");
            let body = failure.body(json!({
                "error": format!("Failed to fetch {}", failure.what),
                "details": e.to_string(),
            }));
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

use axum::{extract::State, response::Response};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::{Failure, now_iso, reply};
use crate::error::UpstreamError;
use crate::keys;
use crate::metrics::REQUEST_TOTAL;
use crate::models::transform_matches;
use crate::state::AppState;
use crate::upstream::LIVE_STATUSES;

// Today's in-progress matches; served from cache only while younger than live_max_age
pub async fn live_handler(State(state): State<Arc<AppState>>) -> Response {
    REQUEST_TOTAL.inc();

    let api = &state.api;
    let outcome = state
        .guard
        .fetch_with_max_age(keys::LIVE_MATCHES, keys::LIVE, state.live_max_age, move || async move {
            let today = Utc::now().date_naive().to_string();
            let data = api.matches(&today, &today, None, Some(LIVE_STATUSES)).await?;
            let matches = transform_matches(&data)?;
            info!(match_count = matches.len(), "live matches fetched");

            Ok::<_, UpstreamError>(json!({
                "count": matches.len(),
                "matches": matches,
                "lastUpdated": now_iso(),
                "cached": false,
            }))
        })
        .await;

    reply(
        outcome,
        Failure {
            what: "live matches",
            wait_hint: "",
            fallback: json!({ "matches": [], "count": 0 }),
            upstream_limit_as_failure: false,
        },
    )
}

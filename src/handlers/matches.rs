use axum::{
    extract::{Query, State},
    response::Response,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::{Failure, now_iso, reply};
use crate::error::UpstreamError;
use crate::keys;
use crate::metrics::REQUEST_TOTAL;
use crate::models::transform_matches;
use crate::state::AppState;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct MatchesQuery {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub team_id: Option<String>,
}

pub async fn matches_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MatchesQuery>,
) -> Response {
    REQUEST_TOTAL.inc();

    let team_id = non_empty(params.team_id.as_deref());
    let cache_key = keys::matches_key(params.date_from.as_deref(), params.date_to.as_deref(), team_id);

    let api = &state.api;
    let params = &params;
    let outcome = state
        .guard
        .fetch_with_policy(&cache_key, keys::MATCHES, move || async move {
            let (default_from, default_to) = keys::default_date_range(Utc::now().date_naive());
            // blank bounds fall back to the default range; the cache key keeps them raw
            let date_from = non_empty(params.date_from.as_deref())
                .map_or_else(|| default_from.to_string(), str::to_string);
            let date_to = non_empty(params.date_to.as_deref())
                .map_or_else(|| default_to.to_string(), str::to_string);

            let data = api.matches(&date_from, &date_to, team_id, None).await?;
            let matches = transform_matches(&data)?;
            info!(match_count = matches.len(), %date_from, %date_to, "matches fetched");

            Ok::<_, UpstreamError>(json!({
                "matches": matches,
                "resultSet": data.get("resultSet"),
                "filters": data.get("filters"),
                "cached": false,
                "timestamp": now_iso(),
            }))
        })
        .await;

    reply(
        outcome,
        Failure {
            what: "matches",
            wait_hint: " before making another request",
            fallback: json!({ "matches": [] }),
            upstream_limit_as_failure: false,
        },
    )
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

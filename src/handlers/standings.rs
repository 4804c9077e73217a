use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::{Failure, now_iso, reply};
use crate::error::UpstreamError;
use crate::keys;
use crate::metrics::REQUEST_TOTAL;
use crate::models::transform_table;
use crate::state::AppState;

#[derive(Deserialize, Debug, Default)]
pub struct StandingsQuery {
    pub competition: Option<String>,
}

pub async fn standings_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StandingsQuery>,
) -> Response {
    REQUEST_TOTAL.inc();

    let competition = params
        .competition
        .as_deref()
        .filter(|code| !code.is_empty())
        .unwrap_or(keys::DEFAULT_COMPETITION);
    let cache_key = keys::standings_key(competition);

    let api = &state.api;
    let outcome = state
        .guard
        .fetch_with_policy(&cache_key, keys::STANDINGS, move || async move {
            let data = api.standings(competition).await?;
            let table = transform_table(&data)?;
            info!(competition, rows = table.len(), "standings fetched");

            Ok::<_, UpstreamError>(json!({
                "standings": [{ "table": table }],
                "competition": data.get("competition"),
                "season": data.get("season"),
                "cached": false,
                "timestamp": now_iso(),
            }))
        })
        .await;

    reply(
        outcome,
        Failure {
            what: "standings",
            wait_hint: "",
            fallback: json!({ "standings": [{ "table": [] }] }),
            upstream_limit_as_failure: false,
        },
    )
}

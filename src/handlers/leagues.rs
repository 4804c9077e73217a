use axum::{extract::State, response::Response};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

use super::{Failure, now_iso, reply};
use crate::error::UpstreamError;
use crate::keys;
use crate::metrics::REQUEST_TOTAL;
use crate::models::first_table;
use crate::state::AppState;
use crate::upstream::LEAGUE_STATUSES;

// Season label the dashboard shows for both leagues
const SEASON: &str = "2024/25";

struct League {
    name: &'static str,
    label: &'static str,
    code: &'static str,
    cache_key: &'static str,
    resource_key: &'static str,
}

const PREMIER_LEAGUE: League = League {
    name: "Premier League",
    label: "Premier League data",
    code: "PL",
    cache_key: keys::PREMIER_LEAGUE_DATA,
    resource_key: keys::PREMIER_LEAGUE,
};

const LA_LIGA: League = League {
    name: "La Liga",
    label: "La Liga data",
    code: "PD",
    cache_key: keys::LA_LIGA_DATA,
    resource_key: keys::LA_LIGA,
};

pub async fn premier_league_handler(State(state): State<Arc<AppState>>) -> Response {
    league_summary(&state, &PREMIER_LEAGUE).await
}

pub async fn la_liga_handler(State(state): State<Arc<AppState>>) -> Response {
    league_summary(&state, &LA_LIGA).await
}

// Recent fixtures and the table for one competition, fetched together
async fn league_summary(state: &AppState, league: &League) -> Response {
    REQUEST_TOTAL.inc();

    let api = &state.api;
    let outcome = state
        .guard
        .fetch_with_policy(league.cache_key, league.resource_key, move || async move {
            let (matches, standings) = tokio::try_join!(
                api.competition_matches(league.code, LEAGUE_STATUSES, 20),
                api.standings(league.code)
            )?;

            let recent: Vec<Value> = matches
                .get("matches")
                .and_then(Value::as_array)
                .map(|list| list.iter().take(10).cloned().collect())
                .unwrap_or_default();
            info!(league = league.name, matches = recent.len(), "league data fetched");

            Ok::<_, UpstreamError>(json!({
                "league": league.name,
                "season": SEASON,
                "matches": recent,
                "standings": first_table(&standings).cloned().unwrap_or_else(|| json!([])),
                "lastUpdated": now_iso(),
                "source": "Football-Data.org API",
            }))
        })
        .await;

    reply(
        outcome,
        Failure {
            what: league.label,
            wait_hint: "",
            fallback: json!({ "data": null }),
            // an upstream 429 is reported like any other failed fetch
            upstream_limit_as_failure: true,
        },
    )
}

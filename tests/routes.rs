//! Route handlers against a mock football-data.org server

use axum::body::to_bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

use scoreboard_gateway::handlers::{
    MatchesQuery, StandingsQuery, la_liga_handler, live_handler, matches_handler,
    premier_league_handler, standings_handler,
};
use scoreboard_gateway::policy::{GuardConfig, UpstreamGuard};
use scoreboard_gateway::state::AppState;
use scoreboard_gateway::upstream::FootballApi;

const API_KEY: &str = "test-key";

fn state_for(server: &ServerGuard, config: GuardConfig) -> Arc<AppState> {
    Arc::new(AppState {
        api: FootballApi::with_client(reqwest::Client::new(), &server.url(), API_KEY),
        guard: UpstreamGuard::new(&config),
        live_max_age: Duration::from_secs(120),
    })
}

async fn body_json(res: Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn mock_json(
    server: &mut ServerGuard,
    path: &str,
    status: usize,
    body: Value,
    hits: usize,
) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .match_header("x-auth-token", API_KEY)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(hits)
        .create_async()
        .await
}

fn sample_match(id: i64) -> Value {
    json!({
        "id": id,
        "utcDate": "2024-12-01T16:30:00Z",
        "status": "FINISHED",
        "homeTeam": {"id": 64, "name": "Liverpool FC", "shortName": "Liverpool", "crest": "https://crests/64.png"},
        "awayTeam": {"id": 65, "name": "Manchester City FC", "shortName": "Man City"},
        "score": {"fullTime": {"home": 2, "away": 0}, "halfTime": {"home": 1, "away": 0}},
        "competition": {"id": 2021, "name": "Premier League"}
    })
}

fn sample_standings() -> Value {
    json!({
        "competition": {"id": 2021, "name": "Premier League", "code": "PL"},
        "season": {"id": 2287, "startDate": "2024-08-16", "endDate": "2025-05-25"},
        "standings": [{
            "type": "TOTAL",
            "table": [{
                "position": 1,
                "team": {"id": 64, "name": "Liverpool FC", "shortName": "Liverpool"},
                "playedGames": 13, "won": 11, "draw": 1, "lost": 1, "points": 34,
                "goalsFor": 27, "goalsAgainst": 7, "goalDifference": 20
            }]
        }]
    })
}

fn matches_query(date_from: &str, date_to: &str) -> Query<MatchesQuery> {
    Query(MatchesQuery {
        date_from: Some(date_from.to_string()),
        date_to: Some(date_to.to_string()),
        team_id: None,
    })
}

#[tokio::test]
async fn matches_are_fetched_once_then_cached() {
    let mut server = Server::new_async().await;
    let upstream = json!({
        "matches": [sample_match(1)],
        "resultSet": {"count": 1},
        "filters": {"dateFrom": "2024-12-01", "dateTo": "2024-12-07"}
    });
    let mock = mock_json(&mut server, "/matches", 200, upstream, 1).await;
    let state = state_for(&server, GuardConfig::default());

    let res = matches_handler(State(state.clone()), matches_query("2024-12-01", "2024-12-07")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let first = body_json(res).await;
    assert_eq!(first["matches"][0]["homeTeam"]["shortName"], "Liverpool");
    assert_eq!(first["matches"][0]["venue"], "TBD");
    assert_eq!(first["resultSet"]["count"], 1);
    assert_eq!(first["cached"], false);

    let res = matches_handler(State(state.clone()), matches_query("2024-12-01", "2024-12-07")).await;
    assert_eq!(body_json(res).await, first);

    assert!(state.guard.get_cached("matches-2024-12-01-2024-12-07-all").is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn blank_dates_use_default_range() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/matches")
        .match_query(Matcher::AllOf(vec![
            Matcher::Regex(r"dateFrom=\d{4}-\d{2}-\d{2}".into()),
            Matcher::Regex(r"dateTo=\d{4}-\d{2}-\d{2}".into()),
        ]))
        .with_status(200)
        .with_body(json!({"matches": []}).to_string())
        .expect(1)
        .create_async()
        .await;
    let state = state_for(&server, GuardConfig::default());

    let res = matches_handler(State(state.clone()), matches_query("", "")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(state.guard.get_cached("matches---all").is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn matches_forward_query_parameters() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/matches")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("dateFrom".into(), "2024-12-01".into()),
            Matcher::UrlEncoded("dateTo".into(), "2024-12-07".into()),
            Matcher::UrlEncoded("team".into(), "64".into()),
        ]))
        .with_status(200)
        .with_body(json!({"matches": []}).to_string())
        .create_async()
        .await;
    let state = state_for(&server, GuardConfig::default());

    let query = Query(MatchesQuery {
        date_from: Some("2024-12-01".to_string()),
        date_to: Some("2024-12-07".to_string()),
        team_id: Some("64".to_string()),
    });
    let res = matches_handler(State(state.clone()), query).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(state.guard.get_cached("matches-2024-12-01-2024-12-07-64").is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn standings_throttled_across_competitions() {
    let mut server = Server::new_async().await;
    let mock = mock_json(&mut server, "/competitions/PL/standings", 200, sample_standings(), 1).await;
    let state = state_for(
        &server,
        GuardConfig {
            max_requests_per_window: 1,
            window: Duration::from_secs(60),
            cache_ttl: Duration::from_secs(300),
        },
    );

    let res = standings_handler(State(state.clone()), Query(StandingsQuery::default())).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["standings"][0]["table"][0]["points"], 34);
    assert_eq!(body["competition"]["code"], "PL");

    // every competition shares the "standings" budget
    let query = Query(StandingsQuery { competition: Some("PD".to_string()) });
    let res = standings_handler(State(state.clone()), query).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = body_json(res).await;
    assert_eq!(body["error"], "Rate limit exceeded");
    assert_eq!(body["standings"], json!([{"table": []}]));
    let wait = body["waitTime"].as_u64().unwrap();
    assert!(wait > 0 && wait <= 60_000);

    // the cached competition is still served
    let res = standings_handler(State(state.clone()), Query(StandingsQuery::default())).await;
    assert_eq!(res.status(), StatusCode::OK);
    mock.assert_async().await;
}

#[tokio::test]
async fn upstream_rate_limit_maps_to_429_and_is_not_cached() {
    let mut server = Server::new_async().await;
    let mock = mock_json(&mut server, "/matches", 429, json!({"message": "slow down"}), 2).await;
    let state = state_for(&server, GuardConfig::default());

    for _ in 0..2 {
        let res = matches_handler(State(state.clone()), matches_query("2024-12-01", "2024-12-07")).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = body_json(res).await;
        assert_eq!(body["error"], "API rate limit exceeded");
        assert_eq!(body["matches"], json!([]));
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn upstream_error_maps_to_500() {
    let mut server = Server::new_async().await;
    let _mock = mock_json(&mut server, "/matches", 503, json!({"message": "down"}), 1).await;
    let state = state_for(&server, GuardConfig::default());

    let res = live_handler(State(state.clone())).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(res).await;
    assert_eq!(body["error"], "Failed to fetch live matches");
    assert_eq!(body["count"], 0);
    assert_eq!(body["matches"], json!([]));
    assert!(state.guard.get_cached("live-matches").is_none());
}

#[tokio::test]
async fn live_requests_in_play_statuses() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/matches")
        .match_query(Matcher::UrlEncoded("status".into(), "LIVE,IN_PLAY,PAUSED".into()))
        .with_status(200)
        .with_body(json!({"matches": [sample_match(7), sample_match(8)]}).to_string())
        .create_async()
        .await;
    let state = state_for(&server, GuardConfig::default());

    let res = live_handler(State(state.clone())).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["matches"][1]["id"], 8);
    assert!(body["lastUpdated"].is_string());
    mock.assert_async().await;
}

#[tokio::test]
async fn league_summary_combines_matches_and_table() {
    let mut server = Server::new_async().await;
    let matches: Vec<Value> = (1..=15).map(sample_match).collect();
    let matches_mock = mock_json(&mut server, "/competitions/PL/matches", 200, json!({"matches": matches}), 1).await;
    let standings_mock = mock_json(&mut server, "/competitions/PL/standings", 200, sample_standings(), 1).await;
    let state = state_for(&server, GuardConfig::default());

    let res = premier_league_handler(State(state.clone())).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["league"], "Premier League");
    assert_eq!(body["season"], "2024/25");
    assert_eq!(body["matches"].as_array().unwrap().len(), 10);
    assert_eq!(body["standings"][0]["team"]["name"], "Liverpool FC");
    assert_eq!(body["source"], "Football-Data.org API");

    // second request is a cache hit
    let res = premier_league_handler(State(state.clone())).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(state.guard.get_cached("premier-league-data").is_some());
    matches_mock.assert_async().await;
    standings_mock.assert_async().await;
}

#[tokio::test]
async fn league_failure_returns_null_data() {
    let mut server = Server::new_async().await;
    let _matches = mock_json(&mut server, "/competitions/PD/matches", 200, json!({"matches": []}), 1).await;
    let _standings = mock_json(&mut server, "/competitions/PD/standings", 403, json!({"message": "restricted"}), 1).await;
    let state = state_for(&server, GuardConfig::default());

    let res = la_liga_handler(State(state.clone())).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(res).await;
    assert_eq!(body["error"], "Failed to fetch La Liga data");
    assert_eq!(body["data"], Value::Null);
    assert!(state.guard.get_cached("la-liga-data").is_none());
}

#[tokio::test]
async fn league_season_label_is_fixed() {
    let mut server = Server::new_async().await;
    let mut standings = sample_standings();
    standings["season"]["startDate"] = json!("2025-08-15");
    standings["season"]["endDate"] = json!("2026-05-24");
    let _matches = mock_json(&mut server, "/competitions/PL/matches", 200, json!({"matches": []}), 1).await;
    let _standings = mock_json(&mut server, "/competitions/PL/standings", 200, standings, 1).await;
    let state = state_for(&server, GuardConfig::default());

    let res = premier_league_handler(State(state.clone())).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["season"], "2024/25");
}

#[tokio::test]
async fn league_upstream_rate_limit_is_a_failure() {
    let mut server = Server::new_async().await;
    let matches = mock_json(&mut server, "/competitions/PD/matches", 429, json!({"message": "slow down"}), 1).await;
    let _standings = server
        .mock("GET", "/competitions/PD/standings")
        .with_status(200)
        .with_body(sample_standings().to_string())
        .create_async()
        .await;
    let state = state_for(&server, GuardConfig::default());

    let res = la_liga_handler(State(state.clone())).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(res).await;
    assert_eq!(body["error"], "Failed to fetch La Liga data");
    assert_eq!(body["data"], Value::Null);
    assert!(state.guard.get_cached("la-liga-data").is_none());
    matches.assert_async().await;
}

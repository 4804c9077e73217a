use reqwest::StatusCode;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, error};

use crate::error::UpstreamError;
use crate::metrics::{UPSTREAM_ERRORS, UPSTREAM_LATENCY};

// Statuses the live feed asks for
pub const LIVE_STATUSES: &str = "LIVE,IN_PLAY,PAUSED";
// Statuses pulled for the league summary pages
pub const LEAGUE_STATUSES: &str = "SCHEDULED,LIVE,IN_PLAY,FINISHED";

/// Thin football-data.org v4 client. Every call carries the `X-Auth-Token`
/// header; non-2xx answers become [`UpstreamError`]s.
#[derive(Clone)]
pub struct FootballApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FootballApi {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, api_key))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// `GET /matches?dateFrom=..&dateTo=..[&team=..][&status=..]`
    pub async fn matches(
        &self,
        date_from: &str,
        date_to: &str,
        team_id: Option<&str>,
        status: Option<&str>,
    ) -> Result<Value, UpstreamError> {
        let mut query = vec![("dateFrom", date_from), ("dateTo", date_to)];
        if let Some(team) = team_id {
            query.push(("team", team));
        }
        if let Some(status) = status {
            query.push(("status", status));
        }
        self.get_json("/matches", &query).await
    }

    /// `GET /competitions/{code}/standings`
    pub async fn standings(&self, competition: &str) -> Result<Value, UpstreamError> {
        self.get_json(&format!("/competitions/{competition}/standings"), &[])
            .await
    }

    /// `GET /competitions/{code}/matches?status=..&limit=..`
    pub async fn competition_matches(
        &self,
        competition: &str,
        status: &str,
        limit: u32,
    ) -> Result<Value, UpstreamError> {
        let limit = limit.to_string();
        self.get_json(
            &format!("/competitions/{competition}/matches"),
            &[("status", status), ("limit", limit.as_str())],
        )
        .await
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "calling football-data API");

        let start = Instant::now();
        let result = self.send(&url, query).await;
        UPSTREAM_LATENCY.observe(start.elapsed().as_secs_f64());

        if let Err(e) = &result {
            UPSTREAM_ERRORS.inc();
            error!(%url, error = %e, "football-data API call failed");
        }
        result
    }

    async fn send(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        let res = self
            .client
            .get(url)
            .query(query)
            .header("X-Auth-Token", &self.api_key)
            .send()
            .await?;

        let status = res.status();
        debug!(%status, "football-data API response");

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(UpstreamError::RateLimited);
        }
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        Ok(res.json::<Value>().await?)
    }
}

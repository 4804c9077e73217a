//! Resource and cache keys shared with the route layer.
//!
//! These strings are a contract with existing callers and must not change.

use chrono::{Days, NaiveDate};

// Throttle buckets
pub const MATCHES: &str = "matches";
pub const LIVE: &str = "live";
pub const STANDINGS: &str = "standings";
pub const PREMIER_LEAGUE: &str = "premier-league";
pub const LA_LIGA: &str = "la-liga";

// Fixed cache keys
pub const LIVE_MATCHES: &str = "live-matches";
pub const PREMIER_LEAGUE_DATA: &str = "premier-league-data";
pub const LA_LIGA_DATA: &str = "la-liga-data";

pub const DEFAULT_COMPETITION: &str = "PL";

/// `matches-{dateFrom}-{dateTo}-{teamId|all}`. Absent dates render as `null`.
pub fn matches_key(date_from: Option<&str>, date_to: Option<&str>, team_id: Option<&str>) -> String {
    format!(
        "matches-{}-{}-{}",
        date_from.unwrap_or("null"),
        date_to.unwrap_or("null"),
        team_id.filter(|id| !id.is_empty()).unwrap_or("all"),
    )
}

/// `standings-{competitionCode}`
pub fn standings_key(competition: &str) -> String {
    format!("standings-{competition}")
}

// Default matches range: two days back, five days ahead
pub fn default_date_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let from = today.checked_sub_days(Days::new(2)).unwrap_or(today);
    let to = today.checked_add_days(Days::new(5)).unwrap_or(today);
    (from, to)
}

use std::time::Duration;

use crate::policy::UpstreamGuard;
use crate::upstream::FootballApi;

// app's shared state, built once in main and handed to every route
pub struct AppState {
    pub api: FootballApi,
    pub guard: UpstreamGuard,   // throttle + response cache
    pub live_max_age: Duration, // stricter staleness bound for the live feed
}

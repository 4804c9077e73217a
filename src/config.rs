use clap::Parser;
use std::time::Duration;

use crate::error::ConfigError;
use crate::policy::GuardConfig;

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "scoreboard-gateway")]
#[command(about = "Rate-limited caching gateway for football-data.org")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "SCOREBOARD_PORT", default_value_t = 8080)]
    pub port: u16,

    // Interface to bind
    #[arg(long, env = "SCOREBOARD_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    // Upstream API root
    #[arg(long, env = "FOOTBALL_DATA_BASE_URL", default_value = "https://api.football-data.org/v4")]
    pub api_base: String,

    // Sent as X-Auth-Token
    #[arg(long, env = "FOOTBALL_DATA_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    // Cache TTL in seconds
    #[arg(short, long, env = "SCOREBOARD_CACHE_TTL", default_value_t = 300)]
    pub cache_ttl: u64,

    // Max age of a cached live feed in seconds
    #[arg(long, env = "SCOREBOARD_LIVE_MAX_AGE", default_value_t = 120)]
    pub live_max_age: u64,

    // Rate limit max requests per window
    #[arg(long, env = "SCOREBOARD_RATE_LIMIT", default_value_t = 10)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, env = "SCOREBOARD_RATE_WINDOW", default_value_t = 60)]
    pub rate_window: u64,

    // Upstream request timeout in seconds
    #[arg(long, env = "SCOREBOARD_UPSTREAM_TIMEOUT", default_value_t = 10)]
    pub upstream_timeout: u64,
}

impl Args {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit == 0 {
            return Err(ConfigError::ZeroRateLimit);
        }
        if self.rate_window == 0 {
            return Err(ConfigError::ZeroRateWindow);
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }

    pub fn guard_config(&self) -> GuardConfig {
        GuardConfig {
            max_requests_per_window: self.rate_limit as usize,
            window: Duration::from_secs(self.rate_window),
            cache_ttl: Duration::from_secs(self.cache_ttl),
        }
    }

    pub fn live_max_age(&self) -> Duration {
        Duration::from_secs(self.live_max_age)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }
}

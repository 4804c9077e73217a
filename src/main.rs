use clap::Parser; // for cli
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use scoreboard_gateway::config::Args;
use scoreboard_gateway::handlers::router;
use scoreboard_gateway::policy::UpstreamGuard;
use scoreboard_gateway::state::AppState;
use scoreboard_gateway::upstream::FootballApi;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run(Args::parse()).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    args.validate()?;

    let guard_config = args.guard_config();
    let api = FootballApi::new(&args.api_base, &args.api_key, args.upstream_timeout())?;

    // one throttle and one cache for the whole process
    let state = Arc::new(AppState {
        api,
        guard: UpstreamGuard::new(&guard_config),
        live_max_age: args.live_max_age(),
    });

    let app = router(state);

    let addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Gateway running on http://{}", addr);
    info!("Forwarding to {}", args.api_base);
    info!("Cache TTL: {} seconds (live feed: {} seconds)", args.cache_ttl, args.live_max_age);
    info!(
        "Rate limit: {} requests per {} seconds per resource",
        args.rate_limit, args.rate_window
    );

    axum::serve(listener, app).await?;
    Ok(())
}

//! Hacker News query agent: binary entrypoint.
//! Boots the Axum HTTP server, wiring config, the query pipeline, and metrics.

use hn_agent::{bootstrap, metrics::Metrics, AgentConfig};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default; `AGENT_LOG_JSON=1` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hn_agent=info,pipeline=info,warn"));

    let json = std::env::var("AGENT_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    // Shuttle may already have installed a subscriber; keep theirs if so.
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AgentConfig::load_default()?;
    let metrics = Metrics::init()?;

    let router = bootstrap::app(&cfg)?.merge(metrics.router());

    Ok(router.into())
}

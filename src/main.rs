//! PurpleWatch — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use purplewatch::api::{create_router, AppState};
use purplewatch::config;
use purplewatch::metrics::Metrics;
use purplewatch::ranking::MAX_SENSORS;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("purplewatch=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = config::load_default()?;
    tracing::info!(bind = %cfg.bind_addr, provider = %cfg.provider_base_url, "starting");

    // Prometheus recorder must be installed before any counters fire.
    let metrics = Metrics::init(MAX_SENSORS);

    let state = AppState::from_config(&cfg);
    let router = create_router(state).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

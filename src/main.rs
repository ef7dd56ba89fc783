use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use http_latency_stats::{server, AppState, Metrics, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── 1. Load configuration ────────────────────────────────────
    let config = ServerConfig::from_env()?;

    // ── 2. Build shared state ────────────────────────────────────
    let metrics = Arc::new(Metrics::with_options(config.metrics)?);
    info!(
        capacity = config.metrics.capacity,
        sampling_factor = config.metrics.sampling_factor,
        "metrics ready"
    );
    let state = Arc::new(AppState::new(metrics, config.stream_interval));

    // ── 3. Build Axum router ─────────────────────────────────────
    let app = server::create_router(state);

    // ── 4. Bind & serve ──────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!("listening on http://{}", config.bind_addr);
    info!("stats JSON  → http://{}/stats", config.bind_addr);
    info!("stats SSE   → http://{}/stats/stream", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

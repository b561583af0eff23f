// =============================================================================
// TASI Breakout Scanner — Main Entry Point
// =============================================================================
//
// A stateless HTTP service: every `GET /api/analyze` fetches fresh daily
// history for the benchmark, the monitored equities and their sector leaders,
// then scores each equity against the nine-condition breakout checklist.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analyzer;
mod api;
mod app_state;
mod indicators;
mod market_data;
mod runtime_config;
mod sector;
mod signals;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::market_data::{PriceProvider, YahooChartClient};
use crate::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        TASI Breakout Scanner — Starting Up               ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    // ── 2. Config ────────────────────────────────────────────────────────
    let config = RuntimeConfig::from_env().context("invalid runtime configuration")?;

    // ── 3. Price provider ────────────────────────────────────────────────
    let provider: Arc<dyn PriceProvider> = Arc::new(YahooChartClient::new(&config)?);

    // ── 4. Shared state & router ─────────────────────────────────────────
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(AppState::new(config, provider));
    let app = api::rest::router(state);

    // ── 5. Serve until Ctrl+C ────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind API server on {addr}"))?;
    info!(%addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server terminated with error")?;

    info!("TASI Breakout Scanner shut down complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received — stopping gracefully");
}

//! ibexwatch server
//!
//! Serves the latest IBEX 35 signal evaluation over HTTP, refreshing the
//! snapshot once a day at local midnight and lazily on stale reads.

use dotenvy::dotenv;
use ibexwatch::config::Config;
use ibexwatch::core::cache::SnapshotCache;
use ibexwatch::core::evaluator::UniverseEvaluator;
use ibexwatch::core::http::start_server;
use ibexwatch::core::scheduler::RefreshScheduler;
use ibexwatch::logging;
use ibexwatch::metrics::Metrics;
use ibexwatch::services::YahooChartProvider;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env();
    let env = ibexwatch::config::get_environment();
    info!("Starting ibexwatch signal engine");
    info!(environment = %env, "Environment");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);
    info!(
        universe = config.symbols.len(),
        lookback_days = config.lookback_days,
        "Universe: {} symbols, {}-day lookback",
        config.symbols.len(),
        config.lookback_days
    );

    let metrics = Arc::new(Metrics::new()?);
    let provider = Arc::new(YahooChartProvider::new(config.provider_base_url.clone())?);
    let evaluator = UniverseEvaluator::new(
        provider,
        config.symbols.clone(),
        config.lookback_days,
        Some(metrics.clone()),
    );
    let cache = Arc::new(SnapshotCache::new(evaluator, Some(metrics.clone())));

    let scheduler = RefreshScheduler::new(cache.clone())?;
    scheduler.start().await;

    let port = config.port;
    let server_cache = cache.clone();
    let server_metrics = metrics.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, server_cache, server_metrics).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("Server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down...");
            scheduler.stop().await;
            info!("Server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}

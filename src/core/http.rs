//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::core::cache::SnapshotCache;
use crate::metrics::Metrics;
use crate::models::{EvaluationSnapshot, SignalResult};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub cache: Arc<SnapshotCache>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "ibexwatch-signal-engine"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Latest evaluation for the whole universe, refreshing first when the
/// cache is empty or stale.
async fn get_analysis(State(state): State<AppState>) -> Json<EvaluationSnapshot> {
    let snapshot = state.cache.latest().await;
    Json(snapshot.as_ref().clone())
}

/// Latest evaluation rendered as a plain-text block per symbol.
async fn get_analysis_text(State(state): State<AppState>) -> String {
    let snapshot = state.cache.latest().await;
    render_text(&snapshot)
}

/// Latest evaluation for a single symbol.
async fn get_symbol_analysis(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<SignalResult>, StatusCode> {
    let snapshot = state.cache.latest().await;
    snapshot
        .result_for(&symbol)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Manual refresh trigger: recompute regardless of snapshot age.
async fn post_refresh(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.cache.force_refresh().await;
    Json(json!({
        "generated_at": snapshot.generated_at,
        "symbols": snapshot.results.len(),
    }))
}

fn render_text(snapshot: &EvaluationSnapshot) -> String {
    snapshot
        .results
        .iter()
        .map(render_result)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_result(result: &SignalResult) -> String {
    let fmt = |v: Option<f64>| match v {
        Some(v) => format!("{:.2}", v),
        None => "N/A".to_string(),
    };
    let yes_no = |b: bool| if b { "yes" } else { "no" };

    format!(
        "Symbol: {}\n\
         Last close: {:.2}\n\
         EMA_50: {}\n\
         RSI_14: {}\n\
         MACD: {}\n\
         MACD_Signal: {}\n\
         Bollinger_Low: {}\n\
         Stochastic_K: {}\n\
         Strong hands: {}\n\
         Weak hands: {}\n\
         Signals: {}\n\
         Score: {}\n\
         Predicted 3% rise: {}",
        result.symbol,
        result.last_close,
        fmt(result.ema_50),
        fmt(result.rsi_14),
        fmt(result.macd),
        fmt(result.macd_signal),
        fmt(result.bollinger_low),
        fmt(result.stochastic_k),
        yes_no(result.strong_hands),
        yes_no(result.weak_hands),
        result.signals.join(", "),
        result.score,
        yes_no(result.predicted_rise),
    )
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/analysis", get(get_analysis))
        .route("/api/analysis/text", get(get_analysis_text))
        .route("/api/analysis/{symbol}", get(get_symbol_analysis))
        .route("/api/refresh", post(post_refresh))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    port: u16,
    cache: Arc<SnapshotCache>,
    metrics: Arc<Metrics>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        cache,
        metrics,
        start_time: Arc::new(Instant::now()),
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}

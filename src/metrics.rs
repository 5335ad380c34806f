//! Prometheus metrics for the HTTP layer and the refresh pipeline.

use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
    pub snapshot_refreshes_total: IntCounter,
    pub refresh_duration_seconds: Histogram,
    pub symbols_skipped_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let snapshot_refreshes_total = IntCounter::new(
            "snapshot_refreshes_total",
            "Completed universe evaluation runs",
        )?;
        let refresh_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "refresh_duration_seconds",
            "Universe evaluation run duration in seconds",
        ))?;
        let symbols_skipped_total = IntCounter::new(
            "symbols_skipped_total",
            "Symbols skipped during evaluation (no data or insufficient history)",
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(snapshot_refreshes_total.clone()))?;
        registry.register(Box::new(refresh_duration_seconds.clone()))?;
        registry.register(Box::new(symbols_skipped_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            snapshot_refreshes_total,
            refresh_duration_seconds,
            symbols_skipped_total,
        })
    }

    /// Render the registry in the Prometheus text exposition format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        encoder.encode_to_string(&self.registry.gather())
    }
}

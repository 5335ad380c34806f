//! Yahoo Finance chart API provider.
//!
//! Pulls daily bars from the v8 chart endpoint. The base URL is injectable
//! so integration tests can point the provider at a mock server.

use crate::error::EngineError;
use crate::models::DailyBar;
use crate::services::market_data::DailyBarProvider;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

const USER_AGENT: &str = concat!("ibexwatch/", env!("CARGO_PKG_VERSION"));
const MAX_RETRIES: usize = 3;

pub struct YahooChartProvider {
    http: reqwest::Client,
    base_url: String,
}

impl YahooChartProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, EngineError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl DailyBarProvider for YahooChartProvider {
    async fn daily_bars(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<Vec<DailyBar>, EngineError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let now = Utc::now().timestamp();
        let period1 = now - i64::from(lookback_days) * 86_400;

        let request = || async {
            self.http
                .get(&url)
                .query(&[
                    ("interval", "1d".to_string()),
                    ("period1", period1.to_string()),
                    ("period2", now.to_string()),
                ])
                .send()
                .await?
                .error_for_status()
        };

        let response = request
            .retry(ExponentialBuilder::default().with_max_times(MAX_RETRIES))
            .when(is_transient)
            .notify(|err: &reqwest::Error, dur| {
                debug!(symbol = %symbol, error = %err, backoff_ms = dur.as_millis(), "retrying chart request");
            })
            .await?;

        let body = response.text().await?;
        parse_chart(symbol, &body)
    }
}

/// Retry connection problems, timeouts, and server-side errors; a 4xx is
/// permanent for the current request.
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect()
        || err.is_timeout()
        || err.status().is_some_and(|s| s.is_server_error())
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize, Default)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Parse a chart payload into usable daily bars.
///
/// Rows carrying a null in any OHLCV column are dropped: a partially filled
/// bar never enters the indicator pipeline. An empty or absent result set
/// maps to `DataUnavailable`.
pub fn parse_chart(symbol: &str, body: &str) -> Result<Vec<DailyBar>, EngineError> {
    let payload: ChartResponse =
        serde_json::from_str(body).map_err(|e| EngineError::MalformedPayload {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;

    let result = payload
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| EngineError::DataUnavailable(symbol.to_string()))?;

    let timestamps = result
        .timestamp
        .filter(|t| !t.is_empty())
        .ok_or_else(|| EngineError::DataUnavailable(symbol.to_string()))?;

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| EngineError::DataUnavailable(symbol.to_string()))?;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let fields = (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
            quote.volume.get(i).copied().flatten(),
        );
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = fields else {
            continue;
        };
        let Some(date) = DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        bars.push(DailyBar::new(date, open, high, low, close, volume));
    }

    if bars.is_empty() {
        return Err(EngineError::DataUnavailable(symbol.to_string()));
    }
    Ok(bars)
}

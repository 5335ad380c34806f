//! Universe evaluation: fetch, compute, score, one symbol at a time.

use crate::error::EngineError;
use crate::indicators;
use crate::metrics::Metrics;
use crate::models::{EvaluationSnapshot, SignalResult};
use crate::services::DailyBarProvider;
use crate::signals::scorer;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs the indicator pipeline and scorer across the fixed symbol universe.
///
/// Symbols are evaluated independently: a fetch or compute failure skips
/// that symbol and the run continues. Nothing mutable is shared between
/// symbols within a run.
pub struct UniverseEvaluator {
    provider: Arc<dyn DailyBarProvider>,
    symbols: Vec<String>,
    lookback_days: u32,
    metrics: Option<Arc<Metrics>>,
}

impl UniverseEvaluator {
    pub fn new(
        provider: Arc<dyn DailyBarProvider>,
        symbols: Vec<String>,
        lookback_days: u32,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        Self {
            provider,
            symbols,
            lookback_days,
            metrics,
        }
    }

    /// Evaluate every symbol and assemble a snapshot.
    ///
    /// Infallible by design: a run where every symbol was skipped still
    /// yields an empty snapshot rather than an error.
    pub async fn evaluate(&self) -> EvaluationSnapshot {
        let mut results = Vec::with_capacity(self.symbols.len());

        for symbol in &self.symbols {
            match self.evaluate_symbol(symbol).await {
                Ok(result) => results.push(result),
                Err(EngineError::DataUnavailable(_)) => {
                    debug!(symbol = %symbol, "no data for {}, skipping", symbol);
                    self.record_skip();
                }
                Err(EngineError::InsufficientHistory { bars, min, .. }) => {
                    debug!(
                        symbol = %symbol,
                        bars = bars,
                        min = min,
                        "insufficient history for {} ({} < {}), skipping",
                        symbol,
                        bars,
                        min
                    );
                    self.record_skip();
                }
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "evaluation failed for {}, skipping", symbol);
                    self.record_skip();
                }
            }
        }

        debug!(
            evaluated = results.len(),
            universe = self.symbols.len(),
            "evaluation run complete: {}/{} symbols scored",
            results.len(),
            self.symbols.len()
        );

        EvaluationSnapshot {
            generated_at: Utc::now(),
            results,
        }
    }

    async fn evaluate_symbol(&self, symbol: &str) -> Result<SignalResult, EngineError> {
        let bars = self.provider.daily_bars(symbol, self.lookback_days).await?;
        if bars.is_empty() {
            return Err(EngineError::DataUnavailable(symbol.to_string()));
        }

        let series = indicators::compute_indicators(symbol, &bars)?;
        scorer::score_symbol(symbol, &bars, &series)
            .ok_or_else(|| EngineError::DataUnavailable(symbol.to_string()))
    }

    fn record_skip(&self) {
        if let Some(ref metrics) = self.metrics {
            metrics.symbols_skipped_total.inc();
        }
    }
}

//! Market data provider interface.

use crate::error::EngineError;
use crate::models::DailyBar;
use async_trait::async_trait;

/// Source of daily OHLCV history for one symbol.
///
/// Implementations return bars ordered by date ascending. An empty universe
/// of data for a symbol is reported as `EngineError::DataUnavailable`; the
/// evaluator treats it as a per-symbol skip, never a run failure.
#[async_trait]
pub trait DailyBarProvider: Send + Sync {
    async fn daily_bars(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<Vec<DailyBar>, EngineError>;
}

//! Engine error types.

use thiserror::Error;

/// Errors raised while evaluating the universe or refreshing the cache.
///
/// None of these are fatal to the process: `DataUnavailable` and
/// `InsufficientHistory` make the evaluator skip the symbol, and
/// `RefreshInProgress` only tells an overlapping trigger that a run is
/// already in flight.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no market data available for {0}")]
    DataUnavailable(String),

    #[error("insufficient history for {symbol}: {bars} usable bars, need {min}")]
    InsufficientHistory {
        symbol: String,
        bars: usize,
        min: usize,
    },

    #[error("a snapshot refresh is already in progress")]
    RefreshInProgress,

    #[error("market data request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed market data payload for {symbol}: {reason}")]
    MalformedPayload { symbol: String, reason: String },
}

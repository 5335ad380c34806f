use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Scored evaluation of one symbol, produced once per refresh run.
///
/// Indicator values carry presentation rounding (2 decimals) and stay `None`
/// where the source series was too short for the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub symbol: String,
    pub last_close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_50: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi_14: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stochastic_k: Option<f64>,
    pub strong_hands: bool,
    pub weak_hands: bool,
    /// Names of the rules that fired, in rule order.
    pub signals: Vec<String>,
    /// Count of scoring rules satisfied, 0 through 6.
    pub score: u8,
    /// Heuristic call: score reached the fixed 3-point threshold.
    pub predicted_rise: bool,
    pub series_start: NaiveDate,
    pub series_end: NaiveDate,
}

/// The complete result set for one evaluation run across the universe.
///
/// This is the unit of caching: readers always see a whole snapshot from a
/// single run, never a partially replaced one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSnapshot {
    pub generated_at: DateTime<Utc>,
    pub results: Vec<SignalResult>,
}

impl EvaluationSnapshot {
    pub fn result_for(&self, symbol: &str) -> Option<&SignalResult> {
        self.results.iter().find(|r| r.symbol == symbol)
    }
}

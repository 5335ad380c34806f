use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Indicator values derived for a single bar.
///
/// Every rolling value is `None` until its trailing window has filled; the
/// volume-confirmation flags require both the EMA-50 and the volume mean and
/// stay `false` before that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_mean: Option<f64>,
    pub strong_hands: bool,
    pub weak_hands: bool,
}

/// Full indicator series, aligned 1:1 with the input bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorSeries {
    /// The most recent row. Downstream scoring only consumes this one.
    pub fn latest(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }
}

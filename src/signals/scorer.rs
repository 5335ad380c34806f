//! Fixed-rule signal scorer.
//!
//! Rules run in a fixed order against the most recent indicator row. Each
//! satisfied rule appends one named signal; most also add a point to the
//! score. An undefined operand (`None`) never satisfies a rule.

use crate::models::{DailyBar, IndicatorRow, IndicatorSeries, SignalResult};

/// Score at or above which the 3% rise call is made.
pub const SCORE_THRESHOLD: u8 = 3;

pub const SIGNAL_EMA_BULLISH: &str = "EMA_50 bullish";
pub const SIGNAL_RSI_OVERSOLD: &str = "RSI_14 oversold";
pub const SIGNAL_RSI_OVERBOUGHT: &str = "RSI_14 overbought";
pub const SIGNAL_MACD_BULLISH: &str = "MACD bullish";
pub const SIGNAL_BELOW_BOLLINGER: &str = "price below Bollinger low";
pub const SIGNAL_STOCHASTIC_OVERSOLD: &str = "stochastic oversold";
pub const SIGNAL_STRONG_HANDS: &str = "strong-hands buying";
pub const SIGNAL_WEAK_HANDS: &str = "weak-hands buying";

/// Outcome of the rule pass over one row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRow {
    pub signals: Vec<&'static str>,
    pub score: u8,
    pub predicted_rise: bool,
}

/// Run the rule list against a single indicator row.
pub fn score_row(row: &IndicatorRow) -> ScoredRow {
    let mut signals = Vec::new();
    let mut score: u8 = 0;

    if matches!(row.ema_50, Some(ema) if row.close > ema) {
        signals.push(SIGNAL_EMA_BULLISH);
        score += 1;
    }
    if matches!(row.rsi_14, Some(rsi) if rsi < 30.0) {
        signals.push(SIGNAL_RSI_OVERSOLD);
        score += 1;
    } else if matches!(row.rsi_14, Some(rsi) if rsi > 70.0) {
        signals.push(SIGNAL_RSI_OVERBOUGHT);
    }
    if let (Some(macd), Some(signal)) = (row.macd, row.macd_signal) {
        if macd > signal {
            signals.push(SIGNAL_MACD_BULLISH);
            score += 1;
        }
    }
    if matches!(row.bollinger_low, Some(low) if row.close < low) {
        signals.push(SIGNAL_BELOW_BOLLINGER);
        score += 1;
    }
    if matches!(row.stochastic_k, Some(k) if k < 20.0) {
        signals.push(SIGNAL_STOCHASTIC_OVERSOLD);
        score += 1;
    }
    if row.strong_hands {
        signals.push(SIGNAL_STRONG_HANDS);
        score += 1;
    }
    if row.weak_hands {
        signals.push(SIGNAL_WEAK_HANDS);
    }

    ScoredRow {
        signals,
        score,
        predicted_rise: score >= SCORE_THRESHOLD,
    }
}

/// Build the per-symbol result from the latest row of a computed series.
///
/// Returns `None` only for an empty series, which the pipeline never
/// produces.
pub fn score_symbol(
    symbol: &str,
    bars: &[DailyBar],
    series: &IndicatorSeries,
) -> Option<SignalResult> {
    let row = series.latest()?;
    let first = bars.first()?;
    let last = bars.last()?;
    let scored = score_row(row);

    Some(SignalResult {
        symbol: symbol.to_string(),
        last_close: round2(row.close),
        ema_50: row.ema_50.map(round2),
        rsi_14: row.rsi_14.map(round2),
        macd: row.macd.map(round2),
        macd_signal: row.macd_signal.map(round2),
        bollinger_low: row.bollinger_low.map(round2),
        stochastic_k: row.stochastic_k.map(round2),
        strong_hands: row.strong_hands,
        weak_hands: row.weak_hands,
        signals: scored.signals.iter().map(|s| s.to_string()).collect(),
        score: scored.score,
        predicted_rise: scored.predicted_rise,
        series_start: first.date,
        series_end: last.date,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! RSI (Relative Strength Index) indicator
//!
//! RSI = 100 - (100 / (1 + RS))
//! RS = Average Gain / Average Loss, Wilder-smoothed

use crate::models::DailyBar;

/// RSI of close over the full series.
///
/// The first average gain/loss is a simple mean of the first `period`
/// close-to-close changes; later values use Wilder's recursive smoothing
/// `avg = (prev * (period - 1) + current) / period`. Values are reported
/// from index `period` onward. A zero average loss maps to RSI 100.
pub fn rsi(bars: &[DailyBar], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; bars.len()];
    if period == 0 || bars.len() < period + 1 {
        return out;
    }

    let changes: Vec<f64> = bars
        .windows(2)
        .map(|pair| pair[1].close - pair[0].close)
        .collect();

    let mut avg_gain = changes[..period]
        .iter()
        .map(|c| c.max(0.0))
        .sum::<f64>()
        / period as f64;
    let mut avg_loss = changes[..period]
        .iter()
        .map(|c| (-c).max(0.0))
        .sum::<f64>()
        / period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    for (i, &change) in changes.iter().enumerate().skip(period) {
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        // change i sits between bar i and bar i + 1
        out[i + 1] = Some(rsi_value(avg_gain, avg_loss));
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

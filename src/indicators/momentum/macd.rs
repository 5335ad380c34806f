//! MACD (Moving Average Convergence Divergence) indicator
//!
//! MACD = EMA(12) - EMA(26)
//! Signal = EMA(9) of MACD

use crate::indicators::math;
use crate::models::DailyBar;

/// MACD line and signal line, both aligned to the input bars.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
}

/// MACD over the full series.
///
/// The MACD line is defined once the slow EMA is (index `slow - 1`); the
/// signal line once `signal_period` MACD values exist on top of that.
pub fn macd(
    bars: &[DailyBar],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let fast = math::ema_series(&closes, fast_period);
    let slow = math::ema_series(&closes, slow_period);

    let macd_line: Vec<Option<f64>> = fast
        .iter()
        .zip(&slow)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    // Signal line is an EMA over the defined stretch of the MACD line,
    // mapped back to the original bar indices.
    let first_defined = macd_line.iter().position(|v| v.is_some());
    let mut signal_line = vec![None; bars.len()];
    if let Some(offset) = first_defined {
        let defined: Vec<f64> = macd_line[offset..].iter().map(|v| v.unwrap_or(0.0)).collect();
        for (i, value) in math::ema_series(&defined, signal_period)
            .into_iter()
            .enumerate()
        {
            signal_line[offset + i] = value;
        }
    }

    MacdSeries {
        macd: macd_line,
        signal: signal_line,
    }
}

/// MACD with the conventional (12, 26, 9) periods.
pub fn macd_default(bars: &[DailyBar]) -> MacdSeries {
    macd(bars, 12, 26, 9)
}

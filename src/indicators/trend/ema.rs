//! EMA (Exponential Moving Average) indicator

use crate::indicators::math;
use crate::models::DailyBar;

/// EMA of close over the full series for a specific period.
pub fn ema(bars: &[DailyBar], period: usize) -> Vec<Option<f64>> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    math::ema_series(&closes, period)
}

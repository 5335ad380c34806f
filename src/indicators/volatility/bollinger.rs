//! Bollinger Bands indicator
//!
//! Middle Band = SMA(period)
//! Lower Band = Middle - (std_dev * standard deviation)

use crate::indicators::math;
use crate::models::DailyBar;

/// Lower Bollinger band of close over the full series.
///
/// Uses the population standard deviation of the window.
pub fn bollinger_lower(bars: &[DailyBar], period: usize, std_dev: f64) -> Vec<Option<f64>> {
    let mut out = vec![None; bars.len()];
    if period == 0 || bars.len() < period {
        return out;
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    for i in (period - 1)..closes.len() {
        let window = &closes[i + 1 - period..=i];
        let middle = match math::mean(window) {
            Some(m) => m,
            None => continue,
        };
        let std = match math::population_std_dev(window) {
            Some(s) => s,
            None => continue,
        };
        out[i] = Some(middle - std_dev * std);
    }
    out
}

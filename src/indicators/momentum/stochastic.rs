//! Stochastic %K oscillator
//!
//! %K = 100 * (close - lowest low) / (highest high - lowest low)

use crate::models::DailyBar;

/// Stochastic %K over the full series for the given window.
///
/// A flat window (highest high == lowest low) yields `None` for that bar
/// rather than dividing by zero.
pub fn stochastic_k(bars: &[DailyBar], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; bars.len()];
    if period == 0 || bars.len() < period {
        return out;
    }

    for i in (period - 1)..bars.len() {
        let window = &bars[i + 1 - period..=i];
        let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        if highest == lowest {
            continue;
        }
        out[i] = Some(100.0 * (bars[i].close - lowest) / (highest - lowest));
    }
    out
}

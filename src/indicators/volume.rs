//! Volume-based series: rolling volume mean.

use crate::indicators::math;
use crate::models::DailyBar;

/// Rolling simple moving average of volume.
pub fn volume_mean(bars: &[DailyBar], window: usize) -> Vec<Option<f64>> {
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    math::rolling_mean(&volumes, window)
}

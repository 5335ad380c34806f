//! Rolling-window math shared across indicators.

/// Arithmetic mean of a window.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (ddof = 0) of a window.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Exponential moving average over the whole series.
///
/// Seeded from the first value with alpha = 2/(period+1) and reported only
/// once `period` values have been folded in; earlier positions are `None`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut ema = values[0];
    for (i, &value) in values.iter().enumerate() {
        if i > 0 {
            ema = alpha * value + (1.0 - alpha) * ema;
        }
        if i + 1 >= period {
            out[i] = Some(ema);
        }
    }
    out
}

/// Rolling simple moving average with the given window.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = Some(sum / window as f64);
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out[i] = Some(sum / window as f64);
    }
    out
}

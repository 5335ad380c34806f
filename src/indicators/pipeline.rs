//! Assembles the per-bar indicator rows for one symbol's series.

use crate::error::EngineError;
use crate::indicators::momentum::{macd, rsi, stochastic};
use crate::indicators::{trend, volatility, volume};
use crate::models::{DailyBar, IndicatorRow, IndicatorSeries};

/// Minimum usable bars before the pipeline agrees to run.
pub const MIN_BARS: usize = 60;

const EMA_PERIOD: usize = 50;
const RSI_PERIOD: usize = 14;
const STOCHASTIC_PERIOD: usize = 14;
const BOLLINGER_PERIOD: usize = 20;
const BOLLINGER_STD_DEV: f64 = 2.0;
const VOLUME_WINDOW: usize = 20;

/// Compute the full indicator series for one symbol.
///
/// Declines series shorter than [`MIN_BARS`]; early rows legitimately carry
/// `None` values until each window fills.
pub fn compute_indicators(symbol: &str, bars: &[DailyBar]) -> Result<IndicatorSeries, EngineError> {
    if bars.len() < MIN_BARS {
        return Err(EngineError::InsufficientHistory {
            symbol: symbol.to_string(),
            bars: bars.len(),
            min: MIN_BARS,
        });
    }

    let ema_50 = trend::ema(bars, EMA_PERIOD);
    let rsi_14 = rsi::rsi(bars, RSI_PERIOD);
    let macd = macd::macd_default(bars);
    let bollinger_low = volatility::bollinger_lower(bars, BOLLINGER_PERIOD, BOLLINGER_STD_DEV);
    let stochastic_k = stochastic::stochastic_k(bars, STOCHASTIC_PERIOD);
    let volume_mean = volume::volume_mean(bars, VOLUME_WINDOW);

    let rows = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let strong_hands = matches!(ema_50[i], Some(ema) if bar.close > ema)
                && matches!(volume_mean[i], Some(mean) if bar.volume > mean);
            let weak_hands = matches!(ema_50[i], Some(ema) if bar.close < ema)
                && matches!(volume_mean[i], Some(mean) if bar.volume > mean);

            IndicatorRow {
                date: bar.date,
                close: bar.close,
                ema_50: ema_50[i],
                rsi_14: rsi_14[i],
                macd: macd.macd[i],
                macd_signal: macd.signal[i],
                bollinger_low: bollinger_low[i],
                stochastic_k: stochastic_k[i],
                volume_mean: volume_mean[i],
                strong_hands,
                weak_hands,
            }
        })
        .collect();

    Ok(IndicatorSeries { rows })
}

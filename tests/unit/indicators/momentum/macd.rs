//! Unit tests for the MACD series

use chrono::{Days, NaiveDate};
use ibexwatch::indicators::momentum::macd::{macd, macd_default};
use ibexwatch::models::DailyBar;

fn bar_date(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .checked_add_days(Days::new(i as u64))
        .unwrap()
}

fn bars_from_closes(closes: &[f64]) -> Vec<DailyBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            DailyBar::new(bar_date(i), close, close + 0.5, close - 0.5, close, 1000.0)
        })
        .collect()
}

#[test]
fn test_macd_line_defined_once_slow_ema_fills() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.3).collect();
    let series = macd_default(&bars_from_closes(&closes));
    assert!(series.macd[24].is_none());
    assert!(series.macd[25].is_some());
}

#[test]
fn test_signal_line_defined_after_nine_macd_values() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.3).collect();
    let series = macd_default(&bars_from_closes(&closes));
    assert!(series.signal[32].is_none());
    assert!(series.signal[33].is_some());
}

#[test]
fn test_macd_of_constant_series_is_zero() {
    let closes = vec![42.0; 60];
    let series = macd_default(&bars_from_closes(&closes));
    assert!(series.macd[59].unwrap().abs() < 1e-12);
    assert!(series.signal[59].unwrap().abs() < 1e-12);
}

#[test]
fn test_macd_positive_in_uptrend() {
    let closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
    let series = macd_default(&bars_from_closes(&closes));
    assert!(series.macd[79].unwrap() > 0.0);
}

#[test]
fn test_macd_alignment_with_custom_periods() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
    let bars = bars_from_closes(&closes);
    let series = macd(&bars, 3, 5, 2);
    assert_eq!(series.macd.len(), bars.len());
    assert_eq!(series.signal.len(), bars.len());
    assert!(series.macd[3].is_none());
    assert!(series.macd[4].is_some());
    assert!(series.signal[4].is_none());
    assert!(series.signal[5].is_some());
}

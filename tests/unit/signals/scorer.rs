//! Unit tests for the fixed-rule scorer

use chrono::{Days, NaiveDate};
use ibexwatch::models::{DailyBar, IndicatorRow, IndicatorSeries};
use ibexwatch::signals::{score_row, score_symbol, SCORE_THRESHOLD};

fn bar_date(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .checked_add_days(Days::new(i as u64))
        .unwrap()
}

fn quiet_row() -> IndicatorRow {
    IndicatorRow {
        date: bar_date(0),
        close: 100.0,
        ema_50: Some(105.0),
        rsi_14: Some(50.0),
        macd: Some(0.5),
        macd_signal: Some(0.8),
        bollinger_low: Some(90.0),
        stochastic_k: Some(50.0),
        volume_mean: Some(1000.0),
        strong_hands: false,
        weak_hands: false,
    }
}

#[test]
fn test_all_bullish_rules_fire_in_order() {
    let row = IndicatorRow {
        date: bar_date(0),
        close: 100.0,
        ema_50: Some(95.0),
        rsi_14: Some(25.0),
        macd: Some(1.2),
        macd_signal: Some(0.8),
        bollinger_low: Some(101.0),
        stochastic_k: Some(15.0),
        volume_mean: Some(1000.0),
        strong_hands: true,
        weak_hands: false,
    };
    let scored = score_row(&row);
    assert_eq!(
        scored.signals,
        vec![
            "EMA_50 bullish",
            "RSI_14 oversold",
            "MACD bullish",
            "price below Bollinger low",
            "stochastic oversold",
            "strong-hands buying",
        ]
    );
    assert_eq!(scored.score, 6);
    assert!(scored.predicted_rise);
}

#[test]
fn test_overbought_signals_without_scoring() {
    let mut row = quiet_row();
    row.rsi_14 = Some(75.0);
    let scored = score_row(&row);
    assert_eq!(scored.signals, vec!["RSI_14 overbought"]);
    assert_eq!(scored.score, 0);
    assert!(!scored.predicted_rise);
}

#[test]
fn test_prediction_threshold_boundary() {
    // Exactly three rules: EMA bullish, MACD bullish, stochastic oversold.
    let mut row = quiet_row();
    row.ema_50 = Some(95.0);
    row.macd = Some(1.0);
    row.macd_signal = Some(0.5);
    row.stochastic_k = Some(15.0);
    let scored = score_row(&row);
    assert_eq!(scored.score, SCORE_THRESHOLD);
    assert!(scored.predicted_rise);

    // One rule fewer falls short of the call.
    row.stochastic_k = Some(50.0);
    let scored = score_row(&row);
    assert_eq!(scored.score, 2);
    assert!(!scored.predicted_rise);
}

#[test]
fn test_weak_hands_signals_without_scoring() {
    let mut row = quiet_row();
    row.weak_hands = true;
    let scored = score_row(&row);
    assert_eq!(scored.signals, vec!["weak-hands buying"]);
    assert_eq!(scored.score, 0);
}

#[test]
fn test_undefined_operands_never_satisfy_rules() {
    let row = IndicatorRow {
        date: bar_date(0),
        close: 100.0,
        ema_50: None,
        rsi_14: None,
        macd: None,
        macd_signal: None,
        bollinger_low: None,
        stochastic_k: None,
        volume_mean: None,
        strong_hands: false,
        weak_hands: false,
    };
    let scored = score_row(&row);
    assert!(scored.signals.is_empty());
    assert_eq!(scored.score, 0);
    assert!(!scored.predicted_rise);
}

#[test]
fn test_flat_window_stochastic_does_not_count() {
    let mut row = quiet_row();
    row.ema_50 = Some(95.0);
    row.stochastic_k = None;
    let scored = score_row(&row);
    assert_eq!(scored.signals, vec!["EMA_50 bullish"]);
    assert_eq!(scored.score, 1);
}

#[test]
fn test_score_is_idempotent_for_identical_rows() {
    let row = quiet_row();
    assert_eq!(score_row(&row), score_row(&row));
}

#[test]
fn test_score_symbol_carries_dates_and_rounding() {
    let bars = vec![
        DailyBar::new(bar_date(0), 100.0, 101.0, 99.0, 100.0, 1000.0),
        DailyBar::new(bar_date(1), 100.0, 101.0, 99.0, 100.456, 1000.0),
    ];
    let mut row = quiet_row();
    row.date = bar_date(1);
    row.close = 100.456;
    row.ema_50 = Some(95.4449);
    let series = IndicatorSeries {
        rows: vec![quiet_row(), row],
    };

    let result = score_symbol("TEF.MC", &bars, &series).unwrap();
    assert_eq!(result.symbol, "TEF.MC");
    assert_eq!(result.last_close, 100.46);
    assert_eq!(result.ema_50, Some(95.44));
    assert_eq!(result.series_start, bar_date(0));
    assert_eq!(result.series_end, bar_date(1));
    assert_eq!(result.signals, vec!["EMA_50 bullish".to_string()]);
    assert_eq!(result.score, 1);
    assert!(!result.predicted_rise);
}

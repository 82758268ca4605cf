//! Tests for the indicator divergence wrappers and MFI bands.

use fundflow::analysis::{Direction, IndicatorSignals, IndicatorSource};
use fundflow::config::Config;
use fundflow::models::{Bar, Severity, SignalKind};

use crate::fixtures::{bar, day, flat_bars};

fn bars_with(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| bar(i as u64, close + 0.1, close - 0.1, close, 1000.0))
        .collect()
}

/// Closes with peaks at index 20 (12.0) and index 40 (13.0).
fn double_peak_closes() -> Vec<f64> {
    let mut closes = Vec::with_capacity(60);
    for i in 0..=20 {
        closes.push(10.0 + 0.1 * i as f64);
    }
    for i in 1..=10 {
        closes.push(12.0 - 0.1 * i as f64);
    }
    for i in 1..=10 {
        closes.push(11.0 + 0.2 * i as f64);
    }
    for i in 1..=19 {
        closes.push(13.0 - 0.1 * i as f64);
    }
    closes
}

/// Closes with troughs at index 20 (8.0) and index 40 (7.5).
fn double_trough_closes() -> Vec<f64> {
    let mut closes = Vec::with_capacity(60);
    for i in 0..=20 {
        closes.push(10.0 - 0.1 * i as f64);
    }
    for i in 1..=10 {
        closes.push(8.0 + 0.1 * i as f64);
    }
    for i in 1..=10 {
        closes.push(9.0 - 0.15 * i as f64);
    }
    for i in 1..=19 {
        closes.push(7.5 + 0.1 * i as f64);
    }
    closes
}

fn set_obv(bars: &mut [Bar], second_peak: f64) {
    let mut obv = Vec::with_capacity(60);
    for i in 0..=20 {
        obv.push(100.0 + i as f64);
    }
    for i in 1..=10 {
        obv.push(120.0 - i as f64);
    }
    for i in 1..=10 {
        obv.push(110.0 + (second_peak - 110.0) * i as f64 / 10.0);
    }
    for i in 1..=19 {
        obv.push(second_peak - 0.25 * i as f64);
    }
    for (b, v) in bars.iter_mut().zip(obv) {
        b.obv = Some(v);
    }
}

#[test]
fn obv_bearish_divergence_on_unconfirmed_new_high() {
    let config = Config::default();
    let detector = IndicatorSignals::new(&config);
    let mut bars = bars_with(&double_peak_closes());
    // OBV peaks at the same bars as price, but the second peak is lower.
    set_obv(&mut bars, 115.0);

    let signal = detector.detect_divergence(&bars, IndicatorSource::Obv, Direction::Bearish);
    assert!(signal.detected);
    assert_eq!(signal.name, "OBV_BEARISH_DIVERGENCE");
    assert_eq!(signal.severity, Severity::High);
    assert_eq!(signal.kind, SignalKind::Distribution);
    assert_eq!(signal.signal_date, Some(day(59)));

    let strength = signal.details["divergence_strength"].as_f64().unwrap();
    assert!((strength - (1.0 - 115.0 / 120.0)).abs() < 1e-9);
}

#[test]
fn confirming_obv_yields_no_divergence() {
    let config = Config::default();
    let detector = IndicatorSignals::new(&config);
    let mut bars = bars_with(&double_peak_closes());
    set_obv(&mut bars, 125.0);

    let signal = detector.detect_divergence(&bars, IndicatorSource::Obv, Direction::Bearish);
    assert!(!signal.detected);
}

#[test]
fn rsi_bullish_divergence_carries_medium_severity() {
    let config = Config::default();
    let detector = IndicatorSignals::new(&config);
    let mut bars = bars_with(&double_trough_closes());
    // RSI troughs with a higher low at the second price trough.
    let mut rsi = Vec::with_capacity(60);
    for i in 0..=20 {
        rsi.push(50.0 - i as f64);
    }
    for i in 1..=10 {
        rsi.push(30.0 + i as f64);
    }
    for i in 1..=10 {
        rsi.push(40.0 - 0.5 * i as f64);
    }
    for i in 1..=19 {
        rsi.push(35.0 + 0.5 * i as f64);
    }
    for (b, v) in bars.iter_mut().zip(rsi) {
        b.rsi = Some(v);
    }

    let signal = detector.detect_divergence(&bars, IndicatorSource::Rsi, Direction::Bullish);
    assert!(signal.detected);
    assert_eq!(signal.name, "RSI_BULLISH_DIVERGENCE");
    assert_eq!(signal.severity, Severity::Medium);
    assert_eq!(signal.kind, SignalKind::Accumulation);
}

#[test]
fn missing_indicator_column_stays_undetected() {
    let config = Config::default();
    let detector = IndicatorSignals::new(&config);
    // Price divergence shape, but no MFI values anywhere.
    let bars = bars_with(&double_peak_closes());

    let signal = detector.detect_divergence(&bars, IndicatorSource::Mfi, Direction::Bearish);
    assert!(!signal.detected);
    assert_eq!(signal.severity, Severity::None);
}

#[test]
fn short_history_stays_undetected() {
    let config = Config::default();
    let detector = IndicatorSignals::new(&config);
    let mut bars = flat_bars(30, 10.0, 1000.0);
    for b in bars.iter_mut() {
        b.obv = Some(100.0);
    }

    let signal = detector.detect_divergence(&bars, IndicatorSource::Obv, Direction::Bearish);
    assert!(!signal.detected);
}

#[test]
fn mfi_below_the_oversold_line_flags_accumulation() {
    let config = Config::default();
    let detector = IndicatorSignals::new(&config);
    let mut bars = flat_bars(60, 10.0, 1000.0);
    bars.last_mut().unwrap().mfi = Some(15.0);

    let signal = detector.detect_mfi_band(&bars, Direction::Bullish);
    assert!(signal.detected);
    assert_eq!(signal.name, "MFI_OVERSOLD");
    assert_eq!(signal.severity, Severity::Medium);
    assert_eq!(signal.kind, SignalKind::Accumulation);
}

#[test]
fn mfi_above_the_overbought_line_flags_distribution() {
    let config = Config::default();
    let detector = IndicatorSignals::new(&config);
    let mut bars = flat_bars(60, 10.0, 1000.0);
    bars.last_mut().unwrap().mfi = Some(85.0);

    let signal = detector.detect_mfi_band(&bars, Direction::Bearish);
    assert!(signal.detected);
    assert_eq!(signal.name, "MFI_OVERBOUGHT");
    assert_eq!(signal.kind, SignalKind::Distribution);
}

#[test]
fn mfi_at_or_inside_the_bands_stays_silent() {
    let config = Config::default();
    let detector = IndicatorSignals::new(&config);
    let mut bars = flat_bars(60, 10.0, 1000.0);

    bars.last_mut().unwrap().mfi = Some(50.0);
    assert!(!detector.detect_mfi_band(&bars, Direction::Bullish).detected);
    assert!(!detector.detect_mfi_band(&bars, Direction::Bearish).detected);

    // Thresholds are strict.
    bars.last_mut().unwrap().mfi = Some(20.0);
    assert!(!detector.detect_mfi_band(&bars, Direction::Bullish).detected);
    bars.last_mut().unwrap().mfi = Some(80.0);
    assert!(!detector.detect_mfi_band(&bars, Direction::Bearish).detected);

    bars.last_mut().unwrap().mfi = None;
    assert!(!detector.detect_mfi_band(&bars, Direction::Bullish).detected);
}

#[test]
fn analyze_returns_only_triggered_indicator_signals() {
    let config = Config::default();
    let detector = IndicatorSignals::new(&config);
    let mut bars = bars_with(&double_peak_closes());
    set_obv(&mut bars, 115.0);

    let signals = detector.analyze(&bars);
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].name, "OBV_BEARISH_DIVERGENCE");
    assert!(signals[0].detected);
}

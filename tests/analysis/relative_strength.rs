//! Tests for benchmark-relative strength detection.

use fundflow::analysis::RelativeStrength;
use fundflow::config::Config;

use crate::fixtures::{bar, flat_bars};

#[test]
fn persistent_underperformance_flags_weakness() {
    let config = Config::default();
    let detector = RelativeStrength::new(&config);

    // Stock falls 15% while the benchmark stays flat.
    let bars: Vec<_> = (0..60)
        .map(|i| {
            let close = 10.0 - 1.5 * (i as f64 / 59.0);
            bar(i, close + 0.1, close - 0.1, close, 1000.0)
        })
        .collect();
    let benchmark = flat_bars(60, 100.0, 1_000_000.0);

    let signal = detector.analyze(&bars, &benchmark);
    assert!(signal.detected);
    assert_eq!(signal.name, "RELATIVE_STRENGTH_WEAK");
}

#[test]
fn lagging_a_rising_benchmark_is_weakness_even_when_the_stock_rises() {
    let config = Config::default();
    let detector = RelativeStrength::new(&config);

    // Stock gains 5.5% while the benchmark gains 11%: the return difference
    // is -5.5%, past the threshold.
    let bars: Vec<_> = (0..60)
        .map(|i| {
            let close = 10.0 + 0.55 * (i as f64 / 59.0);
            bar(i, close + 0.1, close - 0.1, close, 1000.0)
        })
        .collect();
    let benchmark: Vec<_> = (0..60)
        .map(|i| {
            let close = 100.0 + 11.0 * (i as f64 / 59.0);
            bar(i, close + 0.1, close - 0.1, close, 1_000_000.0)
        })
        .collect();

    let signal = detector.analyze(&bars, &benchmark);
    assert!(signal.detected);
    assert_eq!(signal.details["relative_return"], "-5.50%");
}

#[test]
fn tracking_the_benchmark_is_not_weakness() {
    let config = Config::default();
    let detector = RelativeStrength::new(&config);

    let bars = flat_bars(60, 10.0, 1000.0);
    let benchmark = flat_bars(60, 100.0, 1_000_000.0);

    assert!(!detector.analyze(&bars, &benchmark).detected);
}

#[test]
fn short_aligned_history_stays_silent() {
    let config = Config::default();
    let detector = RelativeStrength::new(&config);

    // Only 50 benchmark dates line up with the 60 stock bars.
    let bars: Vec<_> = (0..60)
        .map(|i| {
            let close = 10.0 - 1.5 * (i as f64 / 59.0);
            bar(i, close + 0.1, close - 0.1, close, 1000.0)
        })
        .collect();
    let benchmark = flat_bars(50, 100.0, 1_000_000.0);

    assert!(!detector.analyze(&bars, &benchmark).detected);
}

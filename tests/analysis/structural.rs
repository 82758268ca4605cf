//! Tests for the structural disclosure detectors.

use fundflow::analysis::{CountDirection, DataError, StructuralDataSource, StructuralSignals};
use fundflow::config::Config;
use fundflow::models::{HolderPosition, HoldingsSnapshot, Severity, ShareholderCount};

use crate::fixtures::day;

fn position(name: &str, ratio: f64) -> HolderPosition {
    HolderPosition {
        holder_name: name.to_string(),
        hold_ratio: ratio,
        hold_amount: ratio * 1_000_000.0,
    }
}

fn snapshot(offset: u64, positions: Vec<HolderPosition>) -> HoldingsSnapshot {
    HoldingsSnapshot {
        end_date: day(offset),
        positions,
    }
}

fn count(offset: u64, holder_num: u64) -> ShareholderCount {
    ShareholderCount {
        end_date: day(offset),
        holder_num,
    }
}

#[test]
fn holdings_comparison_detects_entries_additions_and_exits() {
    let config = Config::default();
    let detector = StructuralSignals::new(&config);
    let snapshots = vec![
        snapshot(
            90,
            vec![
                position("Fund A", 0.16),
                position("Fund B", 0.02),
                position("Fund D", 0.04),
            ],
        ),
        snapshot(
            0,
            vec![
                position("Fund A", 0.10),
                position("Fund B", 0.08),
                position("Fund C", 0.05),
            ],
        ),
    ];

    let result = detector.evaluate_holdings(&snapshots);

    let entered = result.new_institutions.unwrap();
    assert!(entered.detected);
    assert_eq!(entered.signal_date, Some(day(90)));
    assert_eq!(entered.details["new_institutions"].as_array().unwrap().len(), 1);

    let buy_in = result.buy_in.unwrap();
    assert!(buy_in.detected);
    assert_eq!(buy_in.details["increases"].as_array().unwrap().len(), 1);

    // Fund B reduced past the threshold, Fund C exited entirely.
    let sell_off = result.sell_off.unwrap();
    assert!(sell_off.detected);
    assert_eq!(sell_off.severity, Severity::Critical);
    assert_eq!(sell_off.details["reductions"].as_array().unwrap().len(), 2);
}

#[test]
fn small_position_changes_stay_silent() {
    let config = Config::default();
    let detector = StructuralSignals::new(&config);
    let snapshots = vec![
        snapshot(90, vec![position("Fund A", 0.12)]),
        snapshot(0, vec![position("Fund A", 0.10)]),
    ];

    let result = detector.evaluate_holdings(&snapshots);
    assert!(result.new_institutions.is_none());
    assert!(result.buy_in.is_none());
    assert!(result.sell_off.is_none());
}

#[test]
fn single_snapshot_yields_no_holdings_signals() {
    let config = Config::default();
    let detector = StructuralSignals::new(&config);
    let snapshots = vec![snapshot(0, vec![position("Fund A", 0.10)])];

    let result = detector.evaluate_holdings(&snapshots);
    assert!(result.new_institutions.is_none());
    assert!(result.buy_in.is_none());
    assert!(result.sell_off.is_none());
}

#[test]
fn shareholder_count_surge_flags_distribution() {
    let config = Config::default();
    let detector = StructuralSignals::new(&config);
    let counts = vec![count(90, 12_000), count(0, 10_000)];

    let increase = detector.evaluate_shareholder_count(&counts, CountDirection::Increase);
    assert!(increase.detected);
    assert_eq!(increase.name, "SHAREHOLDER_COUNT_INCREASE");
    assert_eq!(increase.signal_date, Some(day(90)));

    let decrease = detector.evaluate_shareholder_count(&counts, CountDirection::Decrease);
    assert!(!decrease.detected);
}

#[test]
fn shareholder_count_concentration_flags_accumulation() {
    let config = Config::default();
    let detector = StructuralSignals::new(&config);
    let counts = vec![count(90, 8_000), count(0, 10_000)];

    let decrease = detector.evaluate_shareholder_count(&counts, CountDirection::Decrease);
    assert!(decrease.detected);
    assert_eq!(decrease.name, "SHAREHOLDER_COUNT_DECREASE");
}

#[test]
fn shareholder_count_change_below_threshold_stays_silent() {
    let config = Config::default();
    let detector = StructuralSignals::new(&config);
    // -14% stays under the 15% threshold.
    let counts = vec![count(90, 8_600), count(0, 10_000)];

    let decrease = detector.evaluate_shareholder_count(&counts, CountDirection::Decrease);
    assert!(!decrease.detected);
}

struct PartialSource;

impl StructuralDataSource for PartialSource {
    fn institutional_holdings(&self, ticker: &str) -> Result<Vec<HoldingsSnapshot>, DataError> {
        Err(DataError::NotAvailable(ticker.to_string()))
    }

    fn shareholder_counts(&self, _ticker: &str) -> Result<Vec<ShareholderCount>, DataError> {
        Ok(vec![count(90, 8_000), count(0, 10_000)])
    }
}

#[test]
fn provider_failure_skips_only_the_affected_detectors() {
    let config = Config::default();
    let detector = StructuralSignals::new(&config);

    let signals = detector.analyze("600000", &PartialSource);
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].name, "SHAREHOLDER_COUNT_DECREASE");
}

//! Structural disclosure detectors: institutional holdings turnover and
//! shareholder-count shifts.
//!
//! The data itself comes from an out-of-process provider behind
//! [`StructuralDataSource`]. Provider failures are logged and surface as
//! undetected signals for the affected detector only; one bad feed never
//! aborts the rest of a scan.

use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::config::Config;
use crate::models::{HoldingsSnapshot, Severity, ShareholderCount, Signal, SignalKind};

/// Failure reported by the structural data provider.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("provider request failed: {0}")]
    Provider(String),
    #[error("no structural data available for {0}")]
    NotAvailable(String),
}

/// Seam to the market-data collaborator. Snapshots must be ordered most
/// recent first.
pub trait StructuralDataSource {
    fn institutional_holdings(&self, ticker: &str) -> Result<Vec<HoldingsSnapshot>, DataError>;
    fn shareholder_counts(&self, ticker: &str) -> Result<Vec<ShareholderCount>, DataError>;
}

pub struct StructuralSignals<'a> {
    config: &'a Config,
}

/// Holdings comparison outcome: up to one signal per polarity.
#[derive(Debug, Default)]
pub struct HoldingsSignals {
    pub new_institutions: Option<Signal>,
    pub buy_in: Option<Signal>,
    pub sell_off: Option<Signal>,
}

impl<'a> StructuralSignals<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Run all structural detectors against `source` and return only the
    /// triggered signals.
    pub fn analyze(&self, ticker: &str, source: &dyn StructuralDataSource) -> Vec<Signal> {
        let mut signals = Vec::new();

        match source.institutional_holdings(ticker) {
            Ok(snapshots) => {
                let holdings = self.evaluate_holdings(&snapshots);
                signals.extend(holdings.new_institutions);
                signals.extend(holdings.buy_in);
                signals.extend(holdings.sell_off);
            }
            Err(err) => warn!(ticker, %err, "institutional holdings unavailable"),
        }

        match source.shareholder_counts(ticker) {
            Ok(counts) => {
                let decrease = self.evaluate_shareholder_count(&counts, CountDirection::Decrease);
                if decrease.detected {
                    signals.push(decrease);
                }
                let increase = self.evaluate_shareholder_count(&counts, CountDirection::Increase);
                if increase.detected {
                    signals.push(increase);
                }
            }
            Err(err) => warn!(ticker, %err, "shareholder counts unavailable"),
        }

        signals
    }

    /// Compare the two most recent holdings periods for entries, additions
    /// and reductions. Holders that fully exited fold into the sell-off
    /// signal as full-exit entries.
    pub fn evaluate_holdings(&self, snapshots: &[HoldingsSnapshot]) -> HoldingsSignals {
        let mut result = HoldingsSignals::default();
        if snapshots.len() < 2 {
            return result;
        }
        let current = &snapshots[0];
        let previous = &snapshots[1];
        let threshold = self.config.structural.institutional_reduction_threshold;

        // New entrants to the top-holder table.
        let entrants: Vec<_> = current
            .positions
            .iter()
            .filter(|p| previous.position(&p.holder_name).is_none())
            .collect();
        if !entrants.is_empty() {
            let listed: Vec<_> = entrants
                .iter()
                .map(|p| {
                    json!({
                        "holder": p.holder_name,
                        "ratio": format!("{:.2}%", p.hold_ratio * 100.0),
                        "amount": p.hold_amount,
                    })
                })
                .collect();
            result.new_institutions = Some(Signal {
                name: "NEW_INSTITUTION",
                detected: true,
                severity: Severity::High,
                kind: SignalKind::Accumulation,
                description: format!("{} new institution(s) entered the top holders", listed.len()),
                signal_date: Some(current.end_date),
                details: json!({ "new_institutions": listed }),
            });
        }

        let mut increases = Vec::new();
        let mut reductions = Vec::new();
        for position in &current.positions {
            let Some(prev) = previous.position(&position.holder_name) else {
                continue;
            };
            let change = position.hold_ratio - prev.hold_ratio;
            if change > threshold {
                increases.push(json!({
                    "holder": position.holder_name,
                    "prev_ratio": format!("{:.2}%", prev.hold_ratio * 100.0),
                    "current_ratio": format!("{:.2}%", position.hold_ratio * 100.0),
                    "increase": format!("{:.2}%", change * 100.0),
                }));
            } else if -change > threshold {
                reductions.push(json!({
                    "holder": position.holder_name,
                    "prev_ratio": format!("{:.2}%", prev.hold_ratio * 100.0),
                    "current_ratio": format!("{:.2}%", position.hold_ratio * 100.0),
                    "reduction": format!("{:.2}%", -change * 100.0),
                }));
            }
        }

        for prev in &previous.positions {
            if current.position(&prev.holder_name).is_none() {
                reductions.push(json!({
                    "holder": prev.holder_name,
                    "prev_ratio": format!("{:.2}%", prev.hold_ratio * 100.0),
                    "current_ratio": "0.00%",
                    "reduction": "full exit",
                }));
            }
        }

        if !increases.is_empty() {
            result.buy_in = Some(Signal {
                name: "INSTITUTIONAL_BUY_IN",
                detected: true,
                severity: Severity::High,
                kind: SignalKind::Accumulation,
                description: format!("{} institution(s) added to their positions", increases.len()),
                signal_date: Some(current.end_date),
                details: json!({ "increases": increases }),
            });
        }
        if !reductions.is_empty() {
            result.sell_off = Some(Signal {
                name: "INSTITUTIONAL_SELL_OFF",
                detected: true,
                severity: Severity::Critical,
                kind: SignalKind::Distribution,
                description: format!("{} institution(s) reduced or exited", reductions.len()),
                signal_date: Some(current.end_date),
                details: json!({ "reductions": reductions }),
            });
        }

        result
    }

    /// Relative change of the shareholder count between the two most recent
    /// periods, in the given direction. Older history is ignored.
    pub fn evaluate_shareholder_count(
        &self,
        counts: &[ShareholderCount],
        direction: CountDirection,
    ) -> Signal {
        let (name, kind, severity) = match direction {
            CountDirection::Increase => (
                "SHAREHOLDER_COUNT_INCREASE",
                SignalKind::Distribution,
                Severity::High,
            ),
            CountDirection::Decrease => (
                "SHAREHOLDER_COUNT_DECREASE",
                SignalKind::Accumulation,
                Severity::Medium,
            ),
        };

        if counts.len() < 2 {
            return Signal::not_detected(name, kind);
        }
        let current = &counts[0];
        let previous = &counts[1];
        if previous.holder_num == 0 {
            return Signal::not_detected(name, kind);
        }

        let prev = previous.holder_num as f64;
        let change = match direction {
            CountDirection::Increase => (current.holder_num as f64 - prev) / prev,
            CountDirection::Decrease => (prev - current.holder_num as f64) / prev,
        };
        if change <= self.config.structural.shareholder_increase_threshold {
            return Signal::not_detected(name, kind);
        }

        let verb = match direction {
            CountDirection::Increase => "grew",
            CountDirection::Decrease => "shrank",
        };
        Signal {
            name,
            detected: true,
            severity,
            kind,
            description: format!(
                "Shareholder count {verb} {:.2}% ({} -> {})",
                change * 100.0,
                previous.holder_num,
                current.holder_num
            ),
            signal_date: Some(current.end_date),
            details: json!({
                "previous_count": previous.holder_num,
                "current_count": current.holder_num,
                "change_ratio": format!("{:.2}%", change * 100.0),
            }),
        }
    }
}

/// Direction of the shareholder-count comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountDirection {
    Increase,
    Decrease,
}

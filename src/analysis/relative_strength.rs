//! Relative strength of a stock against a benchmark index.
//!
//! The relative strength price (RSP) is the stock close divided by the
//! benchmark close, joined on date. Persistent weakness requires three
//! agreeing conditions: falling RSP, RSP under its own moving average, and
//! the stock underperforming the benchmark over the lookback.

use serde_json::json;
use tracing::debug;

use crate::analysis::price_volume::slope;
use crate::config::Config;
use crate::models::{Bar, Severity, Signal, SignalKind};

pub struct RelativeStrength<'a> {
    config: &'a Config,
}

impl<'a> RelativeStrength<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Detect RELATIVE_STRENGTH_WEAK from stock bars and benchmark bars.
    /// Bars are joined on date; unmatched dates on either side are dropped.
    pub fn analyze(&self, bars: &[Bar], benchmark: &[Bar]) -> Signal {
        let name = "RELATIVE_STRENGTH_WEAK";
        let kind = SignalKind::Distribution;
        let params = &self.config.relative_strength;

        let aligned = align_by_date(bars, benchmark);
        let needed = params.lookback_period.max(params.rsp_ma_period);
        if aligned.len() < needed {
            debug!(aligned = aligned.len(), "relative strength skipped, history too short");
            return Signal::not_detected(name, kind);
        }

        let tail = &aligned[aligned.len() - params.lookback_period..];
        let rsp: Vec<f64> = tail.iter().map(|row| row.stock / row.bench).collect();
        let rsp_slope = slope(&rsp);
        let rsp_last = rsp[rsp.len() - 1];

        let ma_window = &aligned[aligned.len() - params.rsp_ma_period..];
        let rsp_ma = ma_window.iter().map(|row| row.stock / row.bench).sum::<f64>()
            / params.rsp_ma_period as f64;

        let first = &tail[0];
        let last = &tail[tail.len() - 1];
        let stock_return = last.stock / first.stock - 1.0;
        let bench_return = last.bench / first.bench - 1.0;
        let relative_return = stock_return - bench_return;

        let weak = rsp_slope < 0.0
            && rsp_last < rsp_ma
            && relative_return < -params.underperformance_threshold;
        if !weak {
            return Signal::not_detected(name, kind);
        }

        debug!(
            rsp_slope,
            relative_return, "relative strength weakness confirmed"
        );
        Signal {
            name,
            detected: true,
            severity: Severity::Medium,
            kind,
            description: format!(
                "Underperformed the benchmark by {:.1}% with a falling relative strength line",
                -relative_return * 100.0
            ),
            signal_date: Some(last.date),
            details: json!({
                "rsp_slope": rsp_slope,
                "rsp_last": rsp_last,
                "rsp_ma": rsp_ma,
                "stock_return": format!("{:.2}%", stock_return * 100.0),
                "benchmark_return": format!("{:.2}%", bench_return * 100.0),
                "relative_return": format!("{:.2}%", relative_return * 100.0),
            }),
        }
    }
}

struct AlignedClose {
    date: chrono::NaiveDate,
    stock: f64,
    bench: f64,
}

/// Date-aligned stock/benchmark close pairs. Benchmark closes of zero are
/// skipped.
fn align_by_date(bars: &[Bar], benchmark: &[Bar]) -> Vec<AlignedClose> {
    let mut rows = Vec::new();
    let mut bench = benchmark.iter().peekable();
    for bar in bars {
        while let Some(b) = bench.peek() {
            if b.date < bar.date {
                bench.next();
            } else {
                break;
            }
        }
        match bench.peek() {
            Some(b) if b.date == bar.date && b.close != 0.0 => {
                rows.push(AlignedClose {
                    date: bar.date,
                    stock: bar.close,
                    bench: b.close,
                });
            }
            _ => {}
        }
    }
    rows
}

//! Per-ticker orchestration: run every detector family, merge the triggered
//! signals and aggregate them into one report.

use serde::Serialize;
use tracing::info;

use crate::aggregator::{AggregateResult, SignalAggregator};
use crate::analysis::{
    IndicatorSignals, PriceVolumeSignals, RelativeStrength, StructuralDataSource,
    StructuralSignals,
};
use crate::config::Config;
use crate::models::{Bar, WeightedSignal};

/// Everything a single scan consumes. Benchmark bars and the structural data
/// source are optional; the corresponding detector families are skipped when
/// absent.
pub struct ScanInput<'a> {
    pub ticker: &'a str,
    pub bars: &'a [Bar],
    pub benchmark: Option<&'a [Bar]>,
    pub structural: Option<&'a dyn StructuralDataSource>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub ticker: String,
    /// Triggered signals with their configured weights, detection order.
    pub signals: Vec<WeightedSignal>,
    pub result: AggregateResult,
}

pub struct Scanner<'a> {
    config: &'a Config,
}

impl<'a> Scanner<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Run all applicable detectors for one ticker and aggregate the outcome.
    pub fn scan(&self, input: &ScanInput<'_>) -> ScanReport {
        let mut signals = PriceVolumeSignals::new(self.config).analyze(input.bars);
        signals.extend(IndicatorSignals::new(self.config).analyze(input.bars));

        if let Some(benchmark) = input.benchmark {
            let rs = RelativeStrength::new(self.config).analyze(input.bars, benchmark);
            if rs.detected {
                signals.push(rs);
            }
        }
        if let Some(source) = input.structural {
            signals.extend(StructuralSignals::new(self.config).analyze(input.ticker, source));
        }

        let result = SignalAggregator::new(self.config).aggregate(&signals);
        info!(
            ticker = input.ticker,
            score = result.total_score,
            rating = %result.rating,
            signals = signals.len(),
            "scan complete"
        );

        let weighted = signals
            .into_iter()
            .map(|signal| WeightedSignal {
                weight: self.config.weight_of(signal.name).unwrap_or(0),
                signal,
            })
            .collect();

        ScanReport {
            ticker: input.ticker.to_string(),
            signals: weighted,
            result,
        }
    }

    /// Scan a batch of independent tickers sequentially.
    pub fn scan_all<'i>(
        &self,
        inputs: impl IntoIterator<Item = ScanInput<'i>>,
    ) -> Vec<ScanReport> {
        inputs.into_iter().map(|input| self.scan(&input)).collect()
    }
}

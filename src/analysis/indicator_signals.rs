//! Indicator-based detectors: divergences of OBV/MFI/RSI/MACD against price,
//! plus MFI overbought/oversold bands.
//!
//! Each divergence wrapper extracts the tail of the close series and the
//! companion indicator, finds extrema on both, and delegates to
//! [`match_divergence`]. A missing indicator column or a short history yields
//! an undetected signal.

use serde_json::json;
use tracing::debug;

use crate::analysis::divergence::{match_divergence, Direction, DivergenceResult};
use crate::analysis::extrema::{find_peaks, find_troughs};
use crate::config::Config;
use crate::models::{Bar, Severity, Signal, SignalKind};

pub struct IndicatorSignals<'a> {
    config: &'a Config,
}

impl<'a> IndicatorSignals<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Run all indicator detectors and return only the triggered signals.
    pub fn analyze(&self, bars: &[Bar]) -> Vec<Signal> {
        if bars.is_empty() {
            debug!("no bars, indicator analysis skipped");
            return Vec::new();
        }

        let mut signals = vec![
            self.detect_divergence(bars, IndicatorSource::Obv, Direction::Bearish),
            self.detect_divergence(bars, IndicatorSource::Obv, Direction::Bullish),
            self.detect_divergence(bars, IndicatorSource::Mfi, Direction::Bearish),
            self.detect_divergence(bars, IndicatorSource::Mfi, Direction::Bullish),
            self.detect_divergence(bars, IndicatorSource::Rsi, Direction::Bearish),
            self.detect_divergence(bars, IndicatorSource::Rsi, Direction::Bullish),
            self.detect_divergence(bars, IndicatorSource::Macd, Direction::Bearish),
            self.detect_divergence(bars, IndicatorSource::Macd, Direction::Bullish),
        ];
        signals.push(self.detect_mfi_band(bars, Direction::Bullish));
        signals.push(self.detect_mfi_band(bars, Direction::Bearish));

        signals.into_iter().filter(|s| s.detected).collect()
    }

    /// Divergence of `source` against the close series over the source's
    /// configured lookback.
    pub fn detect_divergence(
        &self,
        bars: &[Bar],
        source: IndicatorSource,
        direction: Direction,
    ) -> Signal {
        let name = signal_name(source, direction);
        let kind = match direction {
            Direction::Bearish => SignalKind::Distribution,
            Direction::Bullish => SignalKind::Accumulation,
        };
        let lookback = self.lookback(source);
        if bars.len() < lookback {
            return Signal::not_detected(name, kind);
        }

        let tail = &bars[bars.len() - lookback..];
        let closes: Vec<f64> = tail.iter().map(|b| b.close).collect();
        let Some(indicator) = extract(tail, source) else {
            return Signal::not_detected(name, kind);
        };

        let order = self.config.indicators.extrema_order;
        let (price_extrema, indicator_extrema) = match direction {
            Direction::Bearish => (find_peaks(&closes, order), find_peaks(&indicator, order)),
            Direction::Bullish => (find_troughs(&closes, order), find_troughs(&indicator, order)),
        };

        let result = match_divergence(
            &closes,
            &indicator,
            &price_extrema,
            &indicator_extrema,
            direction,
            self.config.indicators.divergence_tolerance,
        );

        match result {
            Some(divergence) => {
                debug!(signal = name, strength = divergence.strength, "divergence confirmed");
                Signal {
                    name,
                    detected: true,
                    severity: divergence_severity(source),
                    kind,
                    description: describe(source, direction),
                    signal_date: tail.last().map(|b| b.date),
                    details: divergence_details(&divergence),
                }
            }
            None => Signal::not_detected(name, kind),
        }
    }

    /// MFI threshold bands: bullish below the oversold line, bearish above
    /// the overbought line.
    pub fn detect_mfi_band(&self, bars: &[Bar], direction: Direction) -> Signal {
        let (name, kind) = match direction {
            Direction::Bullish => ("MFI_OVERSOLD", SignalKind::Accumulation),
            Direction::Bearish => ("MFI_OVERBOUGHT", SignalKind::Distribution),
        };
        let Some(last) = bars.last() else {
            return Signal::not_detected(name, kind);
        };
        let Some(mfi) = last.mfi else {
            return Signal::not_detected(name, kind);
        };

        let detected = match direction {
            Direction::Bullish => mfi < self.config.indicators.mfi_oversold,
            Direction::Bearish => mfi > self.config.indicators.mfi_overbought,
        };
        if !detected {
            return Signal::not_detected(name, kind);
        }

        Signal {
            name,
            detected: true,
            severity: Severity::Medium,
            kind,
            description: match direction {
                Direction::Bullish => format!("MFI oversold at {mfi:.1}"),
                Direction::Bearish => format!("MFI overbought at {mfi:.1}"),
            },
            signal_date: Some(last.date),
            details: json!({ "mfi": mfi }),
        }
    }

    fn lookback(&self, source: IndicatorSource) -> usize {
        match source {
            IndicatorSource::Obv => self.config.indicators.obv_lookback,
            IndicatorSource::Mfi => self.config.indicators.mfi_lookback,
            IndicatorSource::Rsi => self.config.indicators.rsi_lookback,
            IndicatorSource::Macd => self.config.indicators.macd_lookback,
        }
    }
}

/// Which derived column a divergence wrapper reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorSource {
    Obv,
    Mfi,
    Rsi,
    Macd,
}

/// Indicator values for the tail window, or `None` when any bar is missing
/// the column.
fn extract(bars: &[Bar], source: IndicatorSource) -> Option<Vec<f64>> {
    bars.iter()
        .map(|b| match source {
            IndicatorSource::Obv => b.obv,
            IndicatorSource::Mfi => b.mfi,
            IndicatorSource::Rsi => b.rsi,
            IndicatorSource::Macd => b.macd,
        })
        .collect()
}

fn signal_name(source: IndicatorSource, direction: Direction) -> &'static str {
    match (source, direction) {
        (IndicatorSource::Obv, Direction::Bearish) => "OBV_BEARISH_DIVERGENCE",
        (IndicatorSource::Obv, Direction::Bullish) => "OBV_BULLISH_DIVERGENCE",
        (IndicatorSource::Mfi, Direction::Bearish) => "MFI_BEARISH_DIVERGENCE",
        (IndicatorSource::Mfi, Direction::Bullish) => "MFI_BULLISH_DIVERGENCE",
        (IndicatorSource::Rsi, Direction::Bearish) => "RSI_BEARISH_DIVERGENCE",
        (IndicatorSource::Rsi, Direction::Bullish) => "RSI_BULLISH_DIVERGENCE",
        (IndicatorSource::Macd, Direction::Bearish) => "MACD_BEARISH_DIVERGENCE",
        (IndicatorSource::Macd, Direction::Bullish) => "MACD_BULLISH_DIVERGENCE",
    }
}

// RSI is itself an oscillator; its divergences carry less weight.
fn divergence_severity(source: IndicatorSource) -> Severity {
    match source {
        IndicatorSource::Rsi => Severity::Medium,
        _ => Severity::High,
    }
}

fn describe(source: IndicatorSource, direction: Direction) -> String {
    let indicator = match source {
        IndicatorSource::Obv => "OBV",
        IndicatorSource::Mfi => "MFI",
        IndicatorSource::Rsi => "RSI",
        IndicatorSource::Macd => "MACD",
    };
    match direction {
        Direction::Bearish => {
            format!("{indicator} bearish divergence: price made a new high that {indicator} did not confirm")
        }
        Direction::Bullish => {
            format!("{indicator} bullish divergence: price made a new low that {indicator} did not confirm")
        }
    }
}

fn divergence_details(d: &DivergenceResult) -> serde_json::Value {
    json!({
        "price_first": d.price_first,
        "price_second": d.price_second,
        "price_change": format!("{:.2}%", d.price_change * 100.0),
        "indicator_first": d.indicator_first,
        "indicator_second": d.indicator_second,
        "indicator_change": format!("{:.2}%", d.indicator_change * 100.0),
        "divergence_strength": d.strength,
    })
}

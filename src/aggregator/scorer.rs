//! Weighted scoring of triggered signals into a bounded composite score and
//! a rating.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::models::{Signal, WeightedSignal};

pub const SCORE_MIN: i32 = -10;
pub const SCORE_MAX: i32 = 10;

/// Composite rating derived from the clamped score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Rating::StrongBuy => "STRONG_BUY",
            Rating::Buy => "BUY",
            Rating::Neutral => "NEUTRAL",
            Rating::Sell => "SELL",
            Rating::StrongSell => "STRONG_SELL",
        };
        f.write_str(label)
    }
}

/// Outcome of aggregating one ticker's triggered signals. Self-contained for
/// rendering: the partitions carry each signal's full payload alongside its
/// weight.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateResult {
    /// Sum of weights clamped to `[SCORE_MIN, SCORE_MAX]`.
    pub total_score: i32,
    /// Sum of weights before clamping.
    pub raw_score: i32,
    pub rating: Rating,
    pub recommendation: String,
    /// Number of signals that contributed a weight (including weight zero).
    pub signal_count: usize,
    /// Positive-weight signals, name -> weight + payload.
    pub inflow_signals: BTreeMap<String, WeightedSignal>,
    /// Negative-weight signals, name -> weight + payload.
    pub outflow_signals: BTreeMap<String, WeightedSignal>,
}

pub struct SignalAggregator<'a> {
    config: &'a Config,
}

impl<'a> SignalAggregator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Aggregate triggered signals into a score, rating and recommendation.
    ///
    /// Callers pass only the signals they consider triggered; the `detected`
    /// flag is not consulted here. Names without a configured weight are
    /// ignored.
    pub fn aggregate(&self, signals: &[Signal]) -> AggregateResult {
        let mut raw_score = 0i32;
        let mut signal_count = 0usize;
        let mut inflow = BTreeMap::new();
        let mut outflow = BTreeMap::new();

        for signal in signals {
            let Some(weight) = self.config.weight_of(signal.name) else {
                debug!(signal = signal.name, "no weight configured, skipping");
                continue;
            };
            raw_score += weight;
            signal_count += 1;
            let entry = WeightedSignal {
                weight,
                signal: signal.clone(),
            };
            if weight > 0 {
                inflow.insert(signal.name.to_string(), entry);
            } else if weight < 0 {
                outflow.insert(signal.name.to_string(), entry);
            }
        }

        let total_score = raw_score.clamp(SCORE_MIN, SCORE_MAX);
        let rating = self.rating_for(total_score);
        debug!(raw_score, total_score, %rating, "signals aggregated");

        AggregateResult {
            total_score,
            raw_score,
            rating,
            recommendation: recommendation(rating, total_score),
            signal_count,
            inflow_signals: inflow,
            outflow_signals: outflow,
        }
    }

    /// Map a clamped score onto the configured rating bands. Scores outside
    /// every band fall back to neutral.
    pub fn rating_for(&self, score: i32) -> Rating {
        self.config
            .rating_bands
            .iter()
            .find(|band| score >= band.min && score <= band.max)
            .map(|band| band.rating)
            .unwrap_or(Rating::Neutral)
    }
}

fn recommendation(rating: Rating, score: i32) -> String {
    match rating {
        Rating::StrongBuy => format!(
            "Strong accumulation evidence (score {score}); smart money appears to be building positions"
        ),
        Rating::Buy => format!(
            "Accumulation signals outweigh distribution (score {score}); moderate inflow detected"
        ),
        Rating::Neutral => format!(
            "Mixed or absent signals (score {score}); no clear smart-money direction"
        ),
        Rating::Sell => format!(
            "Distribution signals outweigh accumulation (score {score}); moderate outflow detected"
        ),
        Rating::StrongSell => format!(
            "Strong distribution evidence (score {score}); smart money appears to be exiting"
        ),
    }
}

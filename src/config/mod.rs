//! Static analysis configuration: signal weights, detector thresholds and
//! rating bands.
//!
//! One `Config` is built at process start and passed by reference into every
//! detector and the aggregator, so alternate weight sets are just alternate
//! `Config` values.

use serde::{Deserialize, Serialize};

use crate::aggregator::Rating;

/// Execution environment, read from `APP_ENV` (defaults to "sandbox").
pub fn get_environment() -> String {
    std::env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Price/volume detector parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvParams {
    /// Lookback window in trading days.
    pub lookback_period: usize,
    /// Volume expansion threshold relative to the lookback average.
    pub vol_multiplier: f64,
    /// Price stagnation threshold, e.g. 0.02 for 2%.
    pub price_change_threshold: f64,
    /// Single-day decline threshold, e.g. 0.03 for 3%.
    pub decline_threshold: f64,
    /// Moving-average support periods checked by the support-break detector.
    pub support_ma_periods: Vec<usize>,
}

impl Default for PvParams {
    fn default() -> Self {
        Self {
            lookback_period: 60,
            vol_multiplier: 2.0,
            price_change_threshold: 0.02,
            decline_threshold: 0.03,
            support_ma_periods: vec![20, 60, 120],
        }
    }
}

/// Technical-indicator detector parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub obv_lookback: usize,
    pub mfi_period: usize,
    pub mfi_lookback: usize,
    pub rsi_period: usize,
    pub rsi_lookback: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub macd_lookback: usize,
    /// Local-extremum window half-width.
    pub extrema_order: usize,
    /// Max bar offset when pairing price and indicator extrema.
    pub divergence_tolerance: usize,
    pub mfi_oversold: f64,
    pub mfi_overbought: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            obv_lookback: 60,
            mfi_period: 14,
            mfi_lookback: 60,
            rsi_period: 14,
            rsi_lookback: 60,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            macd_lookback: 60,
            extrema_order: 5,
            divergence_tolerance: 10,
            mfi_oversold: 20.0,
            mfi_overbought: 80.0,
        }
    }
}

/// Structural (disclosure) detector parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralParams {
    /// Relative shareholder-count change threshold, e.g. 0.15 for 15%.
    pub shareholder_increase_threshold: f64,
    /// Per-holder ratio change threshold, e.g. 0.05 for 5 percentage points.
    pub institutional_reduction_threshold: f64,
}

impl Default for StructuralParams {
    fn default() -> Self {
        Self {
            shareholder_increase_threshold: 0.15,
            institutional_reduction_threshold: 0.05,
        }
    }
}

/// Relative-strength detector parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelativeStrengthParams {
    pub rsp_ma_period: usize,
    pub lookback_period: usize,
    /// Relative underperformance threshold, e.g. 0.05 for 5%.
    pub underperformance_threshold: f64,
}

impl Default for RelativeStrengthParams {
    fn default() -> Self {
        Self {
            rsp_ma_period: 20,
            lookback_period: 60,
            underperformance_threshold: 0.05,
        }
    }
}

/// Closed integer score interval mapped to a rating.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RatingBand {
    pub rating: Rating,
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Signal name -> integer weight. Positive weights are accumulation
    /// signals, negative are distribution signals.
    pub signal_weights: Vec<(&'static str, i32)>,
    pub pv: PvParams,
    pub indicators: IndicatorParams,
    pub structural: StructuralParams,
    pub relative_strength: RelativeStrengthParams,
    /// Disjoint closed intervals covering [-10, 10], checked in order.
    pub rating_bands: Vec<RatingBand>,
}

impl Config {
    pub fn weight_of(&self, signal_name: &str) -> Option<i32> {
        self.signal_weights
            .iter()
            .find(|(name, _)| *name == signal_name)
            .map(|(_, weight)| *weight)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            signal_weights: vec![
                // Accumulation (inflow)
                ("ACCUMULATION_BREAKOUT", 2),
                ("WYCKOFF_SPRING", 2),
                ("OBV_BULLISH_DIVERGENCE", 2),
                ("MFI_BULLISH_DIVERGENCE", 2),
                ("RSI_BULLISH_DIVERGENCE", 1),
                ("MACD_BULLISH_DIVERGENCE", 2),
                ("MFI_OVERSOLD", 1),
                ("NEW_INSTITUTION", 3),
                ("INSTITUTIONAL_BUY_IN", 3),
                ("SHAREHOLDER_COUNT_DECREASE", 2),
                // Distribution (outflow)
                ("HIGH_VOLUME_STAGNATION", -2),
                ("HIGH_VOLUME_DECLINE", -2),
                ("BREAK_SUPPORT_HEAVY_VOLUME", -3),
                ("LOW_VOLUME_RISE", -1),
                ("OBV_BEARISH_DIVERGENCE", -2),
                ("MFI_BEARISH_DIVERGENCE", -2),
                ("RSI_BEARISH_DIVERGENCE", -1),
                ("MACD_BEARISH_DIVERGENCE", -2),
                ("MFI_OVERBOUGHT", -1),
                ("INSTITUTIONAL_SELL_OFF", -3),
                ("SHAREHOLDER_COUNT_INCREASE", -3),
                ("RELATIVE_STRENGTH_WEAK", -2),
            ],
            pv: PvParams::default(),
            indicators: IndicatorParams::default(),
            structural: StructuralParams::default(),
            relative_strength: RelativeStrengthParams::default(),
            rating_bands: vec![
                RatingBand { rating: Rating::StrongBuy, min: 6, max: 10 },
                RatingBand { rating: Rating::Buy, min: 2, max: 5 },
                RatingBand { rating: Rating::Neutral, min: -1, max: 1 },
                RatingBand { rating: Rating::Sell, min: -5, max: -2 },
                RatingBand { rating: Rating::StrongSell, min: -10, max: -6 },
            ],
        }
    }
}

//! Price/volume pattern detectors.
//!
//! Accumulation side: breakout from consolidation, Wyckoff spring.
//! Distribution side: high-volume stagnation, high-volume decline, support
//! break on heavy volume, low-volume rise into new highs.
//!
//! Every detector is a pure function over the bar sequence: insufficient
//! history or missing derived fields yield an undetected signal, never an
//! error, and the input slice is never mutated.

use serde_json::json;
use tracing::debug;

use crate::config::Config;
use crate::models::{Bar, Severity, Signal, SignalKind};

pub struct PriceVolumeSignals<'a> {
    config: &'a Config,
}

impl<'a> PriceVolumeSignals<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Run all price/volume detectors and return only the triggered signals.
    pub fn analyze(&self, bars: &[Bar]) -> Vec<Signal> {
        if bars.len() < self.config.pv.lookback_period {
            debug!(bars = bars.len(), "insufficient history for price/volume analysis");
            return Vec::new();
        }

        [
            self.detect_accumulation_breakout(bars),
            self.detect_wyckoff_spring(bars),
            self.detect_high_volume_stagnation(bars),
            self.detect_high_volume_decline(bars),
            self.detect_break_support(bars),
            self.detect_low_volume_rise(bars),
        ]
        .into_iter()
        .filter(|s| s.detected)
        .collect()
    }

    /// Breakout from a consolidation range on expanding volume.
    ///
    /// Requires all four gates at once: a tight lookback range (< 20% of the
    /// window low), recent volume above `vol_multiplier` times the baseline,
    /// the latest close above 95% of the pre-recent-window high, and a close
    /// within 2% of the day's high.
    pub fn detect_accumulation_breakout(&self, bars: &[Bar]) -> Signal {
        const NAME: &str = "ACCUMULATION_BREAKOUT";
        let lookback = self.config.pv.lookback_period;
        let recent_days = 5;

        if bars.len() < lookback {
            return Signal::not_detected(NAME, SignalKind::Accumulation);
        }

        let window = &bars[bars.len() - lookback..];
        let window_high = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let window_low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let price_range = (window_high - window_low) / window_low;
        let is_consolidating = price_range < 0.20;

        let baseline = mean_volume(&bars[bars.len() - lookback..]);
        let recent = &bars[bars.len() - recent_days..];
        let recent_volume = mean_volume(recent);
        let volume_ratio = recent_volume / baseline;
        let is_high_volume = recent_volume > baseline * self.config.pv.vol_multiplier;

        // Breakout level: the high of the window excluding the recent days.
        let pre_recent = &bars[bars.len() - lookback..bars.len() - recent_days];
        let previous_high = pre_recent.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let last = &bars[bars.len() - 1];
        let is_breakout = last.close > previous_high * 0.95;
        let close_near_high = last.close / last.high > 0.98;

        let detected = is_consolidating && is_high_volume && is_breakout && close_near_high;
        debug!(
            consolidating = is_consolidating,
            range = format!("{:.2}%", price_range * 100.0),
            volume_ratio = format!("{volume_ratio:.2}x"),
            breakout = is_breakout,
            strong_close = close_near_high,
            detected,
            "accumulation breakout check"
        );

        Signal {
            name: NAME,
            detected,
            severity: if detected { Severity::High } else { Severity::None },
            kind: SignalKind::Accumulation,
            description: format!(
                "Volume breakout from consolidation ({volume_ratio:.2}x average volume, breakout level {previous_high:.2})"
            ),
            signal_date: Some(last.date),
            details: json!({
                "consolidation_range": format!("{:.2}%", price_range * 100.0),
                "volume_ratio": format!("{volume_ratio:.2}x"),
                "breakout_price": previous_high,
                "current_price": last.close,
            }),
        }
    }

    /// Wyckoff spring: a low-volume dip below the 20-day moving average that
    /// recovers within one or two bars. Scans the last 10 bars and returns on
    /// the first match.
    pub fn detect_wyckoff_spring(&self, bars: &[Bar]) -> Signal {
        const NAME: &str = "WYCKOFF_SPRING";
        let lookback = self.config.pv.lookback_period;
        let recent_days = 10;

        if bars.len() < lookback || bars.last().and_then(|b| b.ma20).is_none() {
            return Signal::not_detected(NAME, SignalKind::Accumulation);
        }

        let start = bars.len() - recent_days;
        // Needs one bar before and two after inside the scan window.
        for i in start + 1..bars.len() - 2 {
            let bar = &bars[i];
            let (Some(ma20), Some(prev_ma20)) = (bar.ma20, bars[i - 1].ma20) else {
                continue;
            };
            let Some(baseline) = rolling_volume(bars, i, lookback) else {
                continue;
            };

            let broke_support = bar.low < ma20;
            let prev_above_ma = bars[i - 1].close > prev_ma20;
            let volume_ratio = bar.volume / baseline;
            let low_volume = volume_ratio < 1.5;
            let quick_recovery = bars[i + 1].close > ma20 || bars[i + 2].close > ma20;

            if broke_support && prev_above_ma && low_volume && quick_recovery {
                debug!(
                    support = ma20,
                    low = bar.low,
                    volume_ratio = format!("{volume_ratio:.2}x"),
                    "wyckoff spring found"
                );
                return Signal {
                    name: NAME,
                    detected: true,
                    severity: Severity::High,
                    kind: SignalKind::Accumulation,
                    description: format!(
                        "Wyckoff spring (dip below support {ma20:.2} recovered within two bars)"
                    ),
                    signal_date: Some(bar.date),
                    details: json!({
                        "support_level": ma20,
                        "low_price": bar.low,
                        "volume_ratio": format!("{volume_ratio:.2}x"),
                        "recovery_close": bars[i + 1].close,
                    }),
                };
            }
        }

        Signal::not_detected(NAME, SignalKind::Accumulation)
    }

    /// Heavy volume with a stalled price after an established uptrend.
    pub fn detect_high_volume_stagnation(&self, bars: &[Bar]) -> Signal {
        const NAME: &str = "HIGH_VOLUME_STAGNATION";
        let lookback = self.config.pv.lookback_period;
        let recent_days = 5;

        if bars.len() < lookback {
            return Signal::not_detected(NAME, SignalKind::Distribution);
        }

        let last = &bars[bars.len() - 1];
        let trend_gain = last.close / bars[bars.len() - lookback].close - 1.0;
        if trend_gain <= 0.10 {
            debug!(gain = format!("{:.2}%", trend_gain * 100.0), "no uptrend, stagnation skipped");
            return Signal::not_detected(NAME, SignalKind::Distribution);
        }

        let baseline = mean_volume(&bars[bars.len() - lookback..]);
        let recent = &bars[bars.len() - recent_days..];
        let volume_ratio = mean_volume(recent) / baseline;
        let is_high_volume = volume_ratio > self.config.pv.vol_multiplier;

        let recent_change = last.close / recent[0].close - 1.0;
        let is_stagnant = recent_change.abs() < self.config.pv.price_change_threshold;

        let detected = is_high_volume && is_stagnant;
        debug!(
            volume_ratio = format!("{volume_ratio:.2}x"),
            recent_change = format!("{:.2}%", recent_change * 100.0),
            detected,
            "high-volume stagnation check"
        );

        Signal {
            name: NAME,
            detected,
            severity: if detected { Severity::High } else { Severity::None },
            kind: SignalKind::Distribution,
            description: format!(
                "Heavy volume with stalled price after an uptrend (recent change {:.2}%, {volume_ratio:.2}x average volume)",
                recent_change * 100.0
            ),
            signal_date: Some(last.date),
            details: json!({
                "trend_gain": format!("{:.2}%", trend_gain * 100.0),
                "recent_change": format!("{:.2}%", recent_change * 100.0),
                "volume_ratio": format!("{volume_ratio:.2}x"),
            }),
        }
    }

    /// Sharp single-day declines on heavy volume within the last three bars.
    /// Aggregates the worst decline and highest volume ratio across matches.
    pub fn detect_high_volume_decline(&self, bars: &[Bar]) -> Signal {
        const NAME: &str = "HIGH_VOLUME_DECLINE";
        let lookback = self.config.pv.lookback_period;

        if bars.len() < lookback {
            return Signal::not_detected(NAME, SignalKind::Distribution);
        }

        let mut signal_dates = Vec::new();
        let mut max_decline = 0.0_f64;
        let mut max_volume_ratio = 0.0_f64;

        for i in bars.len() - 3..bars.len() {
            if i == 0 {
                continue;
            }
            let Some(baseline) = rolling_volume(bars, i, lookback) else {
                continue;
            };
            let decline = bars[i].close / bars[i - 1].close - 1.0;
            let volume_ratio = bars[i].volume / baseline;

            if decline < -self.config.pv.decline_threshold
                && volume_ratio > self.config.pv.vol_multiplier
            {
                debug!(
                    decline = format!("{:.2}%", decline * 100.0),
                    volume_ratio = format!("{volume_ratio:.2}x"),
                    "high-volume decline day"
                );
                signal_dates.push(bars[i].date);
                max_decline = max_decline.min(decline);
                max_volume_ratio = max_volume_ratio.max(volume_ratio);
            }
        }

        let detected = !signal_dates.is_empty();
        Signal {
            name: NAME,
            detected,
            severity: if detected { Severity::High } else { Severity::None },
            kind: SignalKind::Distribution,
            description: format!(
                "Decline on heavy volume (worst {:.2}%, up to {max_volume_ratio:.2}x average volume)",
                max_decline * 100.0
            ),
            signal_date: signal_dates.last().copied(),
            details: json!({
                "max_decline": format!("{:.2}%", max_decline * 100.0),
                "max_volume_ratio": format!("{max_volume_ratio:.2}x"),
                "signal_days": signal_dates.len(),
            }),
        }
    }

    /// Volume-confirmed breaks of configured moving-average support lines
    /// within the last five bars. All breaks found are reported together.
    pub fn detect_break_support(&self, bars: &[Bar]) -> Signal {
        const NAME: &str = "BREAK_SUPPORT_HEAVY_VOLUME";
        let lookback = self.config.pv.lookback_period;
        let ma_periods = &self.config.pv.support_ma_periods;
        let min_len = ma_periods.iter().copied().max().unwrap_or(lookback);

        if bars.len() < min_len {
            return Signal::not_detected(NAME, SignalKind::Distribution);
        }

        let mut broken = Vec::new();
        for i in bars.len().saturating_sub(5)..bars.len() {
            if i == 0 {
                continue;
            }
            let Some(baseline) = rolling_volume(bars, i, lookback) else {
                continue;
            };
            let volume_ratio = bars[i].volume / baseline;
            if volume_ratio <= self.config.pv.vol_multiplier {
                continue;
            }

            for &period in ma_periods {
                let Some(ma_value) = bars[i].ma(period) else {
                    continue;
                };
                let prev_close = bars[i - 1].close;
                if prev_close > ma_value && bars[i].close < ma_value {
                    broken.push(json!({
                        "type": format!("MA{period}"),
                        "level": ma_value,
                        "volume_ratio": volume_ratio,
                        "date": bars[i].date,
                    }));
                }
            }
        }

        let detected = !broken.is_empty();
        if !detected {
            debug!("no volume-confirmed support break");
        }
        let labels: Vec<String> = broken
            .iter()
            .filter_map(|b| b["type"].as_str().map(String::from))
            .collect();
        let first_date = broken
            .first()
            .and_then(|b| serde_json::from_value(b["date"].clone()).ok());

        Signal {
            name: NAME,
            detected,
            severity: if detected { Severity::Critical } else { Severity::None },
            kind: SignalKind::Distribution,
            description: format!(
                "Heavy-volume break of {} support line(s): {}",
                broken.len(),
                labels.join(", ")
            ),
            signal_date: first_date,
            details: json!({ "broken_supports": broken }),
        }
    }

    /// New highs on shrinking volume late in an uptrend: price slope positive
    /// and volume slope negative over the last ten bars, with the latest close
    /// at a lookback-window high.
    pub fn detect_low_volume_rise(&self, bars: &[Bar]) -> Signal {
        const NAME: &str = "LOW_VOLUME_RISE";
        let lookback = self.config.pv.lookback_period;

        if bars.len() < lookback {
            return Signal::not_detected(NAME, SignalKind::Distribution);
        }

        let last = &bars[bars.len() - 1];
        let trend_gain = last.close / bars[bars.len() - lookback].close - 1.0;
        if trend_gain <= 0.10 {
            debug!(gain = format!("{:.2}%", trend_gain * 100.0), "no uptrend, low-volume rise skipped");
            return Signal::not_detected(NAME, SignalKind::Distribution);
        }

        let recent = &bars[bars.len() - 10..];
        let closes: Vec<f64> = recent.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = recent.iter().map(|b| b.volume).collect();
        let price_slope = slope(&closes);
        let volume_slope = slope(&volumes);

        let window_max = bars[bars.len() - lookback..]
            .iter()
            .map(|b| b.close)
            .fold(f64::NEG_INFINITY, f64::max);
        let is_new_high = last.close >= window_max;

        let detected = price_slope > 0.0 && volume_slope < 0.0 && is_new_high;
        debug!(
            price_slope,
            volume_slope,
            new_high = is_new_high,
            detected,
            "low-volume rise check"
        );

        Signal {
            name: NAME,
            detected,
            severity: if detected { Severity::Medium } else { Severity::None },
            kind: SignalKind::Distribution,
            description: format!(
                "New highs on shrinking volume (volume slope {volume_slope:.0})"
            ),
            signal_date: Some(last.date),
            details: json!({
                "trend_gain": format!("{:.2}%", trend_gain * 100.0),
                "price_slope": price_slope,
                "volume_slope": volume_slope,
                "is_new_high": is_new_high,
            }),
        }
    }
}

fn mean_volume(bars: &[Bar]) -> f64 {
    bars.iter().map(|b| b.volume).sum::<f64>() / bars.len() as f64
}

/// Average volume of the `lookback` bars ending at `i`, or `None` during the
/// warm-up region.
fn rolling_volume(bars: &[Bar], i: usize, lookback: usize) -> Option<f64> {
    if i + 1 < lookback {
        return None;
    }
    Some(mean_volume(&bars[i + 1 - lookback..=i]))
}

/// Least-squares slope of `values` against their positions.
pub fn slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 2 {
        return 0.0;
    }
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;
    let mut num = 0.0;
    let mut den = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }
    num / den
}

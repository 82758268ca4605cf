//! Derived-column enrichment for bar history.
//!
//! `enrich` fills the optional columns on [`Bar`] in place: the moving
//! averages the support-break detector reads, plus OBV, RSI, MACD and MFI for
//! the divergence and band detectors. Warm-up positions stay `None`.

use crate::config::IndicatorParams;
use crate::models::Bar;

/// Compute every derived column over `bars`, oldest first.
pub fn enrich(bars: &mut [Bar], params: &IndicatorParams) {
    fill_moving_averages(bars);
    fill_obv(bars);
    fill_rsi(bars, params.rsi_period);
    fill_macd(bars, params.macd_fast, params.macd_slow, params.macd_signal);
    fill_mfi(bars, params.mfi_period);
}

fn fill_moving_averages(bars: &mut [Bar]) {
    for period in [20usize, 60, 120] {
        let means = rolling_mean(bars, period);
        for (bar, mean) in bars.iter_mut().zip(means) {
            match period {
                20 => bar.ma20 = mean,
                60 => bar.ma60 = mean,
                _ => bar.ma120 = mean,
            }
        }
    }
}

fn rolling_mean(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; bars.len()];
    if period == 0 {
        return out;
    }
    let mut sum = 0.0;
    for i in 0..bars.len() {
        sum += bars[i].close;
        if i >= period {
            sum -= bars[i - period].close;
        }
        if i + 1 >= period {
            out[i] = Some(sum / period as f64);
        }
    }
    out
}

/// Cumulative signed volume: add volume on up closes, subtract on down
/// closes, carry on flat closes.
fn fill_obv(bars: &mut [Bar]) {
    let mut obv = 0.0;
    let mut prev_close = None;
    for bar in bars.iter_mut() {
        if let Some(prev) = prev_close {
            if bar.close > prev {
                obv += bar.volume;
            } else if bar.close < prev {
                obv -= bar.volume;
            }
        }
        prev_close = Some(bar.close);
        bar.obv = Some(obv);
    }
}

/// Simple-mean RSI over `period` close-to-close changes.
fn fill_rsi(bars: &mut [Bar], period: usize) {
    if period == 0 || bars.len() <= period {
        return;
    }
    let changes: Vec<f64> = (1..bars.len())
        .map(|i| bars[i].close - bars[i - 1].close)
        .collect();
    for i in period..bars.len() {
        let window = &changes[i - period..i];
        let gain: f64 = window.iter().filter(|c| **c > 0.0).sum::<f64>() / period as f64;
        let loss: f64 = -window.iter().filter(|c| **c < 0.0).sum::<f64>() / period as f64;
        // A window with no movement at all leaves the value undefined.
        if gain == 0.0 && loss == 0.0 {
            continue;
        }
        let rsi = if loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + gain / loss)
        };
        bars[i].rsi = Some(rsi);
    }
}

/// MACD line, signal line and histogram from exponential moving averages of
/// the close.
fn fill_macd(bars: &mut [Bar], fast: usize, slow: usize, signal_period: usize) {
    if bars.is_empty() {
        return;
    }
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let fast_ema = ema(&closes, fast);
    let slow_ema = ema(&closes, slow);
    let macd: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema(&macd, signal_period);
    for (i, bar) in bars.iter_mut().enumerate() {
        bar.macd = Some(macd[i]);
        bar.macd_signal = Some(signal[i]);
        bar.macd_hist = Some(macd[i] - signal[i]);
    }
}

fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let alpha = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut current = 0.0;
    for (i, value) in values.iter().enumerate() {
        current = if i == 0 {
            *value
        } else {
            alpha * value + (1.0 - alpha) * current
        };
        out.push(current);
    }
    out
}

/// Money flow index over `period` bars of typical-price money flow.
fn fill_mfi(bars: &mut [Bar], period: usize) {
    if period == 0 || bars.len() <= period {
        return;
    }
    let typical: Vec<f64> = bars
        .iter()
        .map(|b| (b.high + b.low + b.close) / 3.0)
        .collect();
    // Signed money flow per bar, relative to the previous typical price.
    let flows: Vec<f64> = (1..bars.len())
        .map(|i| {
            let raw = typical[i] * bars[i].volume;
            if typical[i] > typical[i - 1] {
                raw
            } else if typical[i] < typical[i - 1] {
                -raw
            } else {
                0.0
            }
        })
        .collect();
    for i in period..bars.len() {
        let window = &flows[i - period..i];
        let positive: f64 = window.iter().filter(|f| **f > 0.0).sum();
        let negative: f64 = -window.iter().filter(|f| **f < 0.0).sum::<f64>();
        if positive == 0.0 && negative == 0.0 {
            continue;
        }
        let mfi = if negative == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + positive / negative)
        };
        bars[i].mfi = Some(mfi);
    }
}

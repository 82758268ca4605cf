//! Price/indicator divergence matching.
//!
//! A divergence is confirmed only when price makes a genuine new extreme
//! (strictly beyond the prior one) while the companion indicator fails to
//! confirm it. One parametrized routine covers both polarities so the
//! monotonic guard and the tie-break live in a single place.

use serde::{Deserialize, Serialize};

/// Divergence polarity. Bearish compares peaks (higher high in price, lower
/// high in the indicator); bullish compares troughs (lower low in price,
/// higher low in the indicator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bearish,
    Bullish,
}

/// Confirmed divergence between the two most recent price extrema and their
/// matched indicator extrema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivergenceResult {
    pub price_first: f64,
    pub price_second: f64,
    /// Relative price change between the two extrema, e.g. 0.03 for +3%.
    pub price_change: f64,
    pub indicator_first: f64,
    pub indicator_second: f64,
    pub indicator_change: f64,
    /// `abs(indicator_change)`.
    pub strength: f64,
}

/// Match the two most recent price extrema against indicator extrema within
/// `tolerance` bars and evaluate the divergence condition for `direction`.
///
/// Returns `None` when either list has fewer than two extrema, when price
/// fails the monotonic guard (no strict new high for bearish, no strict new
/// low for bullish), when either price extremum has no indicator extremum
/// within tolerance, or when the indicator confirms the move.
///
/// When several indicator extrema fall within tolerance of one price
/// extremum, the closest by index wins; on equal distance the later one is
/// taken.
pub fn match_divergence(
    prices: &[f64],
    indicator: &[f64],
    price_extrema: &[usize],
    indicator_extrema: &[usize],
    direction: Direction,
    tolerance: usize,
) -> Option<DivergenceResult> {
    if price_extrema.len() < 2 || indicator_extrema.len() < 2 {
        return None;
    }

    let p1 = price_extrema[price_extrema.len() - 2];
    let p2 = price_extrema[price_extrema.len() - 1];
    let price_first = prices[p1];
    let price_second = prices[p2];

    // Monotonic guard: price must make a strict new extreme.
    let new_extreme = match direction {
        Direction::Bearish => price_second > price_first,
        Direction::Bullish => price_second < price_first,
    };
    if !new_extreme {
        return None;
    }

    let indicator_first = indicator[nearest_within(indicator_extrema, p1, tolerance)?];
    let indicator_second = indicator[nearest_within(indicator_extrema, p2, tolerance)?];

    // The indicator must fail to confirm the new extreme.
    let diverged = match direction {
        Direction::Bearish => indicator_second < indicator_first,
        Direction::Bullish => indicator_second > indicator_first,
    };
    if !diverged {
        return None;
    }

    let indicator_change = indicator_second / indicator_first - 1.0;
    Some(DivergenceResult {
        price_first,
        price_second,
        price_change: price_second / price_first - 1.0,
        indicator_first,
        indicator_second,
        indicator_change,
        strength: indicator_change.abs(),
    })
}

/// Index of the extremum closest to `target` within `tolerance` bars, ties
/// resolved toward the later index.
fn nearest_within(extrema: &[usize], target: usize, tolerance: usize) -> Option<usize> {
    let mut best: Option<usize> = None;
    for &idx in extrema {
        let distance = idx.abs_diff(target);
        if distance > tolerance {
            continue;
        }
        match best {
            Some(current) if distance > current.abs_diff(target) => {}
            _ => best = Some(idx),
        }
    }
    best
}

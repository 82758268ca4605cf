//! Windowed local-extremum search over a numeric series.
//!
//! Every divergence detector starts here: peaks of the price series are
//! compared against peaks of a companion indicator (and symmetrically for
//! troughs).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtremumRole {
    Peak,
    Trough,
}

/// Indices of local extrema of `series` with window half-width `order`.
///
/// An index `i` qualifies when `order <= i < len - order` and `series[i]`
/// equals the window max (peak) or min (trough) over the inclusive range
/// `[i - order, i + order]`. Equality is deliberate: a flat plateau can yield
/// several adjacent extrema. A series shorter than `2 * order + 1` yields an
/// empty list.
pub fn find_extrema(series: &[f64], order: usize, role: ExtremumRole) -> Vec<usize> {
    if series.len() < 2 * order + 1 {
        return Vec::new();
    }

    let mut extrema = Vec::new();
    for i in order..series.len() - order {
        let window = &series[i - order..=i + order];
        let bound = match role {
            ExtremumRole::Peak => window.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            ExtremumRole::Trough => window.iter().cloned().fold(f64::INFINITY, f64::min),
        };
        if series[i] == bound {
            extrema.push(i);
        }
    }
    extrema
}

/// Peak indices of `series`; see [`find_extrema`].
pub fn find_peaks(series: &[f64], order: usize) -> Vec<usize> {
    find_extrema(series, order, ExtremumRole::Peak)
}

/// Trough indices of `series`; see [`find_extrema`].
pub fn find_troughs(series: &[f64], order: usize) -> Vec<usize> {
    find_extrema(series, order, ExtremumRole::Trough)
}

//! Tests for price/indicator divergence matching.

use fundflow::analysis::{match_divergence, Direction};

fn series(pairs: &[(usize, f64)], len: usize) -> Vec<f64> {
    let mut values = vec![0.0; len];
    for &(idx, value) in pairs {
        values[idx] = value;
    }
    values
}

#[test]
fn bearish_divergence_confirmed_on_unconfirmed_new_high() {
    let prices = series(&[(2, 10.0), (8, 11.0)], 11);
    let indicator = series(&[(2, 100.0), (8, 90.0)], 11);
    let result =
        match_divergence(&prices, &indicator, &[2, 8], &[2, 8], Direction::Bearish, 10)
            .unwrap();
    assert!((result.price_change - 0.10).abs() < 1e-9);
    assert!((result.indicator_change - (-0.10)).abs() < 1e-9);
    assert!((result.strength - 0.10).abs() < 1e-9);
}

#[test]
fn bullish_divergence_confirmed_on_unconfirmed_new_low() {
    let prices = series(&[(2, 10.0), (8, 9.0)], 11);
    let indicator = series(&[(2, 50.0), (8, 55.0)], 11);
    let result =
        match_divergence(&prices, &indicator, &[2, 8], &[2, 8], Direction::Bullish, 10)
            .unwrap();
    assert!((result.strength - 0.10).abs() < 1e-9);
}

#[test]
fn equal_price_extrema_fail_the_monotonic_guard() {
    let prices = series(&[(2, 10.0), (8, 10.0)], 11);
    let indicator = series(&[(2, 100.0), (8, 90.0)], 11);
    assert!(
        match_divergence(&prices, &indicator, &[2, 8], &[2, 8], Direction::Bearish, 10)
            .is_none()
    );
    assert!(
        match_divergence(&prices, &indicator, &[2, 8], &[2, 8], Direction::Bullish, 10)
            .is_none()
    );
}

#[test]
fn confirming_indicator_yields_no_divergence() {
    // Price and indicator both make higher highs.
    let prices = series(&[(2, 10.0), (8, 11.0)], 11);
    let indicator = series(&[(2, 100.0), (8, 110.0)], 11);
    assert!(
        match_divergence(&prices, &indicator, &[2, 8], &[2, 8], Direction::Bearish, 10)
            .is_none()
    );
}

#[test]
fn fewer_than_two_extrema_on_either_side_yields_none() {
    let prices = series(&[(2, 10.0), (8, 11.0)], 11);
    let indicator = series(&[(2, 100.0), (8, 90.0)], 11);
    assert!(match_divergence(&prices, &indicator, &[8], &[2, 8], Direction::Bearish, 10).is_none());
    assert!(match_divergence(&prices, &indicator, &[2, 8], &[8], Direction::Bearish, 10).is_none());
}

#[test]
fn indicator_extremum_outside_tolerance_yields_none() {
    let prices = series(&[(2, 10.0), (8, 11.0)], 25);
    let indicator = series(&[(2, 100.0), (20, 90.0)], 25);
    assert!(
        match_divergence(&prices, &indicator, &[2, 8], &[2, 20], Direction::Bearish, 3)
            .is_none()
    );
}

#[test]
fn equidistant_indicator_extrema_resolve_to_the_later_index() {
    let prices = series(&[(2, 10.0), (8, 12.0)], 11);
    // Indicator extrema at 6 and 10 are both two bars from price extremum 8.
    let indicator = series(&[(2, 3.0), (6, 1.0), (10, 2.0)], 11);
    let result =
        match_divergence(&prices, &indicator, &[2, 8], &[2, 6, 10], Direction::Bearish, 10)
            .unwrap();
    assert_eq!(result.indicator_second, 2.0);
    assert!((result.strength - (1.0 - 2.0 / 3.0)).abs() < 1e-9);
}

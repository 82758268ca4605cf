//! Tests for the windowed local-extremum search.

use fundflow::analysis::{find_extrema, find_peaks, find_troughs, ExtremumRole};

#[test]
fn single_peak_at_tent_apex() {
    let series = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0, 2.0, 1.0, 0.0];
    assert_eq!(find_peaks(&series, 5), vec![5]);
    assert!(find_troughs(&series, 5).is_empty());
}

#[test]
fn single_trough_at_valley_bottom() {
    let series = [0.0, -1.0, -2.0, -3.0, -4.0, -5.0, -4.0, -3.0, -2.0, -1.0, 0.0];
    assert_eq!(find_troughs(&series, 5), vec![5]);
    assert!(find_peaks(&series, 5).is_empty());
}

#[test]
fn plateau_yields_adjacent_peaks() {
    let series = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 5.0, 4.0, 3.0, 2.0, 1.0, 0.0];
    assert_eq!(find_peaks(&series, 5), vec![5, 6]);
}

#[test]
fn series_shorter_than_window_yields_nothing() {
    let series = [1.0, 5.0, 1.0, 5.0, 1.0, 5.0, 1.0, 5.0, 1.0, 5.0];
    assert!(find_extrema(&series, 5, ExtremumRole::Peak).is_empty());
    assert!(find_extrema(&series, 5, ExtremumRole::Trough).is_empty());
}

#[test]
fn boundary_indices_never_qualify() {
    let mut series = vec![0.0; 15];
    series[0] = 100.0;
    series[14] = 100.0;
    series[7] = 50.0;
    let peaks = find_peaks(&series, 3);
    assert!(peaks.iter().all(|&i| (3..12).contains(&i)));
    assert!(peaks.contains(&7));
}

#[test]
fn smaller_order_finds_more_peaks() {
    let series = [0.0, 3.0, 0.0, 2.0, 0.0, 5.0, 0.0, 2.0, 0.0, 3.0, 0.0];
    assert_eq!(find_peaks(&series, 1), vec![1, 3, 5, 7, 9]);
    assert_eq!(find_peaks(&series, 5), vec![5]);
}

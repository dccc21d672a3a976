use serde::{Deserialize, Serialize};

use crate::enums::TrendDirection;

/// Least-squares line over an index domain, described by its endpoint
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trendline {
    pub start: f64,
    pub end: f64,
}

/// Strict local maxima. Plateaus are not peaks; endpoints never qualify.
pub fn find_peaks(series: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    for i in 1..series.len().saturating_sub(1) {
        if series[i] > series[i - 1] && series[i] > series[i + 1] {
            peaks.push(i);
        }
    }
    peaks
}

/// Strict local minima, mirror of find_peaks.
pub fn find_troughs(series: &[f64]) -> Vec<usize> {
    let mut troughs = Vec::new();
    for i in 1..series.len().saturating_sub(1) {
        if series[i] < series[i - 1] && series[i] < series[i + 1] {
            troughs.push(i);
        }
    }
    troughs
}

/// Ordinary least-squares fit of value against index. Returns None when
/// the slope sign disagrees with the requested direction, so a flat
/// series fits neither way.
pub fn fit_trendline(series: &[f64], direction: TrendDirection) -> Option<Trendline> {
    let n = series.len();
    if n < 2 {
        return None;
    }

    let n_f = n as f64;
    let sum_x: f64 = (0..n).map(|i| i as f64).sum();
    let sum_y: f64 = series.iter().sum();
    let sum_xy: f64 = series.iter().enumerate().map(|(i, y)| (i as f64) * y).sum();
    let sum_x2: f64 = (0..n).map(|i| (i as f64) * (i as f64)).sum();

    let denom = n_f * sum_x2 - sum_x * sum_x;
    if denom == 0.0 {
        return None;
    }

    let slope = (n_f * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n_f;

    // Rounding in the OLS sums can leave a residual slope on an exactly
    // flat series; a slope that small is flat, not a trend.
    let mean_abs = series.iter().map(|y| y.abs()).sum::<f64>() / n_f;
    if slope.abs() <= 1e-9 * mean_abs.max(1.0) {
        return None;
    }

    let fits = match direction {
        TrendDirection::Ascending => slope > 0.0,
        TrendDirection::Descending => slope < 0.0,
    };
    if !fits {
        return None;
    }

    Some(Trendline {
        start: intercept,
        end: slope * (n_f - 1.0) + intercept,
    })
}

/// Intersection index of two trendlines sharing an index domain of
/// `domain_len` points. None for parallel lines or a crossing outside
/// the domain.
pub fn find_convergence(a: &Trendline, b: &Trendline, domain_len: usize) -> Option<f64> {
    if domain_len < 2 {
        return None;
    }

    let span = (domain_len - 1) as f64;
    let slope_a = (a.end - a.start) / span;
    let slope_b = (b.end - b.start) / span;

    if (slope_a - slope_b).abs() < f64::EPSILON {
        return None;
    }

    let x = (b.start - a.start) / (slope_a - slope_b);
    if x < 0.0 || x > span {
        return None;
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peaks_are_strict_local_maxima() {
        let series = [1.0, 3.0, 2.0, 5.0, 4.0, 4.0];
        assert_eq!(find_peaks(&series), vec![1, 3]);
    }

    #[test]
    fn monotonic_series_has_no_peaks_or_troughs() {
        let rising: Vec<f64> = (0..10).map(|i| i as f64).collect();
        assert!(find_peaks(&rising).is_empty());
        assert!(find_troughs(&rising).is_empty());

        let falling: Vec<f64> = (0..10).map(|i| (10 - i) as f64).collect();
        assert!(find_peaks(&falling).is_empty());
        assert!(find_troughs(&falling).is_empty());
    }

    #[test]
    fn plateaus_are_not_peaks() {
        let series = [1.0, 2.0, 2.0, 1.0];
        assert!(find_peaks(&series).is_empty());
    }

    #[test]
    fn troughs_mirror_peaks() {
        let series = [5.0, 2.0, 4.0, 1.0, 3.0];
        assert_eq!(find_troughs(&series), vec![1, 3]);
    }

    #[test]
    fn trendline_matches_exact_line() {
        let series: Vec<f64> = (0..10).map(|i| 2.0 * i as f64 + 1.0).collect();
        let line = fit_trendline(&series, TrendDirection::Ascending).unwrap();
        assert!((line.start - 1.0).abs() < 1e-9);
        assert!((line.end - 19.0).abs() < 1e-9);
    }

    #[test]
    fn trendline_rejects_wrong_direction() {
        let rising: Vec<f64> = (0..10).map(|i| i as f64).collect();
        assert!(fit_trendline(&rising, TrendDirection::Descending).is_none());
    }

    #[test]
    fn flat_series_fits_neither_direction() {
        let flat = [4.2; 12];
        assert!(fit_trendline(&flat, TrendDirection::Ascending).is_none());
        assert!(fit_trendline(&flat, TrendDirection::Descending).is_none());
    }

    #[test]
    fn flat_series_stays_flat_at_large_magnitudes() {
        // Rounding residue in the sums scales with the values; the flat
        // check has to scale with them too.
        let flat = [68_500.0; 30];
        assert!(fit_trendline(&flat, TrendDirection::Ascending).is_none());
        assert!(fit_trendline(&flat, TrendDirection::Descending).is_none());
    }

    #[test]
    fn shallow_real_trend_still_fits() {
        let series: Vec<f64> = (0..20).map(|i| 100.0 - 0.01 * i as f64).collect();
        assert!(fit_trendline(&series, TrendDirection::Descending).is_some());
    }

    #[test]
    fn too_short_series_has_no_fit() {
        assert!(fit_trendline(&[1.0], TrendDirection::Ascending).is_none());
    }

    #[test]
    fn convergence_of_crossing_lines() {
        // Over 11 points: a goes 10 -> 0, b goes 0 -> 10. They cross at x = 5.
        let a = Trendline { start: 10.0, end: 0.0 };
        let b = Trendline { start: 0.0, end: 10.0 };
        let x = find_convergence(&a, &b, 11).unwrap();
        assert!((x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn parallel_lines_never_converge() {
        let a = Trendline { start: 10.0, end: 5.0 };
        let b = Trendline { start: 8.0, end: 3.0 };
        assert!(find_convergence(&a, &b, 10).is_none());
    }

    #[test]
    fn convergence_outside_domain_is_rejected() {
        // Narrowing but too slowly to cross within the window.
        let a = Trendline { start: 100.0, end: 95.0 };
        let b = Trendline { start: 50.0, end: 52.0 };
        assert!(find_convergence(&a, &b, 10).is_none());
    }
}

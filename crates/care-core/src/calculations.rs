//! Derived-metric arithmetic shared by both analysis passes.
//!
//! All functions here are total: they never divide by zero and return
//! `None` (or `0.0`) where a ratio has no meaningful value.

use serde::{Deserialize, Serialize};

// ── Rates ─────────────────────────────────────────────────────────────────────

/// Average per day over `elapsed_days`, guarding day zero.
///
/// Computed as `total / max(1, elapsed_days)`, so a negative or zero span
/// divides by one.
pub fn rate_per_day(total: f64, elapsed_days: i64) -> f64 {
    total / elapsed_days.max(1) as f64
}

/// Weekly equivalent of a per-session average: `(total / count) * 7`.
///
/// Returns `0.0` when `count` is zero.
pub fn weekly_equivalent(total: f64, count: u32) -> f64 {
    mean(total, count).map(|avg| avg * 7.0).unwrap_or(0.0)
}

/// `total / count`, or `None` without observations.
pub fn mean(total: f64, count: u32) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(total / f64::from(count))
    }
}

/// `delta` as a percentage of `base`, or `None` when `base` is zero.
pub fn percent_of(delta: f64, base: f64) -> Option<f64> {
    if base == 0.0 {
        None
    } else {
        Some(delta / base * 100.0)
    }
}

// ── Percentile helper ─────────────────────────────────────────────────────────

/// Compute the `p`-th percentile of a **sorted** slice using standard linear
/// interpolation (the same algorithm used by NumPy's `percentile` function).
///
/// Returns `0.0` for an empty slice.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    let len = sorted_data.len();
    if len == 1 {
        return sorted_data[0];
    }
    let rank = (p / 100.0) * (len as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted_data[lo];
    }
    let frac = rank - lo as f64;
    sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo])
}

/// Median and 90th percentile of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub median: f64,
    pub p90: f64,
}

impl Distribution {
    /// Summarise an unsorted sample; `None` when it is empty.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            median: percentile(&sorted, 50.0),
            p90: percentile(&sorted, 90.0),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── rates ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_rate_per_day() {
        assert!((rate_per_day(30.0, 10) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rate_per_day_zero_days() {
        assert_eq!(rate_per_day(12.0, 0), 12.0);
        assert!(rate_per_day(12.0, 0).is_finite());
    }

    #[test]
    fn test_rate_per_day_negative_days() {
        assert_eq!(rate_per_day(5.0, -3), 5.0);
    }

    #[test]
    fn test_weekly_equivalent() {
        assert!((weekly_equivalent(90.0, 3) - 210.0).abs() < 1e-9);
        assert_eq!(weekly_equivalent(90.0, 0), 0.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(24.0, 3), Some(8.0));
        assert_eq!(mean(24.0, 0), None);
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(1.5, 3.0), Some(50.0));
        assert_eq!(percent_of(1.5, 0.0), None);
    }

    // ── percentile ────────────────────────────────────────────────────────────

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&[], 90.0), 0.0);
    }

    #[test]
    fn test_percentile_single() {
        assert_eq!(percentile(&[42.0], 50.0), 42.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let data = [10.0, 20.0, 30.0, 40.0];
        assert!((percentile(&data, 50.0) - 25.0).abs() < 1e-9);
        assert!((percentile(&data, 90.0) - 37.0).abs() < 1e-9);
        assert_eq!(percentile(&data, 100.0), 40.0);
    }

    #[test]
    fn test_distribution_sorts_input() {
        let dist = Distribution::from_samples(&[120.0, 30.0, 60.0]).unwrap();
        assert_eq!(dist.median, 60.0);
        assert!((dist.p90 - 108.0).abs() < 1e-9);
    }

    #[test]
    fn test_distribution_empty() {
        assert!(Distribution::from_samples(&[]).is_none());
    }
}

// Z-score normalization against batch-scoped league aggregates.

/// Mean and sample standard deviation for one statistic across a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatSummary {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
pub const STDEV_EPSILON: f64 = 1e-9;

/// Compute mean and standard deviation for a slice of values.
///
/// Uses the sample standard deviation (N - 1 denominator). Returns a zero
/// summary for an empty slice and a zero stdev for a single value, where the
/// sample deviation is undefined.
pub fn compute_stat_summary(values: &[f64]) -> StatSummary {
    if values.is_empty() {
        return StatSummary {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return StatSummary { mean, stdev: 0.0 };
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    StatSummary {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Compute a z-score given a value and its batch summary.
///
/// Returns 0.0 if the standard deviation is approximately zero: an entity
/// whose statistic matches every other entity's sits exactly at the mean.
pub fn compute_zscore(value: f64, summary: &StatSummary) -> f64 {
    if summary.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value - summary.mean) / summary.stdev
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn summary_known_values() {
        // Values: [2, 4, 4, 4, 5, 5, 7, 9], mean 5.0
        // Sum of squared deviations = 32, sample variance = 32 / 7
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let summary = compute_stat_summary(&values);
        assert!(approx_eq(summary.mean, 5.0, 1e-10));
        assert!(approx_eq(summary.stdev, (32.0_f64 / 7.0).sqrt(), 1e-10));
    }

    #[test]
    fn summary_empty_slice() {
        let summary = compute_stat_summary(&[]);
        assert_eq!(summary.mean, 0.0);
        assert_eq!(summary.stdev, 0.0);
    }

    #[test]
    fn summary_single_value_has_zero_stdev() {
        let summary = compute_stat_summary(&[42.0]);
        assert!(approx_eq(summary.mean, 42.0, 1e-10));
        assert_eq!(summary.stdev, 0.0);
    }

    #[test]
    fn summary_identical_values() {
        let summary = compute_stat_summary(&[3.5, 3.5, 3.5, 3.5]);
        assert!(approx_eq(summary.mean, 3.5, 1e-10));
        assert!(summary.stdev < STDEV_EPSILON);
    }

    #[test]
    fn zscore_basic() {
        let summary = StatSummary {
            mean: 10.0,
            stdev: 2.0,
        };
        assert!(approx_eq(compute_zscore(14.0, &summary), 2.0, 1e-10));
        assert!(approx_eq(compute_zscore(7.0, &summary), -1.5, 1e-10));
        assert!(approx_eq(compute_zscore(10.0, &summary), 0.0, 1e-10));
    }

    #[test]
    fn zscore_zero_stdev_is_zero_not_nan() {
        let summary = StatSummary {
            mean: 5.0,
            stdev: 0.0,
        };
        let z = compute_zscore(9.0, &summary);
        assert_eq!(z, 0.0);
        assert!(z.is_finite());
    }
}

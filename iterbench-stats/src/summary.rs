//! Summary Statistics
//!
//! Samples are mean nanoseconds per iteration, one value per batch.
//! - Mean, median, spread and margin of error come from CLEANED samples
//! - Min, max and percentiles come from ALL samples

use crate::NANOS_PER_SEC;
use crate::outliers::{OutlierMethod, detect_outliers};
use crate::percentiles::{Percentiles, compute_percentiles};
use crate::tdist::t_critical_95;

/// Timing summary for one test case
#[derive(Debug, Clone)]
pub struct SummaryStatistics {
    // Central tendency and spread (cleaned samples)
    /// Mean ns per iteration
    pub mean: f64,
    /// Median ns per iteration
    pub median: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    /// Standard error of the mean
    pub sem: f64,
    /// Half-width of the 95% confidence interval around `mean`
    pub moe: f64,

    // Extremes and tails (all samples)
    /// Fastest sample
    pub min: f64,
    /// Slowest sample
    pub max: f64,
    /// Percentiles over all samples
    pub percentiles: Percentiles,

    /// Samples collected, outliers included
    pub sample_count: usize,
    /// Samples outside the outlier fences
    pub outlier_count: usize,
    /// `outlier_count` as a percentage of `sample_count`
    pub outlier_percent: f64,
}

/// Compute summary statistics for `samples` (ns per iteration)
pub fn compute_summary(samples: &[f64], outlier_method: OutlierMethod) -> SummaryStatistics {
    let analysis = detect_outliers(samples, outlier_method);
    let cleaned = analysis.cleaned_samples.as_slice();

    let n = cleaned.len();
    let mean = if n == 0 {
        0.0
    } else {
        cleaned.iter().sum::<f64>() / n as f64
    };
    let median = compute_percentiles(cleaned).p50;

    let std_dev = if n < 2 {
        0.0
    } else {
        let variance = cleaned.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    };

    let sem = if n == 0 { 0.0 } else { std_dev / (n as f64).sqrt() };
    let moe = sem * t_critical_95(n.saturating_sub(1));

    let min = samples.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = samples.iter().copied().reduce(f64::max).unwrap_or(0.0);

    SummaryStatistics {
        mean,
        median,
        std_dev,
        sem,
        moe,
        min,
        max,
        percentiles: compute_percentiles(samples),
        sample_count: samples.len(),
        outlier_count: analysis.outlier_count(),
        outlier_percent: analysis.outlier_percentage(samples.len()),
    }
}

impl SummaryStatistics {
    /// Relative margin of error as a percentage of the mean
    pub fn rme(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            self.moe / self.mean * 100.0
        }
    }

    /// Iterations per second implied by the mean
    pub fn ops_per_sec(&self) -> f64 {
        if self.mean <= 0.0 {
            0.0
        } else {
            NANOS_PER_SEC / self.mean
        }
    }

    /// Lower and upper ends of the 95% confidence interval on the mean
    pub fn confidence_interval(&self) -> (f64, f64) {
        (self.mean - self.moe, self.mean + self.moe)
    }

    /// Whether the two confidence intervals intersect, i.e. the means cannot
    /// be told apart at 95% confidence
    pub fn overlaps(&self, other: &SummaryStatistics) -> bool {
        let (lo, hi) = self.confidence_interval();
        let (other_lo, other_hi) = other.confidence_interval();
        lo <= other_hi && other_lo <= hi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_summary() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let summary = compute_summary(&samples, OutlierMethod::default());

        assert!((summary.mean - 3.0).abs() < 1e-9);
        assert!((summary.median - 3.0).abs() < 1e-9);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.sample_count, 5);
        // stddev = sqrt(2.5), sem = stddev / sqrt(5), t(4) = 2.776
        let expected_moe = 2.5f64.sqrt() / 5f64.sqrt() * 2.776;
        assert!((summary.moe - expected_moe).abs() < 1e-9);
    }

    #[test]
    fn test_outlier_kept_in_extremes_only() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = compute_summary(&samples, OutlierMethod::default());

        assert!(summary.mean < 10.0);
        assert_eq!(summary.max, 100.0);
        assert!(summary.percentiles.p99 > 50.0);
        assert_eq!(summary.outlier_count, 1);
        assert!((summary.outlier_percent - 100.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_ops_per_sec_and_rme() {
        let samples = vec![1_000.0; 20];
        let summary = compute_summary(&samples, OutlierMethod::None);

        assert!((summary.ops_per_sec() - 1_000_000.0).abs() < 1e-6);
        assert!((summary.rme() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_sample() {
        let summary = compute_summary(&[250.0], OutlierMethod::default());

        assert_eq!(summary.sample_count, 1);
        assert!((summary.mean - 250.0).abs() < f64::EPSILON);
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.moe, 0.0);
    }

    #[test]
    fn test_empty_samples() {
        let summary = compute_summary(&[], OutlierMethod::default());

        assert_eq!(summary.sample_count, 0);
        assert_eq!(summary.mean, 0.0);
        assert_eq!(summary.ops_per_sec(), 0.0);
        assert_eq!(summary.rme(), 0.0);
    }

    #[test]
    fn test_overlap() {
        let fast = compute_summary(&[10.0, 11.0, 9.0, 10.5, 9.5], OutlierMethod::None);
        let close = compute_summary(&[10.2, 11.1, 9.3, 10.4, 9.9], OutlierMethod::None);
        let slow = compute_summary(&[100.0, 101.0, 99.0, 100.5, 99.5], OutlierMethod::None);

        assert!(fast.overlaps(&close));
        assert!(close.overlaps(&fast));
        assert!(!fast.overlaps(&slow));
    }
}

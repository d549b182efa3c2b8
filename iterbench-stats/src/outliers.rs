//! Outlier Detection
//!
//! Tukey fences over the interquartile range. Outliers are only excluded from
//! the central-tendency figures (mean, median, spread); extremes and
//! percentiles still see every sample.

use crate::DEFAULT_IQR_FENCE;
use crate::percentiles::compute_percentile;

/// How outliers are identified
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlierMethod {
    /// Outside `[Q1 - fence * IQR, Q3 + fence * IQR]`
    Iqr {
        /// Fence multiplier
        fence: f64,
    },
    /// Keep every sample
    None,
}

impl Default for OutlierMethod {
    fn default() -> Self {
        OutlierMethod::Iqr {
            fence: DEFAULT_IQR_FENCE,
        }
    }
}

/// Result of outlier analysis
#[derive(Debug, Clone)]
pub struct OutlierAnalysis {
    /// Samples with outliers removed
    pub cleaned_samples: Vec<f64>,
    /// Number of samples below the lower fence
    pub low_outlier_count: usize,
    /// Number of samples above the upper fence
    pub high_outlier_count: usize,
    /// Lower fence
    pub lower_bound: f64,
    /// Upper fence
    pub upper_bound: f64,
}

impl OutlierAnalysis {
    /// Total number of outliers on both sides
    pub fn outlier_count(&self) -> usize {
        self.low_outlier_count + self.high_outlier_count
    }

    /// Percentage of `total` samples that were flagged
    pub fn outlier_percentage(&self, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        self.outlier_count() as f64 / total as f64 * 100.0
    }
}

/// Detect outliers in `samples` using `method`
pub fn detect_outliers(samples: &[f64], method: OutlierMethod) -> OutlierAnalysis {
    let (lower_bound, upper_bound) = match method {
        OutlierMethod::None => (f64::NEG_INFINITY, f64::INFINITY),
        OutlierMethod::Iqr { .. } if samples.is_empty() => (0.0, 0.0),
        OutlierMethod::Iqr { fence } => {
            let q1 = compute_percentile(samples, 25.0);
            let q3 = compute_percentile(samples, 75.0);
            let iqr = q3 - q1;
            (q1 - fence * iqr, q3 + fence * iqr)
        }
    };

    let mut analysis = OutlierAnalysis {
        cleaned_samples: Vec::with_capacity(samples.len()),
        low_outlier_count: 0,
        high_outlier_count: 0,
        lower_bound,
        upper_bound,
    };

    for &sample in samples {
        if sample < lower_bound {
            analysis.low_outlier_count += 1;
        } else if sample > upper_bound {
            analysis.high_outlier_count += 1;
        } else {
            analysis.cleaned_samples.push(sample);
        }
    }

    analysis
}

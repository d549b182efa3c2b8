#![warn(missing_docs)]
//! iterbench statistics
//!
//! Turns the raw per-sample timings collected by `iterbench-core` into the
//! numbers printed after every cycle:
//! - Mean / median / standard deviation over outlier-cleaned samples
//! - Standard error and margin of error using Student-t critical values
//! - Relative margin of error and operations per second
//! - Percentiles and extremes over all samples (outliers kept)

mod outliers;
mod percentiles;
mod summary;
mod tdist;

pub use outliers::{OutlierAnalysis, OutlierMethod, detect_outliers};
pub use percentiles::{Percentiles, compute_percentile, compute_percentiles};
pub use summary::{SummaryStatistics, compute_summary};
pub use tdist::t_critical_95;

/// Nanoseconds per second, used to turn mean sample time into ops/sec
pub const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Default IQR fence multiplier (Tukey's 1.5)
pub const DEFAULT_IQR_FENCE: f64 = 1.5;

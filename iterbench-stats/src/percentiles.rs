//! Percentile Computation
//!
//! Percentiles are always taken over ALL samples. Slow samples in the tail are
//! exactly what p95/p99 are meant to show.

/// Tail percentiles reported for a test case
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentiles {
    /// 50th percentile
    pub p50: f64,
    /// 75th percentile
    pub p75: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
}

/// Compute a single percentile (0..=100) with linear interpolation between
/// the two nearest ranks. Empty input yields `0.0`.
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    match samples {
        [] => 0.0,
        [only] => *only,
        _ => {
            let mut sorted = samples.to_vec();
            sorted.sort_by(f64::total_cmp);
            interpolate(&sorted, percentile)
        }
    }
}

/// Compute all reported percentiles with a single sort
pub fn compute_percentiles(samples: &[f64]) -> Percentiles {
    if samples.is_empty() {
        return Percentiles {
            p50: 0.0,
            p75: 0.0,
            p95: 0.0,
            p99: 0.0,
        };
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    Percentiles {
        p50: interpolate(&sorted, 50.0),
        p75: interpolate(&sorted, 75.0),
        p95: interpolate(&sorted, 95.0),
        p99: interpolate(&sorted, 99.0),
    }
}

/// `sorted` must be non-empty and ascending.
fn interpolate(sorted: &[f64], percentile: f64) -> f64 {
    let last = sorted.len() - 1;
    let rank = (percentile.clamp(0.0, 100.0) / 100.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(last);
    let fraction = rank - lower as f64;

    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}

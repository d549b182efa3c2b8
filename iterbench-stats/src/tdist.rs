//! Two-tailed 95% critical values of Student's t distribution.

/// Critical values for 1..=30 degrees of freedom
const T_TABLE_95: [f64; 30] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, //
    2.201, 2.179, 2.160, 2.145, 2.131, 2.120, 2.110, 2.101, 2.093, 2.086, //
    2.080, 2.074, 2.069, 2.064, 2.060, 2.056, 2.052, 2.048, 2.045, 2.042,
];

/// Normal approximation used past 30 degrees of freedom
const Z_95: f64 = 1.96;

/// Critical value for a 95% confidence interval with `degrees_of_freedom`.
///
/// Zero degrees of freedom has no meaningful interval; it returns the
/// one-degree value so a single sample still reports a (very wide) margin.
pub fn t_critical_95(degrees_of_freedom: usize) -> f64 {
    match degrees_of_freedom {
        0 => T_TABLE_95[0],
        df if df <= T_TABLE_95.len() => T_TABLE_95[df - 1],
        _ => Z_95,
    }
}

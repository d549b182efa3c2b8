//! Size sweep
//!
//! Runs the catalog once per input size, strictly one after another: each
//! suite finishes (and prints its completion line) before the next setup
//! begins.

use crate::catalog::{SetupOptions, SetupResult, setup};
use crate::error::BenchError;
use crate::suite::{Runner, SuiteOutcome, TestCase};

/// Run `cases` at every size in `sizes`, in order.
///
/// Stops at the first suite-level error (setup failure, timeout); outcomes
/// for the sizes that already completed are discarded along with it.
pub async fn run_sizes(
    runner: &Runner,
    sizes: &[u64],
    cases: &[TestCase<SetupResult>],
) -> Result<Vec<SuiteOutcome>, BenchError> {
    let mut outcomes = Vec::with_capacity(sizes.len());
    for &n in sizes {
        tracing::info!(n, "running suite");
        let outcome = runner.run(&SetupOptions { n }, setup, cases).await?;
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

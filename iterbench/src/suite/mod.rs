//! Benchmark Suite
//!
//! ```text
//! TestCase<S> ──bind(Arc<S>)──▶ Executable
//!                                   │
//!          Runner::run              ▼
//!   setup ─▶ spawn_blocking ─▶ run_suite ─▶ execute_case (per case)
//!                                   │            │
//!                                   │       SuiteObserver::on_cycle
//!                                   ▼
//!                     SuiteOutcome ─▶ oneshot ─▶ awaiting caller
//! ```

mod events;
mod execution;
mod runner;

pub use events::{ConsoleObserver, SuiteObserver};
pub use execution::{CaseRecord, CaseStatus, ExecutionConfig, execute_case, run_suite};
pub use runner::Runner;

use crate::error::CaseError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// One runnable pass of a test case, bound to its setup result
pub type Executable = Box<dyn FnMut() -> Result<(), CaseError> + Send>;

/// Named factory producing an [`Executable`] from a shared setup result
pub struct TestCase<S> {
    name: String,
    factory: fn(Arc<S>) -> Executable,
}

impl<S> TestCase<S> {
    /// Create a test case
    pub fn new(name: impl Into<String>, factory: fn(Arc<S>) -> Executable) -> Self {
        Self {
            name: name.into(),
            factory,
        }
    }

    /// Display name (also the identity used by fastest-selection)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bind the factory to `setup`
    pub fn bind(&self, setup: &Arc<S>) -> Executable {
        (self.factory)(Arc::clone(setup))
    }
}

impl<S> Clone for TestCase<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            factory: self.factory,
        }
    }
}

impl<S> fmt::Debug for TestCase<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

/// Everything a completed suite produced
#[derive(Debug, Clone)]
pub struct SuiteOutcome {
    /// Setup options as shown in the start banner
    pub options: serde_json::Value,
    /// One record per case, in registration order
    pub records: Vec<CaseRecord>,
    /// Names of the fastest cases, fastest first
    pub fastest: Vec<String>,
    /// Wall-clock time of the whole suite
    pub duration: Duration,
}

impl SuiteOutcome {
    /// Look up a record by case name
    pub fn record(&self, name: &str) -> Option<&CaseRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Records that did not pass
    pub fn unsuccessful(&self) -> impl Iterator<Item = &CaseRecord> {
        self.records.iter().filter(|r| r.status != CaseStatus::Passed)
    }
}

/// Select the fastest successful cases.
///
/// The case with the lowest mean wins, and any case whose 95% confidence
/// interval overlaps the winner's ties with it. Failed and crashed cases never
/// qualify. Result is ordered fastest first.
pub fn fastest(records: &[CaseRecord]) -> Vec<String> {
    let mut ranked: Vec<_> = records
        .iter()
        .filter_map(|r| r.successful_summary().map(|s| (r.name.as_str(), s)))
        .collect();
    ranked.sort_by(|a, b| a.1.mean.total_cmp(&b.1.mean));

    let Some(&(_, best)) = ranked.first() else {
        return Vec::new();
    };

    ranked
        .iter()
        .filter(|(_, summary)| summary.overlaps(best))
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use iterbench_stats::{OutlierMethod, compute_summary};

    fn passed(name: &str, samples: &[f64]) -> CaseRecord {
        CaseRecord {
            name: name.to_string(),
            status: CaseStatus::Passed,
            summary: Some(compute_summary(samples, OutlierMethod::None)),
            iterations: samples.len() as u64,
            duration: Duration::from_millis(1),
            error: None,
        }
    }

    fn failed(name: &str) -> CaseRecord {
        CaseRecord {
            name: name.to_string(),
            status: CaseStatus::Failed,
            summary: None,
            iterations: 0,
            duration: Duration::ZERO,
            error: Some("Wrong answer: expected 20, got 18".to_string()),
        }
    }

    #[test]
    fn test_fastest_single_winner() {
        let records = vec![
            passed("slow", &[100.0, 101.0, 99.0, 100.0]),
            passed("fast", &[10.0, 11.0, 9.0, 10.0]),
        ];
        assert_eq!(fastest(&records), vec!["fast"]);
    }

    #[test]
    fn test_fastest_ties_on_overlap() {
        let records = vec![
            passed("a", &[10.0, 12.0, 8.0, 10.0]),
            passed("b", &[10.5, 12.5, 8.5, 10.5]),
            passed("c", &[500.0, 501.0, 499.0, 500.0]),
        ];
        assert_eq!(fastest(&records), vec!["a", "b"]);
    }

    #[test]
    fn test_fastest_ignores_failures() {
        let records = vec![failed("broken"), passed("ok", &[50.0, 51.0, 49.0])];
        assert_eq!(fastest(&records), vec!["ok"]);
        assert!(fastest(&[failed("only")]).is_empty());
        assert!(fastest(&[]).is_empty());
    }

    #[test]
    fn test_bind_shares_setup() {
        fn reads_shared(shared: Arc<u64>) -> Executable {
            Box::new(move || {
                if *shared == 7 {
                    Ok(())
                } else {
                    Err(CaseError::WrongAnswer {
                        expected: 7,
                        actual: *shared,
                    })
                }
            })
        }

        let case = TestCase::new("reader", reads_shared);
        let shared = Arc::new(7u64);
        let mut exec = case.bind(&shared);

        assert_eq!(exec(), Ok(()));
        assert_eq!(Arc::strong_count(&shared), 2);
        assert_eq!(case.clone().name(), "reader");
    }

    #[test]
    fn test_outcome_lookup() {
        let outcome = SuiteOutcome {
            options: serde_json::json!({ "N": 10 }),
            records: vec![passed("ok", &[1.0, 2.0]), failed("bad")],
            fastest: vec!["ok".to_string()],
            duration: Duration::from_millis(3),
        };

        assert!(outcome.record("ok").is_some());
        assert!(outcome.record("missing").is_none());
        let bad: Vec<_> = outcome.unsuccessful().map(|r| r.name.as_str()).collect();
        assert_eq!(bad, vec!["bad"]);
    }
}

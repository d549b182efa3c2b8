//! Case Execution
//!
//! Runs each executable through the measurement loop and turns the outcome
//! into a [`CaseRecord`]:
//! - a returned [`CaseError`](crate::error::CaseError) marks the case `Failed`
//! - a panic is caught and marks the case `Crashed`
//!
//! Neither stops the suite; the remaining cases still run.

use super::events::SuiteObserver;
use super::{Executable, SuiteOutcome, fastest};
use crate::error::CaseError;
use iterbench_core::{Bencher, DEFAULT_SAMPLE_COUNT, LoopLimits, run_benchmark_loop};
use iterbench_stats::{OutlierMethod, SummaryStatistics, compute_summary};
use serde::{Deserialize, Serialize};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Configuration for running a suite
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Warmup and measurement budgets per case
    pub limits: LoopLimits,
    /// Samples to collect per case
    pub target_samples: usize,
    /// Give up waiting for the suite after this long (`None` waits forever)
    pub suite_timeout: Option<Duration>,
    /// Outlier handling for the summary statistics
    pub outlier_method: OutlierMethod,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            limits: LoopLimits::default(),
            target_samples: DEFAULT_SAMPLE_COUNT,
            suite_timeout: None,
            outlier_method: OutlierMethod::default(),
        }
    }
}

/// Outcome of one case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    /// Every iteration returned `Ok`
    Passed,
    /// An iteration returned an error
    Failed,
    /// An iteration panicked
    Crashed,
}

/// Run record for one case
#[derive(Debug, Clone)]
pub struct CaseRecord {
    /// Case name
    pub name: String,
    /// How the case ended
    pub status: CaseStatus,
    /// Timing summary; `None` unless the case passed
    pub summary: Option<SummaryStatistics>,
    /// Iterations run, warmup included. For failed or crashed cases, the
    /// iterations of every batch that completed before the failing one
    pub iterations: u64,
    /// Wall-clock time spent on this case
    pub duration: Duration,
    /// Failure message for failed or crashed cases
    pub error: Option<String>,
}

impl CaseRecord {
    /// Summary of a passed case that produced at least one sample
    pub fn successful_summary(&self) -> Option<&SummaryStatistics> {
        match (&self.status, &self.summary) {
            (CaseStatus::Passed, Some(summary)) if summary.sample_count > 0 => Some(summary),
            _ => None,
        }
    }
}

/// Measure a single executable
pub fn execute_case(
    name: &str,
    executable: &mut Executable,
    config: &ExecutionConfig,
) -> CaseRecord {
    let start = Instant::now();
    let mut completed = 0;

    let result = catch_unwind(AssertUnwindSafe(|| {
        run_benchmark_loop(
            Bencher::with_config(config.target_samples),
            |b: &mut Bencher| -> Result<(), CaseError> {
                b.try_iter(&mut *executable)?;
                completed = b.iteration_count();
                Ok(())
            },
            &config.limits,
        )
    }));

    let duration = start.elapsed();

    match result {
        Ok(Ok(bench_result)) => {
            let samples = bench_result.per_iteration_ns();
            let summary = compute_summary(&samples, config.outlier_method);
            tracing::debug!(
                case = name,
                iterations = bench_result.iterations,
                samples = samples.len(),
                mean_ns = summary.mean,
                "case passed"
            );

            CaseRecord {
                name: name.to_string(),
                status: CaseStatus::Passed,
                summary: Some(summary),
                iterations: bench_result.iterations,
                duration,
                error: None,
            }
        }
        Ok(Err(err)) => {
            tracing::warn!(case = name, error = %err, "case failed");

            CaseRecord {
                name: name.to_string(),
                status: CaseStatus::Failed,
                summary: None,
                iterations: completed,
                duration,
                error: Some(err.to_string()),
            }
        }
        Err(panic) => {
            let message = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            tracing::warn!(case = name, panic = %message, "case crashed");

            CaseRecord {
                name: name.to_string(),
                status: CaseStatus::Crashed,
                summary: None,
                iterations: completed,
                duration,
                error: Some(format!("panicked: {message}")),
            }
        }
    }
}

/// Run every case in order, reporting to `observer`.
///
/// Emits `on_start`, one `on_cycle` per executed case, then `on_complete`.
/// `cancel` is checked before and after every case. Once it is set the
/// remaining cases are skipped and the observer hears nothing more, not even
/// the cycle of the case that was running; the outcome holds only the cases
/// that finished.
pub fn run_suite(
    cases: Vec<(String, Executable)>,
    options: serde_json::Value,
    config: &ExecutionConfig,
    observer: &dyn SuiteObserver,
    cancel: &AtomicBool,
) -> SuiteOutcome {
    let start = Instant::now();
    let cancelled = || cancel.load(Ordering::SeqCst);

    if !cancelled() {
        observer.on_start(&options);
    }

    let mut records = Vec::with_capacity(cases.len());
    for (name, mut executable) in cases {
        if cancelled() {
            tracing::warn!(case = %name, "suite cancelled, skipping remaining cases");
            break;
        }

        let record = execute_case(&name, &mut executable, config);
        if cancelled() {
            tracing::debug!(case = %name, "suite cancelled while case was running");
            records.push(record);
            break;
        }
        observer.on_cycle(&record);
        records.push(record);
    }

    let outcome = SuiteOutcome {
        fastest: fastest(&records),
        options,
        records,
        duration: start.elapsed(),
    };
    if !cancelled() {
        observer.on_complete(&outcome);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn ok_case() -> Executable {
        Box::new(|| Ok(()))
    }

    fn wrong_case() -> Executable {
        Box::new(|| {
            Err(CaseError::WrongAnswer {
                expected: 1,
                actual: 2,
            })
        })
    }

    fn quick_config() -> ExecutionConfig {
        ExecutionConfig {
            limits: LoopLimits {
                warmup_time_ns: 0,
                measurement_time_ns: 0,
                min_samples: 3,
            },
            target_samples: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_passing_case() {
        let mut exec = ok_case();
        let record = execute_case("noop", &mut exec, &quick_config());

        assert_eq!(record.status, CaseStatus::Passed);
        assert!(record.error.is_none());
        let summary = record.successful_summary().unwrap();
        assert_eq!(summary.sample_count, 3);
        assert_eq!(record.iterations, 4);
    }

    #[test]
    fn test_failing_case_is_recorded() {
        let mut calls = 0;
        let mut exec: Executable = Box::new(move || {
            calls += 1;
            if calls > 2 {
                Err(CaseError::WrongAnswer {
                    expected: 20,
                    actual: 0,
                })
            } else {
                Ok(())
            }
        });
        let record = execute_case("flaky", &mut exec, &quick_config());

        assert_eq!(record.status, CaseStatus::Failed);
        assert!(record.successful_summary().is_none());
        // One warmup batch and one measurement batch finished before the error
        assert_eq!(record.iterations, 2);
        assert_eq!(
            record.error.as_deref(),
            Some("Wrong answer: expected 20, got 0")
        );
    }

    #[test]
    fn test_panicking_case_is_crashed() {
        let mut exec: Executable =
            Box::new(|| -> Result<(), CaseError> { panic!("exploded") });
        let record = execute_case("boom", &mut exec, &quick_config());

        assert_eq!(record.status, CaseStatus::Crashed);
        assert_eq!(record.error.as_deref(), Some("panicked: exploded"));
        assert_eq!(record.iterations, 0);
    }

    #[test]
    fn test_crash_keeps_completed_iterations() {
        let mut calls = 0;
        let mut exec: Executable = Box::new(move || {
            calls += 1;
            if calls > 3 {
                panic!("late failure");
            }
            Ok(())
        });
        let record = execute_case("late", &mut exec, &quick_config());

        assert_eq!(record.status, CaseStatus::Crashed);
        assert_eq!(record.iterations, 3);
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl SuiteObserver for Recorder {
        fn on_start(&self, options: &serde_json::Value) {
            self.events.lock().unwrap().push(format!("start {options}"));
        }

        fn on_cycle(&self, record: &CaseRecord) {
            self.events.lock().unwrap().push(format!("cycle {}", record.name));
        }

        fn on_complete(&self, outcome: &SuiteOutcome) {
            self.events
                .lock()
                .unwrap()
                .push(format!("complete {}", outcome.records.len()));
        }
    }

    #[test]
    fn test_run_suite_event_order() {
        let cases = vec![
            ("first".to_string(), ok_case()),
            ("second".to_string(), wrong_case()),
            ("third".to_string(), ok_case()),
        ];
        let recorder = Recorder::default();
        let outcome = run_suite(
            cases,
            serde_json::json!({ "N": 4 }),
            &quick_config(),
            &recorder,
            &AtomicBool::new(false),
        );

        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec![
                r#"start {"N":4}"#,
                "cycle first",
                "cycle second",
                "cycle third",
                "complete 3"
            ]
        );
        assert_eq!(outcome.records[1].status, CaseStatus::Failed);
        assert!(!outcome.fastest.contains(&"second".to_string()));
    }

    #[test]
    fn test_run_suite_honours_cancel() {
        let cases = vec![("never".to_string(), ok_case())];
        let recorder = Recorder::default();
        let outcome = run_suite(
            cases,
            serde_json::Value::Null,
            &quick_config(),
            &recorder,
            &AtomicBool::new(true),
        );

        assert!(outcome.records.is_empty());
        assert!(outcome.fastest.is_empty());
        assert!(recorder.events.lock().unwrap().is_empty());
    }

    static STOP_DURING_CASE: AtomicBool = AtomicBool::new(false);

    fn stops_suite() -> Executable {
        Box::new(|| {
            STOP_DURING_CASE.store(true, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn test_run_suite_silent_after_cancel_mid_case() {
        let cases = vec![
            ("first".to_string(), ok_case()),
            ("stopper".to_string(), stops_suite()),
            ("never".to_string(), ok_case()),
        ];
        let recorder = Recorder::default();
        let outcome = run_suite(
            cases,
            serde_json::json!({ "N": 4 }),
            &quick_config(),
            &recorder,
            &STOP_DURING_CASE,
        );

        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec![r#"start {"N":4}"#, "cycle first"]
        );
        let names: Vec<_> = outcome.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "stopper"]);
    }
}

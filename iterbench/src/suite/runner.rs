//! Suite Runner
//!
//! Binds test cases to one shared setup result, hands them to the engine on a
//! blocking worker, and resolves once the engine signals completion.

use super::events::{ConsoleObserver, SuiteObserver};
use super::execution::{ExecutionConfig, run_suite};
use super::{Executable, SuiteOutcome, TestCase};
use crate::error::{BenchError, SetupError};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::oneshot;

/// Runs one suite per call
#[derive(Clone)]
pub struct Runner {
    config: ExecutionConfig,
    observer: Arc<dyn SuiteObserver>,
}

impl Runner {
    /// Create a runner that prints progress to stdout
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config,
            observer: Arc::new(ConsoleObserver::stdout()),
        }
    }

    /// Replace the progress observer
    pub fn with_observer(mut self, observer: Arc<dyn SuiteObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Execution configuration
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Run every test against the result of `setup(options)`.
    ///
    /// Fails fast with [`BenchError::EmptySuite`] when `tests` is empty, and
    /// propagates setup errors before anything runs. Case failures do not
    /// fail the run; they appear in the outcome's records. Without a
    /// configured timeout this waits as long as the engine takes. On timeout
    /// the engine stops after the case it is running and emits no further
    /// events; `Timeout` is returned once it has stopped.
    pub async fn run<O, S, F>(
        &self,
        options: &O,
        setup: F,
        tests: &[TestCase<S>],
    ) -> Result<SuiteOutcome, BenchError>
    where
        O: Serialize,
        F: FnOnce(&O) -> Result<S, SetupError>,
    {
        if tests.is_empty() {
            return Err(BenchError::EmptySuite);
        }

        let options_json = serde_json::to_value(options)?;
        let cases: Vec<(String, Executable)> = {
            let shared = Arc::new(setup(options)?);
            tests
                .iter()
                .map(|test| (test.name().to_string(), test.bind(&shared)))
                .collect()
        };

        tracing::debug!(options = %options_json, cases = cases.len(), "starting suite");

        let (done_tx, done_rx) = oneshot::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let engine = {
            let config = self.config.clone();
            let observer = Arc::clone(&self.observer);
            let cancel = Arc::clone(&cancel);
            tokio::task::spawn_blocking(move || {
                let outcome = run_suite(cases, options_json, &config, observer.as_ref(), &cancel);
                // Nobody is listening once the suite has timed out
                let _ = done_tx.send(outcome);
            })
        };

        let received = match self.config.suite_timeout {
            Some(limit) => match tokio::time::timeout(limit, done_rx).await {
                Ok(received) => received,
                Err(_) => {
                    cancel.store(true, Ordering::SeqCst);
                    tracing::warn!(?limit, "suite timed out, waiting for the running case");
                    // The engine is silent once cancelled; wait for it so the
                    // next suite never overlaps this one
                    if let Err(err) = engine.await {
                        tracing::debug!(error = %err, "engine task ended abnormally");
                    }
                    return Err(BenchError::Timeout(limit));
                }
            },
            None => done_rx.await,
        };

        received.map_err(|_| BenchError::EngineStopped)
    }
}

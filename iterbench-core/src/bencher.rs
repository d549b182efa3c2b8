//! Bencher - the iteration API
//!
//! Runs a closure in batches and records one sample per batch:
//! - Warmup batches double in size and feed an estimate of the cost per iteration
//! - Measurement batches are sized so `target_samples` batches fill the measurement time
//! - A closure may fail; the error stops the run and nothing from that batch is recorded

use crate::measure::Timer;
use std::hint::black_box;

/// Default number of samples to collect
pub const DEFAULT_SAMPLE_COUNT: usize = 100;

/// Samples required before the measurement time budget may end a run
pub const MIN_SAMPLE_COUNT: usize = 5;

/// Largest warmup batch; keeps one doubling step from overshooting the budget badly
const MAX_WARMUP_BATCH: u64 = 1 << 20;

/// One measured batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Wall-clock time for the whole batch
    pub duration_ns: u64,
    /// Iterations run in the batch
    pub iterations: u64,
}

impl Sample {
    /// Create a sample
    #[inline]
    pub fn new(duration_ns: u64, iterations: u64) -> Self {
        Self {
            duration_ns,
            iterations,
        }
    }

    /// Mean nanoseconds per iteration in this batch
    #[inline]
    pub fn mean_ns(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.duration_ns as f64 / self.iterations as f64
        }
    }
}

/// Result of a finished measurement loop
#[derive(Debug, Clone, Default)]
pub struct BenchmarkResult {
    /// Measurement samples (warmup excluded)
    pub samples: Vec<Sample>,
    /// Iterations run, warmup included
    pub iterations: u64,
    /// Time spent in measured batches
    pub total_time_ns: u64,
}

impl BenchmarkResult {
    /// Per-iteration means, one per sample, ready for `compute_summary`
    pub fn per_iteration_ns(&self) -> Vec<f64> {
        self.samples.iter().map(Sample::mean_ns).collect()
    }
}

/// Budgets for `run_benchmark_loop`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopLimits {
    /// Minimum time spent warming up (at least one batch always runs)
    pub warmup_time_ns: u64,
    /// Target time for the measurement phase
    pub measurement_time_ns: u64,
    /// Samples required before the time budget can stop measurement
    pub min_samples: usize,
}

impl Default for LoopLimits {
    fn default() -> Self {
        Self {
            warmup_time_ns: 500_000_000,       // 500ms
            measurement_time_ns: 2_000_000_000, // 2s
            min_samples: MIN_SAMPLE_COUNT,
        }
    }
}

/// Iteration control for a single test case
#[derive(Debug)]
pub struct Bencher {
    samples: Vec<Sample>,
    target_samples: usize,
    iters_per_sample: u64,
    total_iterations: u64,

    is_warmup: bool,
    warmup_batch: u64,
    warmup_iters: u64,
    warmup_time_ns: u64,
}

impl Default for Bencher {
    fn default() -> Self {
        Self::new()
    }
}

impl Bencher {
    /// Create a Bencher targeting `DEFAULT_SAMPLE_COUNT` samples
    pub fn new() -> Self {
        Self::with_config(DEFAULT_SAMPLE_COUNT)
    }

    /// Create a Bencher with a custom sample target (at least 1)
    pub fn with_config(target_samples: usize) -> Self {
        let target_samples = target_samples.max(1);
        Self {
            samples: Vec::with_capacity(target_samples),
            target_samples,
            iters_per_sample: 1,
            total_iterations: 0,
            is_warmup: true,
            warmup_batch: 1,
            warmup_iters: 0,
            warmup_time_ns: 0,
        }
    }

    /// Override the measurement batch size
    pub fn set_iters_per_sample(&mut self, iters: u64) {
        self.iters_per_sample = iters.max(1);
    }

    /// Iterations per measurement batch
    pub fn iters_per_sample(&self) -> u64 {
        self.iters_per_sample
    }

    /// Estimated cost of one iteration from warmup, in nanoseconds
    pub fn estimated_iter_time_ns(&self) -> Option<f64> {
        (self.warmup_iters > 0).then(|| self.warmup_time_ns as f64 / self.warmup_iters as f64)
    }

    /// Switch to measurement, sizing batches from the warmup estimate
    pub fn start_measurement(&mut self, measurement_time_ns: u64) {
        self.is_warmup = false;

        self.iters_per_sample = match self.estimated_iter_time_ns() {
            Some(iter_ns) => {
                let time_per_sample = measurement_time_ns as f64 / self.target_samples as f64;
                // Sub-nanosecond estimates come from timer granularity, not real work
                (time_per_sample / iter_ns.max(1.0)).clamp(1.0, u64::MAX as f64) as u64
            }
            None => 1,
        };
    }

    /// Whether the Bencher is still warming up
    pub fn is_warmup(&self) -> bool {
        self.is_warmup
    }

    /// Run one batch of a fallible closure.
    ///
    /// The first error aborts the batch and is returned; the partial batch is
    /// not counted.
    #[inline]
    pub fn try_iter<T, E, F>(&mut self, mut f: F) -> Result<(), E>
    where
        F: FnMut() -> Result<T, E>,
    {
        let batch = if self.is_warmup {
            self.warmup_batch
        } else {
            self.iters_per_sample
        };

        let timer = Timer::start();
        for _ in 0..batch {
            black_box(f()?);
        }
        let elapsed_ns = timer.elapsed_ns();

        self.total_iterations += batch;

        if self.is_warmup {
            self.warmup_iters += batch;
            self.warmup_time_ns += elapsed_ns;
            self.warmup_batch = (self.warmup_batch * 2).min(MAX_WARMUP_BATCH);
        } else if self.samples.len() < self.target_samples {
            self.samples.push(Sample::new(elapsed_ns, batch));
        }

        Ok(())
    }

    /// Check if the sample target is reached
    pub fn has_enough_samples(&self) -> bool {
        self.samples.len() >= self.target_samples
    }

    /// Samples collected so far
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples collected so far
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Total iterations, warmup included
    pub fn iteration_count(&self) -> u64 {
        self.total_iterations
    }

    /// Sample target
    pub fn target_samples(&self) -> usize {
        self.target_samples
    }

    /// Finalize and return results
    pub fn finish(self) -> BenchmarkResult {
        let total_time_ns = self.samples.iter().map(|s| s.duration_ns).sum();

        BenchmarkResult {
            samples: self.samples,
            iterations: self.total_iterations,
            total_time_ns,
        }
    }
}

/// Run the full loop: warmup, measurement, finish.
///
/// `runner_fn` is called once per batch and is expected to call
/// [`Bencher::try_iter`]. Its first error ends the run.
pub fn run_benchmark_loop<F, E>(
    mut bencher: Bencher,
    mut runner_fn: F,
    limits: &LoopLimits,
) -> Result<BenchmarkResult, E>
where
    F: FnMut(&mut Bencher) -> Result<(), E>,
{
    let warmup = Timer::start();
    loop {
        runner_fn(&mut bencher)?;
        if warmup.elapsed_ns() >= limits.warmup_time_ns {
            break;
        }
    }

    bencher.start_measurement(limits.measurement_time_ns);

    let min_samples = limits.min_samples.min(bencher.target_samples());
    let measurement = Timer::start();

    loop {
        let time_limit_reached = measurement.elapsed_ns() >= limits.measurement_time_ns;
        if bencher.has_enough_samples()
            || (time_limit_reached && bencher.sample_count() >= min_samples)
        {
            break;
        }

        let before = bencher.iteration_count();
        runner_fn(&mut bencher)?;
        if bencher.iteration_count() == before {
            // Runner never iterates; no sample will ever arrive
            break;
        }
    }

    Ok(bencher.finish())
}

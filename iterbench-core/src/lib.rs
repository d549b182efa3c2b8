#![warn(missing_docs)]
//! iterbench core - measurement loop
//!
//! - `Bencher` drives a closure through a warmup phase and a measurement phase
//! - Measurement iterations are batched; each batch becomes one `Sample`
//! - `run_benchmark_loop` applies the time budgets and sample targets

mod bencher;
mod measure;

pub use bencher::{
    Bencher, BenchmarkResult, DEFAULT_SAMPLE_COUNT, LoopLimits, MIN_SAMPLE_COUNT, Sample,
    run_benchmark_loop,
};
pub use measure::Timer;

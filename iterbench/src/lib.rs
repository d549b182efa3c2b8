#![warn(missing_docs)]
//! # iterbench
//!
//! Microbenchmark harness comparing ways of filtering and summing a set of
//! numbers across growing input sizes.
//!
//! - **Catalog**: four strategies over the same input, each checked against a
//!   precomputed answer
//! - **Runner**: one suite per setup options value, run on a blocking worker
//!   and awaited through a completion channel
//! - **Progress**: start, per-case cycle and fastest lines through a
//!   [`SuiteObserver`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use iterbench::prelude::*;
//!
//! # async fn demo() -> Result<(), BenchError> {
//! let runner = Runner::new(ExecutionConfig::default());
//! let outcome = runner
//!     .run(&SetupOptions { n: 10 }, setup, &catalog())
//!     .await?;
//! println!("fastest: {:?}", outcome.fastest);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod formatting;
pub mod report;
pub mod suite;

pub use catalog::{NumberSet, SetupOptions, SetupResult, catalog, setup};
pub use driver::run_sizes;
pub use error::{BenchError, CaseError, SetupError};
pub use suite::{
    CaseRecord, CaseStatus, ConsoleObserver, Executable, ExecutionConfig, Runner, SuiteObserver,
    SuiteOutcome, TestCase,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::{SetupOptions, SetupResult, catalog, setup};
    pub use crate::error::{BenchError, CaseError, SetupError};
    pub use crate::suite::{
        CaseRecord, CaseStatus, Executable, ExecutionConfig, Runner, SuiteObserver, SuiteOutcome,
        TestCase,
    };
    pub use iterbench_core::LoopLimits;
}

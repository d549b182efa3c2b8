//! Suite progress events

use super::{CaseRecord, SuiteOutcome};
use crate::formatting::{format_cycle, format_fastest, format_start};
use std::io::{self, Write};

/// Receives progress from a running suite.
///
/// Called from the engine's worker thread, in order: `on_start`, one
/// `on_cycle` per case, `on_complete`. All methods default to doing nothing.
pub trait SuiteObserver: Send + Sync {
    /// Suite is about to run; `options` are the setup options
    fn on_start(&self, _options: &serde_json::Value) {}

    /// A case finished measuring (or failed)
    fn on_cycle(&self, _record: &CaseRecord) {}

    /// Every case has run
    fn on_complete(&self, _outcome: &SuiteOutcome) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Prints the three progress lines as plain text
#[derive(Debug, Clone, Copy)]
pub struct ConsoleObserver {
    stream: Stream,
}

impl ConsoleObserver {
    /// Print to stdout
    pub fn stdout() -> Self {
        Self {
            stream: Stream::Stdout,
        }
    }

    /// Print to stderr, leaving stdout free for a machine-readable report
    pub fn stderr() -> Self {
        Self {
            stream: Stream::Stderr,
        }
    }

    fn emit(&self, line: &str) {
        let result = match self.stream {
            Stream::Stdout => writeln!(io::stdout().lock(), "{line}"),
            Stream::Stderr => writeln!(io::stderr().lock(), "{line}"),
        };
        if let Err(err) = result {
            tracing::debug!(error = %err, "failed to write progress line");
        }
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::stdout()
    }
}

impl SuiteObserver for ConsoleObserver {
    fn on_start(&self, options: &serde_json::Value) {
        self.emit(&format_start(options));
    }

    fn on_cycle(&self, record: &CaseRecord) {
        self.emit(&format_cycle(record));
    }

    fn on_complete(&self, outcome: &SuiteOutcome) {
        self.emit(&format_fastest(outcome));
    }
}

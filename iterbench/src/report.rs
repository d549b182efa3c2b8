//! Report Data Structures
//!
//! Machine-readable summary of a whole run, written once every suite has
//! finished when `--format json` is selected.

use crate::suite::{CaseRecord, CaseStatus, ExecutionConfig, SuiteOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Progress lines plus an ops/sec table
    #[default]
    Human,
    /// Progress lines plus a JSON report
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Complete run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub suites: Vec<SuiteReport>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub config: ReportConfig,
}

/// Execution configuration captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub warmup_time_ns: u64,
    pub measurement_time_ns: u64,
    pub target_samples: usize,
    pub min_samples: usize,
    pub suite_timeout_ms: Option<u64>,
}

/// One suite: a single options value run against every selected case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub options: serde_json::Value,
    pub duration_ms: u64,
    pub fastest: Vec<String>,
    pub cases: Vec<CaseReport>,
}

/// Individual case result in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub name: String,
    pub status: CaseStatus,
    pub iterations: u64,
    pub metrics: Option<CaseMetrics>,
    pub error: Option<String>,
}

/// Case timing metrics, nanoseconds per iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseMetrics {
    pub samples: usize,
    pub outliers: usize,
    pub outlier_percent: f64,
    pub ops_per_sec: f64,
    pub rme_percent: f64,
    pub mean_ns: f64,
    pub median_ns: f64,
    pub std_dev_ns: f64,
    pub moe_ns: f64,
    pub min_ns: f64,
    pub max_ns: f64,
    pub p75_ns: f64,
    pub p95_ns: f64,
    pub p99_ns: f64,
}

impl CaseReport {
    fn from_record(record: &CaseRecord) -> Self {
        let metrics = record.successful_summary().map(|s| CaseMetrics {
            samples: s.sample_count,
            outliers: s.outlier_count,
            outlier_percent: s.outlier_percent,
            ops_per_sec: s.ops_per_sec(),
            rme_percent: s.rme(),
            mean_ns: s.mean,
            median_ns: s.median,
            std_dev_ns: s.std_dev,
            moe_ns: s.moe,
            min_ns: s.min,
            max_ns: s.max,
            p75_ns: s.percentiles.p75,
            p95_ns: s.percentiles.p95,
            p99_ns: s.percentiles.p99,
        });

        Self {
            name: record.name.clone(),
            status: record.status,
            iterations: record.iterations,
            metrics,
            error: record.error.clone(),
        }
    }
}

impl ReportConfig {
    fn from_execution(config: &ExecutionConfig) -> Self {
        Self {
            warmup_time_ns: config.limits.warmup_time_ns,
            measurement_time_ns: config.limits.measurement_time_ns,
            target_samples: config.target_samples,
            min_samples: config.limits.min_samples,
            suite_timeout_ms: config.suite_timeout.map(|t| t.as_millis() as u64),
        }
    }
}

/// Assemble the report for a finished run
pub fn build_report(outcomes: &[SuiteOutcome], config: &ExecutionConfig) -> Report {
    let suites = outcomes
        .iter()
        .map(|outcome| SuiteReport {
            options: outcome.options.clone(),
            duration_ms: outcome.duration.as_millis() as u64,
            fastest: outcome.fastest.clone(),
            cases: outcome.records.iter().map(CaseReport::from_record).collect(),
        })
        .collect();

    Report {
        meta: ReportMeta {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            config: ReportConfig::from_execution(config),
        },
        suites,
    }
}

/// Generate a prettified JSON report.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

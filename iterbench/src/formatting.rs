//! Output Formatting
//!
//! Progress lines printed while suites run:
//! - `Starting run with arguments {"N":10}`
//! - `iterable x 12,345,678 ops/sec ±0.52% (95 runs sampled)`
//! - `Fastest is iterable,forEach`
//!
//! plus the ops/sec table printed once every suite has finished.

use crate::suite::{CaseRecord, CaseStatus, SuiteOutcome};

/// Start banner
pub fn format_start(options: &serde_json::Value) -> String {
    format!("Starting run with arguments {options}")
}

/// One cycle line for a finished case
pub fn format_cycle(record: &CaseRecord) -> String {
    if let Some(summary) = record.successful_summary() {
        let runs = summary.sample_count;
        return format!(
            "{} x {} ops/sec \u{b1}{:.2}% ({} run{} sampled)",
            record.name,
            format_ops(summary.ops_per_sec()),
            summary.rme(),
            runs,
            if runs == 1 { "" } else { "s" }
        );
    }

    match (record.status, record.error.as_deref()) {
        (CaseStatus::Passed, _) => format!("{}: no samples collected", record.name),
        (_, Some(error)) => format!("{}: {error}", record.name),
        (_, None) => format!("{}: failed", record.name),
    }
}

/// Completion line naming the fastest cases
pub fn format_fastest(outcome: &SuiteOutcome) -> String {
    format!("Fastest is {}", outcome.fastest.join(","))
}

/// Format an ops/sec figure: two decimals below 100, whole numbers above,
/// thousands separated by commas
pub fn format_ops(hz: f64) -> String {
    let fixed = if hz < 100.0 {
        format!("{hz:.2}")
    } else {
        format!("{hz:.0}")
    };

    match fixed.split_once('.') {
        Some((whole, frac)) => format!("{}.{frac}", group_thousands(whole)),
        None => group_thousands(&fixed),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Column label for a suite: the single option value when there is one
/// (`10` for `{"N":10}`), otherwise the options JSON
fn suite_label(options: &serde_json::Value) -> String {
    match options.as_object() {
        Some(map) if map.len() == 1 => map
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect(),
        _ => options.to_string(),
    }
}

/// Ops/sec of every case across every suite, one column per suite
pub fn format_series_table(outcomes: &[SuiteOutcome]) -> String {
    let mut names: Vec<&str> = Vec::new();
    for outcome in outcomes {
        for record in &outcome.records {
            if !names.contains(&record.name.as_str()) {
                names.push(&record.name);
            }
        }
    }

    let labels: Vec<String> = outcomes.iter().map(|o| suite_label(&o.options)).collect();
    let name_width = names.iter().map(|n| n.len()).max().unwrap_or(0).max(4);
    let col_width = labels.iter().map(|l| l.len()).max().unwrap_or(0).max(14);

    let mut output = String::new();
    output.push_str("\nops/sec by input size\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');

    output.push_str(&format!("  {:<name_width$}", "case"));
    for label in &labels {
        output.push_str(&format!(" | {label:>col_width$}"));
    }
    output.push('\n');

    output.push_str(&format!("  {}", "-".repeat(name_width)));
    for _ in &labels {
        output.push_str(&format!("-+-{}", "-".repeat(col_width)));
    }
    output.push('\n');

    for name in names {
        output.push_str(&format!("  {name:<name_width$}"));
        for outcome in outcomes {
            let cell = match outcome.record(name) {
                Some(record) => match record.successful_summary() {
                    Some(summary) => format_ops(summary.ops_per_sec()),
                    None => "error".to_string(),
                },
                None => "-".to_string(),
            };
            output.push_str(&format!(" | {cell:>col_width$}"));
        }
        output.push('\n');
    }

    output
}

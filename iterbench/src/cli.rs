//! Command-line interface
//!
//! `iterbench [FILTER]` sweeps the catalog over the configured input sizes;
//! `iterbench list` prints the catalog. Settings are layered: built-in
//! defaults, then `iterbench.toml`, then flags.

use crate::catalog::{SetupResult, catalog};
use crate::config::IterbenchConfig;
use crate::driver::run_sizes;
use crate::formatting::format_series_table;
use crate::report::{OutputFormat, build_report, generate_json_report};
use crate::suite::{ConsoleObserver, ExecutionConfig, Runner, SuiteObserver, SuiteOutcome, TestCase};
use anyhow::Context;
use clap::{Parser, Subcommand};
use regex::Regex;
use std::path::PathBuf;
use std::sync::Arc;

/// iterbench command-line arguments
#[derive(Parser, Debug)]
#[command(name = "iterbench")]
#[command(author, version, about = "Compare iteration strategies across input sizes")]
pub struct Cli {
    /// Optional subcommand; defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Regex over case names (also accepted after `list` / `run`)
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Input sizes, one suite each (e.g. 10,100,1000)
    #[arg(long, value_delimiter = ',')]
    pub sizes: Option<Vec<u64>>,

    /// Warmup time per case (e.g. 500ms)
    #[arg(long)]
    pub warmup: Option<String>,

    /// Measurement time per case (e.g. 2s)
    #[arg(long)]
    pub measurement: Option<String>,

    /// Samples to collect per case
    #[arg(long, short = 'n')]
    pub samples: Option<usize>,

    /// Samples required before the measurement time can end a case
    #[arg(long)]
    pub min_samples: Option<usize>,

    /// Give up on a suite after this long (e.g. 5m)
    #[arg(long)]
    pub timeout: Option<String>,

    /// Final report format: human or json
    #[arg(long)]
    pub format: Option<String>,

    /// Write the final report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (default: discover iterbench.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the test cases matching FILTER
    List {
        /// Regex over case names
        filter: Option<String>,
    },
    /// Run the size sweep (default)
    Run {
        /// Regex over case names
        filter: Option<String>,
    },
    /// Print a default iterbench.toml
    InitConfig,
}

impl Cli {
    /// Case filter: the subcommand's own FILTER wins over the top-level one
    pub fn case_filter(&self) -> &str {
        match &self.command {
            Some(Commands::List {
                filter: Some(filter),
            })
            | Some(Commands::Run {
                filter: Some(filter),
            }) => filter,
            _ => &self.filter,
        }
    }
}

/// Parse arguments from the environment and run.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli).await
}

/// Run with pre-parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::List { .. }) => list_cases(&cli),
        Some(Commands::InitConfig) => {
            print!("{}", IterbenchConfig::default_toml());
            Ok(())
        }
        Some(Commands::Run { .. }) | None => run_benchmarks(&cli).await,
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "iterbench=debug"
    } else {
        "iterbench=info"
    };
    // Progress lines own stdout; logs go to stderr. A second init (tests,
    // embedding) keeps the existing subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Catalog entries whose name matches `filter`, in catalog order
fn select_cases(filter: &str) -> anyhow::Result<Vec<TestCase<SetupResult>>> {
    let filter_re =
        Regex::new(filter).with_context(|| format!("Invalid filter pattern: {filter}"))?;
    Ok(catalog()
        .into_iter()
        .filter(|case| filter_re.is_match(case.name()))
        .collect())
}

fn list_cases(cli: &Cli) -> anyhow::Result<()> {
    let cases = select_cases(cli.case_filter())?;
    println!("iterbench cases:");
    for case in &cases {
        println!("├── {}", case.name());
    }
    println!("{} cases found.", cases.len());
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<IterbenchConfig> {
    match &cli.config {
        Some(path) => IterbenchConfig::load(path),
        None => IterbenchConfig::discover(),
    }
}

/// Layer CLI flags over the config file
fn apply_overrides(cli: &Cli, config: &mut IterbenchConfig) {
    let runner = &mut config.runner;
    if let Some(sizes) = &cli.sizes {
        runner.sizes = sizes.clone();
    }
    if let Some(warmup) = &cli.warmup {
        runner.warmup_time = warmup.clone();
    }
    if let Some(measurement) = &cli.measurement {
        runner.measurement_time = measurement.clone();
    }
    if let Some(samples) = cli.samples {
        runner.samples = samples;
    }
    if let Some(min_samples) = cli.min_samples {
        runner.min_samples = min_samples;
    }
    if let Some(timeout) = &cli.timeout {
        runner.timeout = Some(timeout.clone());
    }
    if let Some(format) = &cli.format {
        config.output.format = format.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = Some(output.display().to_string());
    }
}

async fn run_benchmarks(cli: &Cli) -> anyhow::Result<()> {
    let mut config = load_config(cli)?;
    apply_overrides(cli, &mut config);

    let format = config
        .output
        .format
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!(e))?;
    let execution = config.execution_config()?;
    let output_path = config.output.path.as_ref().map(PathBuf::from);

    let filter = cli.case_filter();
    let cases = select_cases(filter)?;
    if cases.is_empty() {
        tracing::warn!(filter, "no test cases match filter");
    }

    // Keep stdout clean for a JSON report printed there
    let observer: Arc<dyn SuiteObserver> = match (format, &output_path) {
        (OutputFormat::Json, None) => Arc::new(ConsoleObserver::stderr()),
        _ => Arc::new(ConsoleObserver::stdout()),
    };
    let runner = Runner::new(execution).with_observer(observer);

    let outcomes = run_sizes(&runner, &config.runner.sizes, &cases)
        .await
        .context("Benchmark run failed")?;

    write_report(&outcomes, runner.config(), format, output_path.as_ref())?;

    let unsuccessful: Vec<&str> = outcomes
        .iter()
        .flat_map(|o| o.unsuccessful())
        .map(|r| r.name.as_str())
        .collect();
    if !unsuccessful.is_empty() {
        tracing::warn!(count = unsuccessful.len(), "some cases did not pass");
        return Err(anyhow::anyhow!(
            "{} case run(s) did not pass: {}",
            unsuccessful.len(),
            unsuccessful.join(", ")
        ));
    }

    Ok(())
}

fn write_report(
    outcomes: &[SuiteOutcome],
    execution: &ExecutionConfig,
    format: OutputFormat,
    path: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let output = match format {
        OutputFormat::Human => format_series_table(outcomes),
        OutputFormat::Json => generate_json_report(&build_report(outcomes, execution))?,
    };

    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{output}"),
    }
    Ok(())
}

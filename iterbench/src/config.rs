//! Configuration loading from iterbench.toml
//!
//! Run settings can be placed in an `iterbench.toml` file in the project root.
//! The file is discovered by walking up from the current directory; CLI flags
//! override anything it sets.

use crate::catalog::DEFAULT_SIZES;
use crate::suite::ExecutionConfig;
use anyhow::Context;
use iterbench_core::{DEFAULT_SAMPLE_COUNT, LoopLimits, MIN_SAMPLE_COUNT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up by [`IterbenchConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "iterbench.toml";

/// iterbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IterbenchConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for suite execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Warmup duration per case (e.g., "500ms")
    #[serde(default = "default_warmup")]
    pub warmup_time: String,
    /// Measurement duration per case (e.g., "2s")
    #[serde(default = "default_measurement")]
    pub measurement_time: String,
    /// Samples to collect per case
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Samples required before the measurement budget can end a case
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    /// Give up on a suite after this long (unset waits forever)
    #[serde(default)]
    pub timeout: Option<String>,
    /// Input sizes, one suite each
    #[serde(default = "default_sizes")]
    pub sizes: Vec<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            warmup_time: default_warmup(),
            measurement_time: default_measurement(),
            samples: default_samples(),
            min_samples: default_min_samples(),
            timeout: None,
            sizes: default_sizes(),
        }
    }
}

fn default_warmup() -> String {
    "500ms".to_string()
}
fn default_measurement() -> String {
    "2s".to_string()
}
fn default_samples() -> usize {
    DEFAULT_SAMPLE_COUNT
}
fn default_min_samples() -> usize {
    MIN_SAMPLE_COUNT
}
fn default_sizes() -> Vec<u64> {
    DEFAULT_SIZES.to_vec()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
    /// Write the final report here instead of stdout
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl IterbenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Find `iterbench.toml` by walking up from the current directory
    pub fn find() -> Option<PathBuf> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Some(config_path);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Discover and load configuration, falling back to defaults when no
    /// file exists. A file that exists but does not parse is an error.
    pub fn discover() -> anyhow::Result<Self> {
        match Self::find() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# iterbench configuration

[runner]
# Warmup duration per case
warmup_time = "500ms"
# Measurement duration per case
measurement_time = "2s"
# Samples to collect per case
samples = 100
# Samples required before the measurement time can end a case
min_samples = 5
# Give up on a suite after this long (uncomment to enable)
# timeout = "5m"
# Input sizes, one suite each
sizes = [10, 100, 1000, 10000, 100000, 1000000]

[output]
# Final report format: human or json
format = "human"
# Write the report to a file instead of stdout (uncomment to enable)
# path = "target/iterbench.json"
"#
        .to_string()
    }

    /// Parse duration string (e.g., "2s", "500ms", "1m")
    pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow::anyhow!("Invalid duration: {}", s));
        }

        let multiplier: f64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" | "min" => 60e9,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok(Duration::from_nanos((value * multiplier) as u64))
    }

    /// Translate the runner section into an [`ExecutionConfig`]
    pub fn execution_config(&self) -> anyhow::Result<ExecutionConfig> {
        let warmup = Self::parse_duration(&self.runner.warmup_time).context("runner.warmup_time")?;
        let measurement = Self::parse_duration(&self.runner.measurement_time)
            .context("runner.measurement_time")?;
        let suite_timeout = self
            .runner
            .timeout
            .as_deref()
            .map(Self::parse_duration)
            .transpose()
            .context("runner.timeout")?;

        if self.runner.samples == 0 {
            return Err(anyhow::anyhow!("runner.samples must be at least 1"));
        }

        Ok(ExecutionConfig {
            limits: LoopLimits {
                warmup_time_ns: warmup.as_nanos() as u64,
                measurement_time_ns: measurement.as_nanos() as u64,
                min_samples: self.runner.min_samples,
            },
            target_samples: self.runner.samples,
            suite_timeout,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IterbenchConfig::default();
        assert_eq!(config.runner.warmup_time, "500ms");
        assert_eq!(config.runner.measurement_time, "2s");
        assert_eq!(config.runner.sizes, DEFAULT_SIZES.to_vec());
        assert!(config.runner.timeout.is_none());
        assert_eq!(config.output.format, "human");
    }

    #[test]
    fn test_parse_duration() {
        let parse = |s| IterbenchConfig::parse_duration(s).unwrap();
        assert_eq!(parse("3s"), Duration::from_secs(3));
        assert_eq!(parse("500ms"), Duration::from_millis(500));
        assert_eq!(parse("100us"), Duration::from_micros(100));
        assert_eq!(parse("1000ns"), Duration::from_nanos(1000));
        assert_eq!(parse("2m"), Duration::from_secs(120));
        assert_eq!(parse("1.5s"), Duration::from_millis(1500));
        assert_eq!(parse("7"), Duration::from_secs(7));

        assert!(IterbenchConfig::parse_duration("").is_err());
        assert!(IterbenchConfig::parse_duration("fast").is_err());
        assert!(IterbenchConfig::parse_duration("3h").is_err());
        assert!(IterbenchConfig::parse_duration("-1s").is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [runner]
            warmup_time = "10ms"
            timeout = "30s"
            sizes = [10, 100]

            [output]
            format = "json"
        "#;

        let config: IterbenchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.runner.sizes, vec![10, 100]);
        assert_eq!(config.output.format, "json");
        // Defaults should still apply
        assert_eq!(config.runner.measurement_time, "2s");
        assert_eq!(config.runner.samples, DEFAULT_SAMPLE_COUNT);

        let exec = config.execution_config().unwrap();
        assert_eq!(exec.limits.warmup_time_ns, 10_000_000);
        assert_eq!(exec.limits.measurement_time_ns, 2_000_000_000);
        assert_eq!(exec.suite_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_execution_config_rejects_bad_values() {
        let mut config = IterbenchConfig::default();
        config.runner.warmup_time = "soon".to_string();
        assert!(config.execution_config().is_err());

        let mut config = IterbenchConfig::default();
        config.runner.samples = 0;
        assert!(config.execution_config().is_err());
    }

    #[test]
    fn test_default_toml_parses() {
        let config: IterbenchConfig =
            toml::from_str(&IterbenchConfig::default_toml()).unwrap();
        assert_eq!(config.runner.warmup_time, "500ms");
        assert_eq!(config.runner.sizes, DEFAULT_SIZES.to_vec());
        assert!(config.execution_config().unwrap().suite_timeout.is_none());
    }
}

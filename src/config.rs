use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::VacuumError;
use crate::vacuum::MaxBuilds;

/// Configuration file structure for brigade-vacuum.
///
/// Every value can also be given on the command line, which takes precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Retention settings
    #[serde(default)]
    pub vacuum: VacuumConfig,

    /// Cluster connection settings
    #[serde(default)]
    pub kubernetes: KubernetesConfig,

    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VacuumConfig {
    /// Maximum build age (e.g. "72h", "7d"). Unset or zero disables age pruning.
    pub age: Option<String>,

    /// Maximum number of builds to keep. -1 keeps every build.
    #[serde(default = "default_max_builds")]
    pub max_builds: i64,

    /// Leave pending and running pods alone
    #[serde(default)]
    pub skip_running_builds: bool,

    /// Namespace Brigade builds live in
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct KubernetesConfig {
    /// kubeconfig context to use instead of the current one
    pub context: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
    Csv,
}

impl Default for VacuumConfig {
    fn default() -> Self {
        Self {
            age: None,
            max_builds: default_max_builds(),
            skip_running_builds: false,
            namespace: default_namespace(),
        }
    }
}

/// Marks "keep every build" wherever a build count is accepted.
pub const NO_MAX_BUILDS: i64 = -1;

fn default_max_builds() -> i64 {
    NO_MAX_BUILDS
}

fn default_namespace() -> String {
    "default".to_string()
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./vacuum.toml
    /// 3. ./vacuum.json
    /// 4. ./vacuum.yaml
    /// 5. ./vacuum.yml
    /// 6. `<config dir>/brigade-vacuum/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        for candidate in Self::candidates() {
            if candidate.exists() {
                return Self::load_from_path(&candidate);
            }
        }

        Ok(Self::default())
    }

    fn candidates() -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = ["vacuum.toml", "vacuum.json", "vacuum.yaml", "vacuum.yml"]
            .iter()
            .map(PathBuf::from)
            .collect();

        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("brigade-vacuum").join("config.toml"));
        }

        candidates
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }
}

/// Parse a duration string like "30s", "5m", "72h" or "7d".
///
/// A bare number is read as seconds.
pub fn parse_duration(s: &str) -> Result<Duration, VacuumError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(VacuumError::Config("empty duration string".to_string()));
    }

    let (num_str, suffix) = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or((s, ""), |(i, _)| (&s[..i], &s[i..]));

    let num: u64 = num_str
        .parse()
        .map_err(|_| VacuumError::Config(format!("invalid number in duration: {s}")))?;

    let multiplier = match suffix.trim() {
        "ms" | "millis" | "millisecond" | "milliseconds" => {
            return Ok(Duration::from_millis(num));
        }
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3600,
        "d" | "day" | "days" => 86400,
        other => {
            return Err(VacuumError::Config(format!(
                "unknown duration suffix: {other}"
            )))
        }
    };

    num.checked_mul(multiplier)
        .map(Duration::from_secs)
        .ok_or_else(|| VacuumError::Config(format!("duration out of range: {s}")))
}

/// Converts a configured build count into a retention limit.
pub fn parse_max_builds(max: i64) -> Result<MaxBuilds, VacuumError> {
    match max {
        NO_MAX_BUILDS => Ok(MaxBuilds::Unlimited),
        n => usize::try_from(n).map(MaxBuilds::AtMost).map_err(|_| {
            VacuumError::Config(format!(
                "max builds must be {NO_MAX_BUILDS} (unlimited) or a non-negative number, got {n}"
            ))
        }),
    }
}

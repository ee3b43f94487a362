//! # Configuration Module
//!
//! This module provides configuration support for licentia: an alternative
//! license catalog directory, default parallelism, and detection tuning.
//!
//! Configuration can be specified in a `.licentia.toml` file or via the
//! `LICENTIA_CONFIG` environment variable. Command-line flags override
//! everything read here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::license_detection::{DEFAULT_MAX_LINES, DEFAULT_THRESHOLD};
use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".licentia.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "LICENTIA_CONFIG";

/// Detection tuning.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DetectConfig {
  /// Similarity cutoff in `(0, 1]` below which a file is `unknown`.
  #[serde(default)]
  pub threshold: Option<f32>,

  /// Number of leading lines examined for the comment block.
  #[serde(default)]
  pub max_lines: Option<usize>,
}

/// Main configuration struct for licentia.
///
/// This struct is loaded from a `.licentia.toml` file.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  /// Directory shaped like the built-in `licenses/` catalog, used instead of it.
  /// Relative paths are resolved against the config file's directory.
  #[serde(default)]
  pub licenses_dir: Option<PathBuf>,

  /// Default number of worker threads.
  #[serde(default)]
  pub jobs: Option<usize>,

  #[serde(default)]
  pub detect: DetectConfig,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A value is outside its allowed range.
  #[error("Invalid value for '{field}': {message}")]
  InvalidValue { field: &'static str, message: String },
}

impl Config {
  /// Load configuration from a file.
  ///
  /// # Returns
  ///
  /// The loaded configuration, or an error if the file cannot be read,
  /// parsed, or validated.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let mut config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    if let Some(dir) = config.licenses_dir.take() {
      let base = path.parent().unwrap_or_else(|| Path::new("."));
      config.licenses_dir = Some(if dir.is_absolute() { dir } else { base.join(dir) });
    }

    Ok(config)
  }

  /// Validate the configuration.
  ///
  /// Checks that:
  /// - `jobs` and `detect.max-lines` are positive
  /// - `detect.threshold` lies in `(0, 1]`
  fn validate(&self) -> Result<(), ConfigError> {
    if self.jobs == Some(0) {
      return Err(ConfigError::InvalidValue {
        field: "jobs",
        message: "must be at least 1".to_string(),
      });
    }

    if let Some(threshold) = self.detect.threshold
      && !(threshold > 0.0 && threshold <= 1.0)
    {
      return Err(ConfigError::InvalidValue {
        field: "detect.threshold",
        message: format!("{threshold} is not in (0, 1]"),
      });
    }

    if self.detect.max_lines == Some(0) {
      return Err(ConfigError::InvalidValue {
        field: "detect.max-lines",
        message: "must be at least 1".to_string(),
      });
    }

    Ok(())
  }

  pub fn threshold(&self) -> f32 {
    self.detect.threshold.unwrap_or(DEFAULT_THRESHOLD)
  }

  pub fn max_lines(&self) -> usize {
    self.detect.max_lines.unwrap_or(DEFAULT_MAX_LINES)
  }
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `LICENTIA_CONFIG` environment variable
/// 3. `.licentia.toml` in the current directory
///
/// An explicit path is returned even if it does not exist, so that loading
/// it reports the problem.
pub fn discover_config_path(explicit_path: Option<&Path>, current_dir: &Path) -> Option<PathBuf> {
  // 1. Explicit path from CLI takes highest priority
  if let Some(path) = explicit_path {
    verbose_log!("Using explicit config path: {}", path.display());
    return Some(path.to_path_buf());
  }

  // 2. Check environment variable
  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  // 3. Check the current directory
  let local_config = current_dir.join(DEFAULT_CONFIG_FILENAME);
  if local_config.exists() {
    verbose_log!("Using config: {}", local_config.display());
    return Some(local_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path, or return the defaults.
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path from CLI flag
/// * `current_dir` - The directory searched for `.licentia.toml`
/// * `no_config` - If true, skip config file discovery and use defaults
pub fn load_config(explicit_path: Option<&Path>, current_dir: &Path, no_config: bool) -> Result<Config> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(Config::default());
  }

  match discover_config_path(explicit_path, current_dir) {
    Some(path) => Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display())),
    None => Ok(Config::default()),
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_parse_valid_config() {
    let config_content = concat!(
      "licenses-dir = \"/opt/licenses\"\n",
      "jobs = 4\n",
      "\n",
      "[detect]\n",
      "threshold = 0.9\n",
      "max-lines = 50\n",
    );

    let config: Config = toml::from_str(config_content).expect("valid config should parse");
    assert_eq!(config.licenses_dir, Some(PathBuf::from("/opt/licenses")));
    assert_eq!(config.jobs, Some(4));
    assert_eq!(config.threshold(), 0.9);
    assert_eq!(config.max_lines(), 50);
  }

  #[test]
  fn test_parse_empty_config() {
    let config: Config = toml::from_str("").expect("empty config should parse");
    assert_eq!(config, Config::default());
    assert_eq!(config.threshold(), DEFAULT_THRESHOLD);
    assert_eq!(config.max_lines(), DEFAULT_MAX_LINES);
  }

  #[test]
  fn test_unknown_field_is_rejected() {
    let result: Result<Config, _> = toml::from_str("colour = \"red\"\n");
    assert!(result.is_err());
  }

  #[test]
  fn test_validate_threshold_range() {
    for bad in [0.0, -0.5, 1.5] {
      let config = Config {
        detect: DetectConfig {
          threshold: Some(bad),
          max_lines: None,
        },
        ..Config::default()
      };
      assert!(
        matches!(config.validate(), Err(ConfigError::InvalidValue { field: "detect.threshold", .. })),
        "threshold {bad} should be rejected"
      );
    }
  }

  #[test]
  fn test_validate_zero_jobs() {
    let config = Config {
      jobs: Some(0),
      ..Config::default()
    };
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_load_resolves_relative_licenses_dir() {
    let temp_dir = TempDir::new().expect("tempdir");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    std::fs::write(&config_path, "licenses-dir = \"my-licenses\"\n").expect("write");

    let config = Config::load(&config_path).expect("load");
    assert_eq!(config.licenses_dir, Some(temp_dir.path().join("my-licenses")));
  }

  #[test]
  fn test_load_reports_parse_errors() {
    let temp_dir = TempDir::new().expect("tempdir");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    std::fs::write(&config_path, "jobs = \"many\"\n").expect("write");

    assert!(matches!(Config::load(&config_path), Err(ConfigError::ParseError { .. })));
  }

  #[test]
  fn test_discover_explicit_path_wins() {
    let temp_dir = TempDir::new().expect("tempdir");
    std::fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILENAME), "").expect("write");
    let explicit = temp_dir.path().join("other.toml");

    assert_eq!(discover_config_path(Some(&explicit), temp_dir.path()), Some(explicit));
  }

  #[test]
  fn test_load_config_no_config_returns_defaults() {
    let temp_dir = TempDir::new().expect("tempdir");
    std::fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILENAME), "jobs = 3\n").expect("write");

    let config = load_config(None, temp_dir.path(), true).expect("load");
    assert_eq!(config, Config::default());
  }

  #[test]
  fn test_load_config_missing_explicit_file_fails() {
    let temp_dir = TempDir::new().expect("tempdir");
    let missing = temp_dir.path().join("missing.toml");

    assert!(load_config(Some(&missing), temp_dir.path(), false).is_err());
  }
}

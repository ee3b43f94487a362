//! # Report Module
//!
//! Per-file outcomes of a batch run. Transform batches produce a
//! [`BatchReport`]; detection produces one [`DetectionResult`] per file,
//! which can be rendered as text or JSON.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::LicenseId;
use crate::error::{BatchError, Error};

/// Action taken on a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
  /// License header was added to the file
  Added,
  /// License header was removed from the file
  Removed,
  /// A different license header was swapped for the requested one
  Replaced { from: LicenseId },
  /// The content was already in the requested state
  Unchanged,
}

impl fmt::Display for FileAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FileAction::Added => write!(f, "added"),
      FileAction::Removed => write!(f, "removed"),
      FileAction::Replaced { from } => write!(f, "replaced {from}"),
      FileAction::Unchanged => write!(f, "unchanged"),
    }
  }
}

/// Outcome for one successfully processed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
  /// Path to the file
  pub path: PathBuf,
  /// Action taken, or that would be taken in a dry run
  pub action: FileAction,
  /// Rendered diff, only set for dry runs that would change the file
  pub diff: Option<String>,
}

impl FileReport {
  pub fn new(path: impl Into<PathBuf>, action: FileAction) -> Self {
    Self {
      path: path.into(),
      action,
      diff: None,
    }
  }

  pub const fn changed(&self) -> bool {
    !matches!(self.action, FileAction::Unchanged)
  }
}

/// Results of a set or unset batch.
///
/// Every input file ends up in exactly one of `reports` or `errors`, both in
/// input order.
#[derive(Debug, Default)]
pub struct BatchReport {
  pub reports: Vec<FileReport>,
  pub errors: BatchError,
}

impl BatchReport {
  /// Number of files the batch was run on.
  pub fn len(&self) -> usize {
    self.reports.len() + self.errors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Number of files that were (or would be) modified.
  pub fn changed(&self) -> usize {
    self.reports.iter().filter(|r| r.changed()).count()
  }

  pub fn failed(&self) -> usize {
    self.errors.len()
  }

  /// The per-file reports, or [`Error::Batch`] if any file failed.
  pub fn into_result(self) -> Result<Vec<FileReport>, Error> {
    self.errors.into_result().map(|()| self.reports).map_err(Error::Batch)
  }
}

impl FromIterator<Result<FileReport, Error>> for BatchReport {
  fn from_iter<I: IntoIterator<Item = Result<FileReport, Error>>>(iter: I) -> Self {
    let mut batch = Self::default();
    for outcome in iter {
      match outcome {
        Ok(report) => batch.reports.push(report),
        Err(error) => batch.errors.push(error),
      }
    }
    batch
  }
}

/// Detection outcome for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
  /// Path to the file
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  /// Detected license, `unknown` when nothing matched or the file failed
  pub license: LicenseId,
  /// Why the file could not be examined
  pub error: Option<String>,
}

impl DetectionResult {
  pub fn detected(path: impl Into<PathBuf>, license: LicenseId) -> Self {
    Self {
      path: path.into(),
      license,
      error: None,
    }
  }

  pub fn failed(path: impl Into<PathBuf>, error: &Error) -> Self {
    Self {
      path: path.into(),
      license: LicenseId::Unknown,
      error: Some(error.to_string()),
    }
  }

  pub const fn is_error(&self) -> bool {
    self.error.is_some()
  }
}

/// Helper module for serializing/deserializing PathBuf
mod path_serialization {
  use std::path::PathBuf;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &std::path::Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Supported detection output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetectFormat {
  /// One `path: license` line per file
  #[default]
  Text,
  /// JSON array for machine readability
  Json,
}

impl fmt::Display for DetectFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DetectFormat::Text => write!(f, "text"),
      DetectFormat::Json => write!(f, "json"),
    }
  }
}

/// Error returned when parsing a string into a DetectFormat fails
#[derive(Debug, thiserror::Error)]
#[error("Invalid output format: {0}")]
pub struct ParseDetectFormatError(pub String);

impl FromStr for DetectFormat {
  type Err = ParseDetectFormatError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "text" => Ok(DetectFormat::Text),
      "json" => Ok(DetectFormat::Json),
      _ => Err(ParseDetectFormatError(s.to_string())),
    }
  }
}

/// Renders detection results in the requested format.
///
/// Text output has one `path: license` line per examined file; failed files
/// are left out and reported separately. JSON output lists every file.
pub fn render_detections(results: &[DetectionResult], format: DetectFormat) -> serde_json::Result<String> {
  match format {
    DetectFormat::Json => serde_json::to_string_pretty(results),
    DetectFormat::Text => Ok(
      results
        .iter()
        .filter(|r| !r.is_error())
        .map(|r| format!("{}: {}\n", r.path.display(), r.license))
        .collect(),
    ),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_batch_report_partitions_outcomes() {
    let outcomes = vec![
      Ok(FileReport::new("a.rs", FileAction::Added)),
      Err(Error::UnknownLicense("x".to_string())),
      Ok(FileReport::new("b.rs", FileAction::Unchanged)),
    ];
    let batch: BatchReport = outcomes.into_iter().collect();

    assert_eq!(batch.len(), 3);
    assert_eq!(batch.changed(), 1);
    assert_eq!(batch.failed(), 1);
    match batch.into_result() {
      Err(Error::Batch(errors)) => assert_eq!(errors.to_string(), "! unknown license type: x\n"),
      other => panic!("expected a batch error, got {other:?}"),
    }
  }

  #[test]
  fn test_batch_report_without_errors_yields_reports() {
    let batch: BatchReport = vec![Ok(FileReport::new("a.rs", FileAction::Removed))].into_iter().collect();
    let reports = batch.into_result().expect("no failures");
    assert_eq!(reports, vec![FileReport::new("a.rs", FileAction::Removed)]);
  }

  #[test]
  fn test_detect_format_parsing() {
    assert_eq!("JSON".parse::<DetectFormat>().expect("json"), DetectFormat::Json);
    assert_eq!("text".parse::<DetectFormat>().expect("text"), DetectFormat::Text);
    assert!("csv".parse::<DetectFormat>().is_err());
  }

  #[test]
  fn test_render_detections_text() {
    let results = vec![
      DetectionResult::detected("a.rs", LicenseId::Mpl2),
      DetectionResult::detected("b.rs", LicenseId::Unknown),
    ];
    let text = render_detections(&results, DetectFormat::Text).expect("render");
    assert_eq!(text, "a.rs: mpl2\nb.rs: unknown\n");
  }

  #[test]
  fn test_render_detections_json() {
    let err = Error::Scan {
      path: PathBuf::from("c.bin"),
      message: "invalid UTF-8 at byte 0".to_string(),
    };
    let results = vec![DetectionResult::detected("a.rs", LicenseId::Gpl3), DetectionResult::failed("c.bin", &err)];

    let json = render_detections(&results, DetectFormat::Json).expect("render");
    let parsed: Vec<DetectionResult> = serde_json::from_str(&json).expect("parse");

    assert_eq!(parsed, results);
    assert!(json.contains("\"license\": \"gpl3\""));
    assert!(parsed[1].is_error());
  }
}

//! # Processor Module
//!
//! This module runs license operations over batches of files.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - File reading and writing operations
//! - [`header_transformer`] - Header insertion and removal on file content
//! - [`file_collector`] - Expanding file arguments, globs and directories
//!
//! The [`Processor`] struct is the main entry point for all file operations,
//! orchestrating the submodules. Each file of a batch is handled by exactly one
//! task on a rayon thread pool; per-file failures are collected, never
//! short-circuited.

mod file_collector;
mod file_io;
mod header_transformer;

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
pub use file_collector::{CollectedFiles, FileCollector, PatternMatcher};
pub use file_io::FileIO;
pub use header_transformer::{HeaderTransformer, split_directive};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::catalog::{LicenseCatalog, LicenseId};
use crate::diff::render_diff;
use crate::error::Error;
use crate::info_log;
use crate::license_detection::{DEFAULT_MAX_LINES, DEFAULT_THRESHOLD, LicenseDetector, SimilarityDetector};
use crate::report::{BatchReport, DetectionResult, FileAction, FileReport};
use crate::templates::{LicenseData, StyleSelector};

/// Configuration for creating a Processor instance.
pub struct ProcessorConfig {
  pub catalog: Arc<LicenseCatalog>,

  /// Worker threads; `None` uses one per CPU
  pub jobs: Option<usize>,

  /// Compute changes and diffs without writing files
  pub dry_run: bool,

  // Detection tuning
  pub threshold: f32,
  pub max_lines: usize,

  // Optional components
  pub license_detector: Option<Box<dyn LicenseDetector>>,
}

impl ProcessorConfig {
  /// Creates a new ProcessorConfig with required fields and sensible defaults.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// ProcessorConfig {
  ///     dry_run: true,
  ///     ..ProcessorConfig::new(catalog)
  /// }
  /// ```
  pub fn new(catalog: Arc<LicenseCatalog>) -> Self {
    Self {
      catalog,
      jobs: None,
      dry_run: false,
      threshold: DEFAULT_THRESHOLD,
      max_lines: DEFAULT_MAX_LINES,
      license_detector: None,
    }
  }
}

/// Parameters of a `set` batch.
#[derive(Debug, Clone)]
pub struct SetRequest {
  pub license: LicenseId,
  pub data: LicenseData,
  pub style: StyleSelector,
  /// Swap out a different detected license instead of reporting a conflict
  pub replace: bool,
}

/// Parameters of an `unset` batch.
#[derive(Debug, Clone)]
pub struct UnsetRequest {
  pub license: LicenseId,
  pub style: StyleSelector,
}

/// Processor for handling license operations on files.
///
/// The `Processor` is responsible for:
/// - Expanding file arguments into concrete files
/// - Setting, replacing and removing license headers
/// - Detecting the license of each file
/// - Producing diffs instead of writes in dry run mode
pub struct Processor {
  /// Header transformer shared by every task
  transformer: HeaderTransformer,

  /// License detector for classifying existing headers
  license_detector: Box<dyn LicenseDetector>,

  /// Thread pool the batches fan out on
  pool: rayon::ThreadPool,

  /// Leading lines examined when detecting
  max_lines: usize,

  /// Whether to only compute diffs without modifying files
  dry_run: bool,

  /// File collector for pattern matching and directory traversal
  file_collector: FileCollector,
}

impl Processor {
  /// Creates a new processor with the specified configuration.
  ///
  /// # Errors
  ///
  /// Returns an error if the worker thread pool cannot be built.
  pub fn new(config: ProcessorConfig) -> Result<Self> {
    let jobs = config.jobs.unwrap_or_else(num_cpus::get).max(1);
    let pool = rayon::ThreadPoolBuilder::new()
      .num_threads(jobs)
      .thread_name(|i| format!("licentia-worker-{i}"))
      .build()
      .with_context(|| format!("Failed to build a thread pool with {jobs} workers"))?;
    debug!("Processor using {} worker threads", jobs);

    let license_detector = match config.license_detector {
      Some(detector) => detector,
      None => Box::new(SimilarityDetector::new(&config.catalog, config.threshold)),
    };

    Ok(Self {
      transformer: HeaderTransformer::new(config.catalog),
      license_detector,
      pool,
      max_lines: config.max_lines,
      dry_run: config.dry_run,
      file_collector: FileCollector::new(),
    })
  }

  pub fn catalog(&self) -> &LicenseCatalog {
    self.transformer.catalog()
  }

  /// Expands file arguments (paths, directories, globs) into files.
  pub fn collect_files(&self, patterns: &[String]) -> CollectedFiles {
    self.file_collector.collect(patterns)
  }

  /// Runs `task` once per file on the pool, returning results in input order.
  fn run_batch<T, F>(&self, files: &[PathBuf], task: F) -> Vec<T>
  where
    T: Send,
    F: Fn(&Path) -> T + Send + Sync,
  {
    debug!("Processing {} files with rayon", files.len());
    self.pool.install(|| files.par_iter().map(|path| task(path.as_path())).collect())
  }

  /// Puts the requested license header on every file.
  ///
  /// Files already carrying the license are left alone. Files carrying a
  /// different known license are replaced when `request.replace` is set and
  /// reported as [`Error::LicenseConflict`] otherwise. A replacement whose old
  /// header cannot be stripped fails with [`Error::HeaderNotRemovable`] and
  /// leaves the file untouched.
  pub fn set(&self, files: &[PathBuf], request: &SetRequest) -> BatchReport {
    self
      .run_batch(files, |path| self.set_file(path, request))
      .into_iter()
      .collect()
  }

  /// Removes the requested license header from every file.
  pub fn unset(&self, files: &[PathBuf], request: &UnsetRequest) -> BatchReport {
    self
      .run_batch(files, |path| self.unset_file(path, request))
      .into_iter()
      .collect()
  }

  /// Classifies the leading comment of every file.
  ///
  /// Unreadable files yield a result carrying the error; `unknown` is a
  /// regular result.
  pub fn detect(&self, files: &[PathBuf]) -> Vec<DetectionResult> {
    self.run_batch(files, |path| match self.detect_file(path) {
      Ok(license) => DetectionResult::detected(path, license),
      Err(e) => DetectionResult::failed(path, &e),
    })
  }

  /// Classifies already-loaded content.
  pub fn detect_content(&self, content: &str) -> LicenseId {
    self.license_detector.detect(content, self.max_lines)
  }

  fn detect_file(&self, path: &Path) -> Result<LicenseId, Error> {
    let content = FileIO::read_content(path)?;
    let license = self.detect_content(&content);
    trace!("Detected {} in {}", license, path.display());
    Ok(license)
  }

  fn set_file(&self, path: &Path, request: &SetRequest) -> Result<FileReport, Error> {
    let style = request.style.resolve(path).ok_or_else(|| Error::NoCommentStyle {
      path: path.to_path_buf(),
    })?;
    let content = FileIO::read_content(path)?;
    let detected = self.detect_content(&content);

    let (base, action) = if detected == request.license {
      trace!("{} already has a {} header", path.display(), detected);
      return Ok(FileReport::new(path, FileAction::Unchanged));
    } else if detected.is_unknown() {
      (Cow::Borrowed(content.as_str()), FileAction::Added)
    } else if request.replace {
      let stripped = self.transformer.remove(&content, detected, &style);
      if self.detect_content(&stripped) == detected {
        return Err(Error::HeaderNotRemovable {
          path: path.to_path_buf(),
          found: detected.to_string(),
        });
      }
      (Cow::Owned(stripped), FileAction::Replaced { from: detected })
    } else {
      return Err(Error::LicenseConflict {
        path: path.to_path_buf(),
        found: detected.to_string(),
      });
    };

    let updated = self.transformer.insert(&base, request.license, &request.data, &style);
    self.finish(path, &content, updated, action)
  }

  fn unset_file(&self, path: &Path, request: &UnsetRequest) -> Result<FileReport, Error> {
    let style = request.style.resolve(path).ok_or_else(|| Error::NoCommentStyle {
      path: path.to_path_buf(),
    })?;
    let content = FileIO::read_content(path)?;
    let updated = self.transformer.remove(&content, request.license, &style);
    self.finish(path, &content, updated, FileAction::Removed)
  }

  /// Writes the new content, or renders a diff in dry run mode.
  fn finish(&self, path: &Path, original: &str, updated: String, action: FileAction) -> Result<FileReport, Error> {
    if updated == original {
      return Ok(FileReport::new(path, FileAction::Unchanged));
    }

    let mut report = FileReport::new(path, action);
    if self.dry_run {
      report.diff = Some(render_diff(path, original, &updated));
    } else {
      FileIO::write_content(path, &updated)?;
      info_log!("{} license header: {}", capitalize(&action.to_string()), path.display());
    }

    Ok(report)
  }
}

fn capitalize(text: &str) -> String {
  let mut chars = text.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

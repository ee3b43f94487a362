//! # File Collector Module
//!
//! This module expands user-provided file arguments into the list of files a
//! batch works on. Each argument is a plain file, a directory (walked
//! recursively), or a glob pattern. Entries that cannot be listed while
//! expanding become per-path errors next to the collected files.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{BatchError, Error};

/// Version-control directories never descended into.
const SKIPPED_DIRS: [&str; 3] = [".git", ".hg", ".svn"];

/// How one file argument is resolved.
#[derive(Debug, PartialEq, Eq)]
pub enum PatternMatcher {
  /// An existing file
  File(PathBuf),
  /// An existing directory, walked recursively
  Dir(PathBuf),
  /// A glob pattern
  Glob(String),
  /// Nothing on disk matches; kept as-is so reading it reports an error
  Literal(PathBuf),
}

impl PatternMatcher {
  pub fn from_pattern(pattern: &str) -> Self {
    let path = PathBuf::from(pattern);
    if path.is_dir() {
      Self::Dir(path)
    } else if path.is_file() {
      Self::File(path)
    } else if is_glob(pattern) {
      Self::Glob(pattern.to_string())
    } else {
      Self::Literal(path)
    }
  }
}

fn is_glob(pattern: &str) -> bool {
  pattern.contains(['*', '?', '['])
}

/// Files found for a set of arguments, plus the paths that could not be listed.
#[derive(Debug, Default)]
pub struct CollectedFiles {
  pub files: Vec<PathBuf>,
  pub errors: BatchError,
}

/// File collector for pattern matching and directory traversal.
#[derive(Debug, Default)]
pub struct FileCollector;

impl FileCollector {
  pub const fn new() -> Self {
    Self
  }

  /// Expands `patterns` into a deduplicated file list.
  ///
  /// Order follows the arguments; files inside a directory come in sorted
  /// order. A pattern that matches nothing is kept as a literal path.
  /// Unreadable directories and glob matches are reported as
  /// [`Error::FileIo`] entries in [`CollectedFiles::errors`].
  pub fn collect(&self, patterns: &[String]) -> CollectedFiles {
    let mut seen = HashSet::new();
    let mut collected = CollectedFiles {
      files: Vec::with_capacity(patterns.len()),
      errors: BatchError::new(),
    };

    for pattern in patterns {
      for file in self.expand(PatternMatcher::from_pattern(pattern), &mut collected.errors) {
        if seen.insert(file.clone()) {
          collected.files.push(file);
        }
      }
    }

    debug!(
      "Collected {} files from {} arguments ({} unreadable)",
      collected.files.len(),
      patterns.len(),
      collected.errors.len()
    );
    collected
  }

  fn expand(&self, matcher: PatternMatcher, errors: &mut BatchError) -> Vec<PathBuf> {
    match matcher {
      PatternMatcher::File(path) | PatternMatcher::Literal(path) => vec![path],
      PatternMatcher::Dir(dir) => self.traverse_directory(&dir, errors),
      PatternMatcher::Glob(pattern) => self.expand_glob(&pattern, errors),
    }
  }

  fn expand_glob(&self, pattern: &str, errors: &mut BatchError) -> Vec<PathBuf> {
    let paths = match glob::glob(pattern) {
      Ok(paths) => paths,
      Err(e) => {
        warn!("Invalid glob pattern {}: {}", pattern, e);
        return vec![PathBuf::from(pattern)];
      }
    };

    let errors_before = errors.len();
    let mut files = Vec::new();
    for entry in paths {
      match entry {
        Ok(path) if path.is_dir() => files.extend(self.traverse_directory(&path, errors)),
        Ok(path) => files.push(path),
        Err(e) => {
          warn!("Unreadable glob match: {}", e);
          let path = e.path().to_path_buf();
          errors.push(Error::file_io(path, "list", e.into_error()));
        }
      }
    }

    if files.is_empty() && errors.len() == errors_before {
      debug!("Glob {} matched nothing; keeping it as a path", pattern);
      files.push(PathBuf::from(pattern));
    }
    files
  }

  /// Traverses a directory recursively and collects all files.
  ///
  /// Entries that cannot be read are pushed to `errors` and the walk goes on.
  pub fn traverse_directory(&self, dir: &Path, errors: &mut BatchError) -> Vec<PathBuf> {
    debug!("Scanning directory: {}", dir.display());
    let start_time = std::time::Instant::now();

    let mut all_files = Vec::new();
    let walker = WalkDir::new(dir).sort_by_file_name().into_iter().filter_entry(|entry| {
      !(entry.file_type().is_dir() && SKIPPED_DIRS.iter().any(|skipped| entry.file_name() == *skipped))
    });

    for entry in walker {
      match entry {
        Ok(entry) if entry.file_type().is_file() => all_files.push(entry.into_path()),
        Ok(_) => {}
        Err(e) => {
          warn!("Error reading directory entry: {}", e);
          let path = e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
          errors.push(Error::file_io(path, "list", io::Error::from(e)));
        }
      }
    }

    debug!(
      "Found {} files in {}ms",
      all_files.len(),
      start_time.elapsed().as_millis()
    );
    all_files
  }
}

//! # Error Module
//!
//! Typed errors for the library side of licentia. Per-file failures carry the
//! path they happened on so a batch can report every one of them together.

use std::fmt;
use std::path::PathBuf;

/// Convenience alias used throughout the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced by the catalog, the transform engine, and batch processing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// A license identifier or one of its sub-assets is missing from the catalog.
  #[error("asset not found: {key}")]
  AssetNotFound { key: String },

  /// Reading, writing, or stat-ing a target file failed.
  #[error("failed to {action} {}: {source}", path.display())]
  FileIo {
    path: PathBuf,
    action: &'static str,
    source: std::io::Error,
  },

  /// The file content could not be scanned line by line.
  #[error("failed to scan {}: {message}", path.display())]
  Scan { path: PathBuf, message: String },

  /// The file already carries a different license header.
  #[error("{} already has a {found} license header (use --replace to swap it)", path.display())]
  LicenseConflict { path: PathBuf, found: String },

  /// A detected header differs from the catalog text (other comment marker,
  /// block comment, local edits), so it cannot be swapped out.
  #[error("{} has a {found} license header that cannot be removed with this comment style", path.display())]
  HeaderNotRemovable { path: PathBuf, found: String },

  /// No comment marker is known for the file's type.
  #[error("no comment style known for {}", path.display())]
  NoCommentStyle { path: PathBuf },

  /// The identifier does not name a license in the catalog.
  #[error("unknown license type: {0}")]
  UnknownLicense(String),

  /// One or more files in a batch failed.
  #[error(transparent)]
  Batch(#[from] BatchError),
}

impl Error {
  /// Builds a [`Error::FileIo`] for the given path.
  pub fn file_io(path: impl Into<PathBuf>, action: &'static str, source: std::io::Error) -> Self {
    Self::FileIo {
      path: path.into(),
      action,
      source,
    }
  }

  /// Returns `true` for missing-asset errors, which callers may treat as soft.
  pub const fn is_not_found(&self) -> bool {
    matches!(self, Self::AssetNotFound { .. })
  }
}

/// Ordered collection of per-file errors accumulated over a batch.
///
/// An empty `BatchError` means the batch succeeded. When displayed, each
/// error is rendered on its own line prefixed with `! `.
#[derive(Debug, Default)]
pub struct BatchError {
  errors: Vec<Error>,
}

impl BatchError {
  pub const fn new() -> Self {
    Self { errors: Vec::new() }
  }

  /// Appends one error to the aggregate.
  pub fn push(&mut self, error: Error) {
    self.errors.push(error);
  }

  pub fn is_empty(&self) -> bool {
    self.errors.is_empty()
  }

  pub fn len(&self) -> usize {
    self.errors.len()
  }

  pub fn errors(&self) -> &[Error] {
    &self.errors
  }

  /// `Ok(())` when nothing failed, otherwise the aggregate itself.
  pub fn into_result(self) -> Result<(), BatchError> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }
}

impl IntoIterator for BatchError {
  type Item = Error;
  type IntoIter = std::vec::IntoIter<Error>;

  fn into_iter(self) -> Self::IntoIter {
    self.errors.into_iter()
  }
}

impl Extend<Error> for BatchError {
  fn extend<I: IntoIterator<Item = Error>>(&mut self, iter: I) {
    self.errors.extend(iter);
  }
}

impl FromIterator<Error> for BatchError {
  fn from_iter<I: IntoIterator<Item = Error>>(iter: I) -> Self {
    Self {
      errors: iter.into_iter().collect(),
    }
  }
}

impl fmt::Display for BatchError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for error in &self.errors {
      writeln!(f, "! {error}")?;
    }
    Ok(())
  }
}

impl std::error::Error for BatchError {}

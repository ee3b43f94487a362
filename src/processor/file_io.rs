//! # File I/O Module
//!
//! This module provides file reading and writing utilities for the processor.
//! It encapsulates synchronous whole-file operations: files are read fully,
//! transformed in memory, and written back fully.

use std::fs;
use std::path::Path;

use tracing::trace;

use crate::error::{Error, Result};

/// Mode applied to a rewritten file when its original mode could not be read.
#[cfg(unix)]
pub const FALLBACK_MODE: u32 = 0o660;

/// File I/O operations for the processor.
///
/// This struct provides static methods for reading and writing files.
pub struct FileIO;

impl FileIO {
  /// Reads the complete file content as UTF-8.
  ///
  /// # Errors
  ///
  /// Returns [`Error::FileIo`] when the file cannot be read and
  /// [`Error::Scan`] when its content is not valid UTF-8.
  pub fn read_content(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::file_io(path, "read", e))?;

    String::from_utf8(bytes).map_err(|e| Error::Scan {
      path: path.to_path_buf(),
      message: format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()),
    })
  }

  /// Writes `content` over the file, keeping its permission mode.
  ///
  /// The original permissions are captured before writing and re-applied
  /// afterwards. If they could not be read, unix targets fall back to
  /// [`FALLBACK_MODE`].
  pub fn write_content(path: &Path, content: &str) -> Result<()> {
    let original = fs::metadata(path).map(|m| m.permissions()).ok();

    fs::write(path, content).map_err(|e| Error::file_io(path, "write", e))?;

    match original {
      Some(permissions) => {
        fs::set_permissions(path, permissions).map_err(|e| Error::file_io(path, "set permissions on", e))?;
      }
      None => Self::apply_fallback_mode(path)?,
    }

    trace!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
  }

  #[cfg(unix)]
  fn apply_fallback_mode(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(FALLBACK_MODE))
      .map_err(|e| Error::file_io(path, "set permissions on", e))
  }

  #[cfg(not(unix))]
  fn apply_fallback_mode(_path: &Path) -> Result<()> {
    Ok(())
  }
}

//! Asset providers backing the license catalog.
//!
//! Keys look like paths: `licenses` names the catalog directory and
//! `licenses/mit.header` names one asset inside it.

use std::borrow::Cow;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{Error, Result};

mod embedded {
  include!(concat!(env!("OUT_DIR"), "/embedded_licenses.rs"));
}

/// Directory key under which every license asset lives.
pub const LICENSES_DIR: &str = "licenses";

/// Read-only access to license assets.
pub trait AssetProvider: Send + Sync {
  /// Returns the asset stored under `key`, or [`Error::AssetNotFound`].
  fn get(&self, key: &str) -> Result<Cow<'_, str>>;

  /// Lists the asset names stored directly under the directory `key`.
  fn list_dir(&self, key: &str) -> Result<Vec<String>>;
}

fn not_found(key: &str) -> Error {
  Error::AssetNotFound { key: key.to_string() }
}

/// Splits `licenses/<name>` into `<name>`.
fn asset_name(key: &str) -> Option<&str> {
  key
    .strip_prefix(LICENSES_DIR)
    .and_then(|rest| rest.strip_prefix('/'))
    .filter(|name| !name.is_empty() && !name.contains('/'))
}

fn is_catalog_dir(key: &str) -> bool {
  key.trim_end_matches('/') == LICENSES_DIR
}

/// The `licenses/` directory compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedAssets;

impl AssetProvider for EmbeddedAssets {
  fn get(&self, key: &str) -> Result<Cow<'_, str>> {
    let name = asset_name(key).ok_or_else(|| not_found(key))?;
    embedded::EMBEDDED_LICENSES
      .iter()
      .find(|(asset, _)| *asset == name)
      .map(|(_, text)| Cow::Borrowed(*text))
      .ok_or_else(|| not_found(key))
  }

  fn list_dir(&self, key: &str) -> Result<Vec<String>> {
    if !is_catalog_dir(key) {
      return Err(not_found(key));
    }
    Ok(
      embedded::EMBEDDED_LICENSES
        .iter()
        .map(|(name, _)| (*name).to_string())
        .collect(),
    )
  }
}

/// A `licenses/`-shaped directory on disk.
///
/// The directory itself stands in for the `licenses` key, so
/// `DirectoryAssets::new("/opt/licenses")` serves `licenses/mit` from
/// `/opt/licenses/mit`.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
  root: PathBuf,
}

impl DirectoryAssets {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }
}

impl AssetProvider for DirectoryAssets {
  fn get(&self, key: &str) -> Result<Cow<'_, str>> {
    let name = asset_name(key).ok_or_else(|| not_found(key))?;
    let path = self.root.join(name);
    trace!("Reading license asset: {}", path.display());

    match fs::read_to_string(&path) {
      Ok(text) => Ok(Cow::Owned(text)),
      Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found(key)),
      Err(e) => Err(Error::file_io(path, "read", e)),
    }
  }

  fn list_dir(&self, key: &str) -> Result<Vec<String>> {
    if !is_catalog_dir(key) {
      return Err(not_found(key));
    }

    let entries = match fs::read_dir(&self.root) {
      Ok(entries) => entries,
      Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found(key)),
      Err(e) => return Err(Error::file_io(&self.root, "list", e)),
    };

    let mut names = Vec::new();
    for entry in entries {
      let entry = entry.map_err(|e| Error::file_io(&self.root, "list", e))?;
      if entry.path().is_file()
        && let Ok(name) = entry.file_name().into_string()
      {
        names.push(name);
      }
    }
    names.sort();
    Ok(names)
  }
}

#[cfg(test)]
mod tests {
  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_asset_name_parsing() {
    assert_eq!(asset_name("licenses/mit"), Some("mit"));
    assert_eq!(asset_name("licenses/mit.header"), Some("mit.header"));
    assert_eq!(asset_name("licenses/"), None);
    assert_eq!(asset_name("other/mit"), None);
    assert_eq!(asset_name("licenses/a/b"), None);
  }

  #[test]
  fn test_embedded_assets_contain_catalog() {
    let names = EmbeddedAssets.list_dir("licenses").expect("embedded catalog");
    assert!(names.iter().any(|n| n == "mpl2"));
    assert!(names.iter().any(|n| n == "mpl2.header"));
    assert!(names.iter().any(|n| n == "unlicense"));
  }

  #[test]
  fn test_embedded_get_missing_is_not_found() {
    let err = EmbeddedAssets.get("licenses/unlicense.header").expect_err("no header");
    assert!(err.is_not_found());
  }

  #[test]
  fn test_directory_assets() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("mit"), "MIT text").expect("write");
    fs::write(dir.path().join("mit.header"), "header text").expect("write");

    let assets = DirectoryAssets::new(dir.path());
    assert_eq!(assets.list_dir("licenses").expect("list"), vec!["mit", "mit.header"]);
    assert_eq!(assets.get("licenses/mit").expect("get"), "MIT text");
    assert!(assets.get("licenses/mit.copyright").expect_err("missing").is_not_found());
  }

  #[test]
  fn test_directory_assets_missing_root() {
    let dir = tempdir().expect("tempdir");
    let assets = DirectoryAssets::new(dir.path().join("nope"));
    assert!(assets.list_dir("licenses").expect_err("missing").is_not_found());
  }
}

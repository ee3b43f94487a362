//! # Catalog Module
//!
//! The fixed registry of license texts. Each [`LicenseId`] maps to a
//! [`LicenseDefinition`] holding up to three blobs:
//!
//! - the canonical full text (`licenses/<id>`)
//! - a copyright template (`licenses/<id>.copyright`)
//! - a per-file header template (`licenses/<id>.header`)
//!
//! The catalog is loaded once from an [`AssetProvider`] and never mutated
//! afterwards. Components receive it explicitly, usually behind an `Arc`.

mod assets;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub use assets::{AssetProvider, DirectoryAssets, EmbeddedAssets, LICENSES_DIR};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::templates::{LicenseData, render};

/// Identifier of a license in the catalog.
///
/// `Unknown` is the sentinel returned by detection when no catalog entry
/// matches; it never has a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseId {
  Apache2,
  Cddl,
  Epl,
  Freebsd,
  Gpl2,
  Gpl3,
  Lgpl2,
  Lgpl3,
  Mit,
  Mpl2,
  Newbsd,
  Unlicense,
  Unknown,
}

impl LicenseId {
  /// Every real license identifier, in alphabetical order.
  pub const ALL: [LicenseId; 12] = [
    LicenseId::Apache2,
    LicenseId::Cddl,
    LicenseId::Epl,
    LicenseId::Freebsd,
    LicenseId::Gpl2,
    LicenseId::Gpl3,
    LicenseId::Lgpl2,
    LicenseId::Lgpl3,
    LicenseId::Mit,
    LicenseId::Mpl2,
    LicenseId::Newbsd,
    LicenseId::Unlicense,
  ];

  pub const fn as_str(self) -> &'static str {
    match self {
      LicenseId::Apache2 => "apache2",
      LicenseId::Cddl => "cddl",
      LicenseId::Epl => "epl",
      LicenseId::Freebsd => "freebsd",
      LicenseId::Gpl2 => "gpl2",
      LicenseId::Gpl3 => "gpl3",
      LicenseId::Lgpl2 => "lgpl2",
      LicenseId::Lgpl3 => "lgpl3",
      LicenseId::Mit => "mit",
      LicenseId::Mpl2 => "mpl2",
      LicenseId::Newbsd => "newbsd",
      LicenseId::Unlicense => "unlicense",
      LicenseId::Unknown => "unknown",
    }
  }

  pub const fn is_unknown(self) -> bool {
    matches!(self, LicenseId::Unknown)
  }
}

impl fmt::Display for LicenseId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for LicenseId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let wanted = s.trim().to_lowercase();
    LicenseId::ALL
      .into_iter()
      .find(|id| id.as_str() == wanted)
      .ok_or_else(|| Error::UnknownLicense(s.to_string()))
  }
}

/// The texts the catalog holds for one license.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseDefinition {
  pub full_text: Option<String>,
  pub copyright: Option<String>,
  pub header: Option<String>,
}

/// Immutable registry of license definitions.
#[derive(Debug, Clone)]
pub struct LicenseCatalog {
  definitions: BTreeMap<LicenseId, LicenseDefinition>,
}

impl LicenseCatalog {
  /// Loads every license found in the provider's `licenses` directory.
  ///
  /// # Errors
  ///
  /// Returns [`Error::AssetNotFound`] when the directory is missing or holds
  /// no recognizable license, and propagates I/O failures from the provider.
  pub fn load(provider: &dyn AssetProvider) -> Result<Self> {
    let mut definitions = BTreeMap::new();

    for name in provider.list_dir(LICENSES_DIR)? {
      if name.ends_with(".header") || name.ends_with(".copyright") {
        continue;
      }

      let id = match name.parse::<LicenseId>() {
        Ok(id) => id,
        Err(_) => {
          warn!("Skipping unrecognized license asset: {}", name);
          continue;
        }
      };

      let definition = LicenseDefinition {
        full_text: optional_asset(provider, &format!("{LICENSES_DIR}/{id}"))?,
        copyright: optional_asset(provider, &format!("{LICENSES_DIR}/{id}.copyright"))?,
        header: optional_asset(provider, &format!("{LICENSES_DIR}/{id}.header"))?,
      };
      debug!(
        "Loaded license {} (copyright: {}, header: {})",
        id,
        definition.copyright.is_some(),
        definition.header.is_some()
      );
      definitions.insert(id, definition);
    }

    if definitions.is_empty() {
      return Err(Error::AssetNotFound {
        key: LICENSES_DIR.to_string(),
      });
    }

    Ok(Self { definitions })
  }

  /// Loads the catalog compiled into the binary.
  pub fn embedded() -> Result<Self> {
    Self::load(&EmbeddedAssets)
  }

  pub fn lookup(&self, id: LicenseId) -> Result<&LicenseDefinition> {
    self.definitions.get(&id).ok_or_else(|| Error::AssetNotFound {
      key: format!("{LICENSES_DIR}/{id}"),
    })
  }

  /// All identifiers in the catalog, in stable alphabetical order.
  pub fn identifiers(&self) -> Vec<LicenseId> {
    self.definitions.keys().copied().collect()
  }

  pub fn contains(&self, id: LicenseId) -> bool {
    self.definitions.contains_key(&id)
  }

  /// Header template for `id`; `None` means the license needs no per-file
  /// header.
  pub fn header(&self, id: LicenseId) -> Option<&str> {
    self.definitions.get(&id).and_then(|d| d.header.as_deref())
  }

  /// Copyright template for `id`; `None` means no copyright line is added.
  pub fn copyright(&self, id: LicenseId) -> Option<&str> {
    self.definitions.get(&id).and_then(|d| d.copyright.as_deref())
  }

  /// Canonical full text for `id`. Unlike the header and copyright lookups,
  /// a missing full text is an error.
  pub fn full_text(&self, id: LicenseId) -> Result<&str> {
    self
      .lookup(id)?
      .full_text
      .as_deref()
      .ok_or_else(|| Error::AssetNotFound {
        key: format!("{LICENSES_DIR}/{id}"),
      })
  }

  /// Renders the full license with the copyright notice prepended.
  pub fn dump(&self, id: LicenseId, data: &LicenseData) -> Result<String> {
    let full_text = self.full_text(id)?;

    let mut text = String::new();
    if let Some(copyright) = self.copyright(id) {
      text.push_str(copyright);
      if !copyright.ends_with('\n') {
        text.push('\n');
      }
    }
    text.push_str(full_text);

    Ok(render(&text, data))
  }
}

fn optional_asset(provider: &dyn AssetProvider, key: &str) -> Result<Option<String>> {
  match provider.get(key) {
    Ok(text) => Ok(Some(text.into_owned())),
    Err(e) if e.is_not_found() => Ok(None),
    Err(e) => Err(e),
  }
}

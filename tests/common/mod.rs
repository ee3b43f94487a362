#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use licentia::catalog::{LicenseCatalog, LicenseId};
use licentia::processor::{Processor, ProcessorConfig};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Comment markers exercised by the randomized tests.
pub const MARKERS: [&str; 6] = ["//", "#", "--", ";", "%", "!"];

/// Loads the catalog compiled into the binary.
pub fn embedded_catalog() -> Arc<LicenseCatalog> {
  Arc::new(LicenseCatalog::embedded().expect("embedded catalog must load"))
}

/// Builds a processor with two workers over the embedded catalog.
pub fn processor(dry_run: bool) -> Processor {
  Processor::new(ProcessorConfig {
    jobs: Some(2),
    dry_run,
    ..ProcessorConfig::new(embedded_catalog())
  })
  .expect("processor must build")
}

/// Every catalog license that has a per-file header template.
pub fn licenses_with_header(catalog: &LicenseCatalog) -> Vec<LicenseId> {
  LicenseId::ALL
    .into_iter()
    .filter(|id| catalog.header(*id).is_some())
    .collect()
}

/// Writes `content` to `dir/name`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
  let path = dir.join(name);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(path)
}

/// Random source-like content whose first line is never blank or a comment.
pub fn random_source(rng: &mut ChaCha8Rng) -> String {
  let line_count = rng.random_range(1..12);
  let mut content = String::new();

  for i in 0..line_count {
    if i > 0 && rng.random_bool(0.2) {
      content.push('\n');
      continue;
    }
    let indent = " ".repeat(rng.random_range(0..3) * 2);
    content.push_str(&format!(
      "{indent}value_{} = {}\n",
      rng.random_range(0..1000),
      rng.random_range(0..100_000)
    ));
  }

  if rng.random_bool(0.3) {
    content.pop();
  }
  content
}

/// Words that appear in no catalog license.
pub const VOCABULARY: [&str; 24] = [
  "apple", "river", "stone", "cloud", "lantern", "harbor", "meadow", "violin", "pepper", "glacier", "orbit", "thimble",
  "walnut", "quartz", "falcon", "biscuit", "marble", "canyon", "ember", "saddle", "tulip", "kettle", "willow", "comet",
];

/// One line of `min..max` random vocabulary words.
pub fn random_words(rng: &mut ChaCha8Rng, min: usize, max: usize) -> String {
  let count = rng.random_range(min..max);
  (0..count)
    .map(|_| VOCABULARY[rng.random_range(0..VOCABULARY.len())])
    .collect::<Vec<_>>()
    .join(" ")
}

/// Random prose of a few lines, without comment markers.
pub fn random_prose(rng: &mut ChaCha8Rng) -> String {
  let lines = rng.random_range(1..15);
  (0..lines).map(|_| random_words(rng, 3, 12)).collect::<Vec<_>>().join("\n")
}

/// Random source content that often opens with its own comment lines in
/// `marker`, optionally separated from the code by a blank line.
pub fn random_commented_source(rng: &mut ChaCha8Rng, marker: &str) -> String {
  let mut content = String::new();

  if rng.random_bool(0.6) {
    for _ in 0..rng.random_range(1..5) {
      content.push_str(&format!("{marker} {}\n", random_words(rng, 3, 10)));
    }
    if rng.random_bool(0.5) {
      content.push('\n');
    }
  }

  content.push_str(&random_source(rng));
  content
}

/// A random owner name, sometimes with punctuation.
pub fn random_owner(rng: &mut ChaCha8Rng) -> String {
  const NAMES: [&str; 6] = ["Acme Inc", "Jane Doe", "The Authors", "Foo & Bar, LLC", "株式会社", "O'Neil"];
  NAMES[rng.random_range(0..NAMES.len())].to_string()
}

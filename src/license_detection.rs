//! # License Detection Module
//!
//! This module contains the interfaces and implementations for license detection algorithms.
//! It allows for easily replacing the license detection algorithm without modifying the processor.
//!
//! Detection works on the leading comment block of a file: [`leading_comment`]
//! extracts it with comment markers stripped, and a [`LicenseDetector`]
//! classifies that text against the catalog.

use std::sync::LazyLock;

use regex::Regex;
use similar::{Algorithm, capture_diff_slices, get_diff_ratio};
use tracing::trace;

use crate::catalog::{LicenseCatalog, LicenseId};
use crate::processor::split_directive;

/// Default similarity cutoff below which text is classified as unknown.
pub const DEFAULT_THRESHOLD: f32 = 0.80;

/// Default number of leading lines examined for a comment block.
pub const DEFAULT_MAX_LINES: usize = 1000;

/// End-of-line comment markers recognized in a leading comment block.
const LINE_MARKERS: [&str; 8] = ["//", "#", "--", ";", "%", "'", "!", "REM"];

/// Block comment delimiters as `(open, close)` pairs.
const BLOCK_DELIMITERS: [(&str, &str); 5] = [("/*", "*/"), ("(*", "*)"), ("{-", "-}"), ("<!--", "-->"), ("\"\"\"", "\"\"\"")];

/// Lowercased line starts that mark a copyright notice.
const COPYRIGHT_PREFIXES: [&str; 3] = ["copyright", "portions copyright", "(c)"];

static PLACEHOLDER_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"@@[a-z]+@@").expect("placeholder regex must compile"));

static WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("word regex must compile"));

/// Trait for license detectors.
///
/// Implementations of this trait are responsible for determining which
/// catalog license, if any, a piece of comment text is.
pub trait LicenseDetector: Send + Sync {
  /// Classifies comment text with markers already stripped.
  ///
  /// Returns [`LicenseId::Unknown`] when nothing matches well enough.
  fn classify(&self, text: &str) -> LicenseId;

  /// Classifies the leading comment block of whole file content.
  fn detect(&self, content: &str, max_lines: usize) -> LicenseId {
    self.classify(&leading_comment(content, max_lines))
  }
}

/// Extracts the leading comment block of `content`.
///
/// A directive first line (shebang, XML declaration, ...) and leading blank
/// lines are skipped. Collection stops at the first line that is neither a
/// comment nor blank, or after `max_lines` lines. Markers are stripped and
/// each line is trimmed.
pub fn leading_comment(content: &str, max_lines: usize) -> String {
  let (_, body) = split_directive(content);
  let mut lines: Vec<&str> = Vec::new();
  let mut open_block: Option<&str> = None;

  for line in body.lines().take(max_lines) {
    let trimmed = line.trim();

    if let Some(close) = open_block {
      match trimmed.find(close) {
        Some(end) => {
          push_line(&mut lines, strip_block_star(&trimmed[..end]));
          open_block = None;
        }
        None => push_line(&mut lines, strip_block_star(trimmed)),
      }
      continue;
    }

    if trimmed.is_empty() {
      push_line(&mut lines, "");
      continue;
    }

    if let Some((open, close)) = BLOCK_DELIMITERS.iter().find(|(open, _)| trimmed.starts_with(open)) {
      let rest = &trimmed[open.len()..];
      match rest.find(close) {
        Some(end) => push_line(&mut lines, strip_block_star(&rest[..end])),
        None => {
          push_line(&mut lines, strip_block_star(rest));
          open_block = Some(close);
        }
      }
      continue;
    }

    match LINE_MARKERS.iter().find(|marker| trimmed.starts_with(*marker)) {
      Some(marker) => push_line(&mut lines, trimmed[marker.len()..].trim()),
      None => break,
    }
  }

  while lines.last().is_some_and(|line| line.is_empty()) {
    lines.pop();
  }

  lines.join("\n")
}

/// Appends a comment line, dropping blank lines before the first text.
fn push_line<'a>(lines: &mut Vec<&'a str>, line: &'a str) {
  if !line.is_empty() || !lines.is_empty() {
    lines.push(line);
  }
}

fn strip_block_star(line: &str) -> &str {
  let line = line.trim();
  line.strip_prefix('*').map_or(line, str::trim)
}

/// Normalizes license text into comparable word tokens.
///
/// Copyright notice lines and lines carrying a template placeholder are
/// dropped, since they differ per project. The rest is lowercased and split
/// on non-alphanumeric characters.
pub fn normalize(text: &str) -> Vec<String> {
  let mut words = Vec::new();

  for line in text.lines() {
    let line = line.trim().to_lowercase();
    if is_copyright_notice(&line) || PLACEHOLDER_REGEX.is_match(&line) {
      continue;
    }
    words.extend(WORD_REGEX.find_iter(&line).map(|m| m.as_str().to_string()));
  }

  words
}

fn is_copyright_notice(line: &str) -> bool {
  COPYRIGHT_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) || line.contains('©')
}

struct Reference {
  license: LicenseId,
  words: Vec<String>,
}

/// Classifies text by word-level similarity to every catalog text.
///
/// Each license contributes its header template and its full text as
/// references, so both file headers and whole license files are recognized.
pub struct SimilarityDetector {
  references: Vec<Reference>,
  threshold: f32,
}

impl SimilarityDetector {
  pub fn new(catalog: &LicenseCatalog, threshold: f32) -> Self {
    let mut references = Vec::new();

    for license in catalog.identifiers() {
      let texts = [catalog.header(license), catalog.full_text(license).ok()];
      for text in texts.into_iter().flatten() {
        let words = normalize(text);
        if !words.is_empty() {
          references.push(Reference { license, words });
        }
      }
    }

    Self { references, threshold }
  }

  pub const fn threshold(&self) -> f32 {
    self.threshold
  }

  /// Best-scoring license and its similarity, before the threshold applies.
  ///
  /// The text is split into blank-line separated paragraphs and every
  /// leading run of paragraphs is scored, longest first. A header followed by
  /// the file's own doc comment therefore still matches on the header
  /// paragraphs alone.
  pub fn best_match(&self, text: &str) -> Option<(LicenseId, f32)> {
    let mut words: Vec<String> = Vec::new();
    let mut prefix_ends = Vec::new();
    for paragraph in paragraphs(text) {
      let added = normalize(&paragraph);
      if added.is_empty() {
        continue;
      }
      words.extend(added);
      prefix_ends.push(words.len());
    }

    let mut best: Option<(LicenseId, f32)> = None;
    for &end in prefix_ends.iter().rev() {
      let prefix = &words[..end];
      for reference in &self.references {
        let floor = best.map_or(0.0, |(_, score)| score);
        let total = (prefix.len() + reference.words.len()) as f32;
        let bound = 2.0 * prefix.len().min(reference.words.len()) as f32 / total;
        if bound <= floor || bound < self.threshold {
          continue;
        }

        let ops = capture_diff_slices(Algorithm::Myers, prefix, &reference.words);
        let score = get_diff_ratio(&ops, prefix.len(), reference.words.len());
        trace!("Similarity to {} over {} words: {:.3}", reference.license, prefix.len(), score);

        if score > floor {
          best = Some((reference.license, score));
        }
      }
    }

    best
  }
}

/// Splits text into paragraphs separated by blank lines.
fn paragraphs(text: &str) -> Vec<String> {
  let mut paragraphs = Vec::new();
  let mut current = String::new();

  for line in text.lines() {
    if line.trim().is_empty() {
      if !current.is_empty() {
        paragraphs.push(std::mem::take(&mut current));
      }
      continue;
    }
    current.push_str(line);
    current.push('\n');
  }
  if !current.is_empty() {
    paragraphs.push(current);
  }

  paragraphs
}

impl LicenseDetector for SimilarityDetector {
  fn classify(&self, text: &str) -> LicenseId {
    match self.best_match(text) {
      Some((license, score)) if score >= self.threshold => license,
      _ => LicenseId::Unknown,
    }
  }
}

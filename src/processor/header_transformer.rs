//! # Header Transformer Module
//!
//! This module inserts and removes rendered license headers in file content.
//! It works purely on strings; reading and writing files is handled by
//! [`FileIO`](super::FileIO).
//!
//! Special first lines (shebangs, XML declarations, etc.) stay on top: the
//! header goes directly below them.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::catalog::{LicenseCatalog, LicenseId};
use crate::templates::{CommentStyle, LicenseData, format_with_comment_style, render};

/// First-line prefixes that must stay above the license header.
const DIRECTIVE_PREFIXES: [&str; 8] = [
  "#!",                       // shebang
  "<?xml",                    // XML declaration
  "<!doctype",                // HTML doctype
  "# encoding:",              // Ruby encoding
  "# frozen_string_literal:", // Ruby interpreter instruction
  "<?php",                    // PHP opening tag
  "# escape",                 // Dockerfile directive
  "# syntax",                 // Dockerfile directive
];

/// Source-level declarations that a removed header usually sat on top of.
static DECLARATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(package|module|namespace|library|unit)\b").expect("declaration regex must compile")
});

/// Splits off a directive first line such as a shebang.
///
/// Returns the directive line (including its newline, if any) and the rest
/// of the content. When the content has no directive the first element is
/// empty.
pub fn split_directive(content: &str) -> (&str, &str) {
  let first_line_end = content.find('\n').map_or(content.len(), |i| i + 1);
  let first_line = content[..first_line_end].to_lowercase();

  if DIRECTIVE_PREFIXES.iter().any(|prefix| first_line.starts_with(prefix)) {
    content.split_at(first_line_end)
  } else {
    ("", content)
  }
}

fn bare(line: &str) -> &str {
  line.trim_end_matches(['\n', '\r'])
}

fn is_blank(line: &str) -> bool {
  bare(line).trim().is_empty()
}

/// Inserts and removes catalog license headers.
///
/// Owner and year come in per call so a single transformer can serve every
/// file of a batch.
#[derive(Debug, Clone)]
pub struct HeaderTransformer {
  catalog: Arc<LicenseCatalog>,
}

impl HeaderTransformer {
  pub const fn new(catalog: Arc<LicenseCatalog>) -> Self {
    Self { catalog }
  }

  pub fn catalog(&self) -> &LicenseCatalog {
    &self.catalog
  }

  /// Renders the comment block that [`insert`](Self::insert) would prepend.
  ///
  /// Returns `None` when the license has neither a copyright template nor a
  /// header template.
  pub fn render_block(&self, license: LicenseId, data: &LicenseData, style: &CommentStyle) -> Option<String> {
    let wrap = |template: &str| format_with_comment_style(&render(template, data), style);

    let copyright = self.catalog.copyright(license).map(wrap).filter(|b| !b.is_empty());
    let header = self.catalog.header(license).map(wrap).filter(|b| !b.is_empty());

    match (copyright, header) {
      (Some(copyright), Some(header)) => Some(format!("{copyright}\n{header}")),
      (Some(block), None) | (None, Some(block)) => Some(block),
      (None, None) => None,
    }
  }

  /// Prepends the license's copyright notice and header to `content`.
  ///
  /// The layout is: copyright block, blank line, header block, blank line,
  /// original content. Calling this twice duplicates the header; callers
  /// that need idempotence detect first.
  pub fn insert(&self, content: &str, license: LicenseId, data: &LicenseData, style: &CommentStyle) -> String {
    let Some(block) = self.render_block(license, data, style) else {
      return content.to_string();
    };

    let (directive, rest) = split_directive(content);
    let mut result = String::with_capacity(content.len() + block.len() + 2);

    if !directive.is_empty() {
      result.push_str(directive);
      if !directive.ends_with('\n') {
        result.push('\n');
      }
      result.push('\n');
    }

    result.push_str(&block);
    result.push('\n');
    result.push_str(rest);
    result
  }

  /// Strips a previously inserted header for `license` from `content`.
  ///
  /// Copyright lines (`<marker> Copyright...`) above the header are dropped
  /// whatever owner or year they carry. The header itself must match the
  /// catalog template exactly. Licenses without a header template leave the
  /// content untouched.
  pub fn remove(&self, content: &str, license: LicenseId, style: &CommentStyle) -> String {
    let Some(header) = self.catalog.header(license) else {
      return content.to_string();
    };

    let header_lines: Vec<String> = header.lines().map(|line| style.comment_line(line)).collect();
    if header_lines.is_empty() {
      return content.to_string();
    }

    let (directive, body) = split_directive(content);

    if !directive.is_empty()
      && let Some(after_gap) = body.strip_prefix('\n')
      && let Some(stripped) = strip_header(after_gap, &header_lines, style)
    {
      return format!("{directive}{stripped}");
    }

    match strip_header(body, &header_lines, style) {
      Some(stripped) => format!("{directive}{stripped}"),
      None => content.to_string(),
    }
  }
}

/// Removes copyright lines and the header block from `body`.
///
/// Returns `None` if nothing was removed.
fn strip_header(body: &str, header_lines: &[String], style: &CommentStyle) -> Option<String> {
  let lines: Vec<&str> = body.split_inclusive('\n').collect();
  let mut keep = vec![true; lines.len()];

  let header_at = find_block(&lines, header_lines);
  let zone_end = header_at.unwrap_or_else(|| leading_comment_len(&lines, style));

  let copyright_prefix = style.copyright_prefix();
  let mut last_copyright = None;
  for (i, line) in lines.iter().enumerate().take(zone_end) {
    if bare(line).starts_with(&copyright_prefix) {
      keep[i] = false;
      last_copyright = Some(i);
    }
  }

  // The blank line separating the copyright notice from the header.
  if let Some(i) = last_copyright
    && i + 1 < lines.len()
    && is_blank(lines[i + 1])
  {
    keep[i + 1] = false;
  }

  if let Some(start) = header_at {
    let end = start + header_lines.len();
    keep[start..end].fill(false);
    if end < lines.len() && is_blank(lines[end]) {
      keep[end] = false;
    }
  }

  let last_removed = keep.iter().rposition(|k| !k)?;
  collapse_blank_run_before_declaration(&lines, &mut keep, last_removed + 1);

  Some(
    lines
      .iter()
      .zip(&keep)
      .filter(|(_, keep)| **keep)
      .map(|(line, _)| *line)
      .collect(),
  )
}

/// Index of the first occurrence of `block` as a run of whole lines.
fn find_block(lines: &[&str], block: &[String]) -> Option<usize> {
  if block.len() > lines.len() {
    return None;
  }
  (0..=lines.len() - block.len()).find(|&start| {
    block
      .iter()
      .zip(&lines[start..start + block.len()])
      .all(|(expected, line)| bare(line) == expected)
  })
}

/// Number of leading lines that are comments in `style` or blank.
fn leading_comment_len(lines: &[&str], style: &CommentStyle) -> usize {
  lines
    .iter()
    .take_while(|line| is_blank(line) || bare(line).trim_start().starts_with(style.marker()))
    .count()
}

/// Collapses a run of blank lines starting at `seam` to one blank line when
/// the run is followed by a package/module declaration.
fn collapse_blank_run_before_declaration(lines: &[&str], keep: &mut [bool], seam: usize) {
  let run = lines[seam.min(lines.len())..]
    .iter()
    .take_while(|line| is_blank(line))
    .count();

  if run < 2 {
    return;
  }

  let next = seam + run;
  if next < lines.len() && DECLARATION_REGEX.is_match(bare(lines[next]).trim_start()) {
    keep[seam..next - 1].fill(false);
  }
}

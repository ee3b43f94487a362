//! # Templates Module
//!
//! This module renders catalog templates with owner and year data and wraps
//! the rendered text in end-of-line comments.
//!
//! The module includes:
//! - [`LicenseData`] for providing data to fill in templates
//! - [`CommentStyle`] for the end-of-line comment marker of a file
//! - [`StyleSelector`] for choosing the marker explicitly or per file
//!   extension
//!
//! ## Example
//!
//! ```rust
//! use licentia::templates::{CommentStyle, LicenseData, format_with_comment_style, render};
//!
//! let data = LicenseData::new("Acme Inc", "2025");
//! let rendered = render("Copyright @@year@@ @@owner@@", &data);
//! assert_eq!(rendered, "Copyright 2025 Acme Inc");
//!
//! let block = format_with_comment_style(&rendered, &CommentStyle::new("//"));
//! assert_eq!(block, "// Copyright 2025 Acme Inc\n");
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::Datelike;

/// Placeholder replaced by the copyright owner.
pub const OWNER_PLACEHOLDER: &str = "@@owner@@";

/// Placeholder replaced by the copyright year.
pub const YEAR_PLACEHOLDER: &str = "@@year@@";

/// Data used to fill out a license template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseData {
  /// The copyright owner, e.g. "YourCompany Inc"
  pub owner: String,
  /// The copyright year to use in the license
  pub year: String,
}

impl LicenseData {
  pub fn new(owner: impl Into<String>, year: impl Into<String>) -> Self {
    Self {
      owner: owner.into(),
      year: year.into(),
    }
  }

  /// License data stamped with the current local year.
  pub fn current_year(owner: impl Into<String>) -> Self {
    Self::new(owner, chrono::Local::now().year().to_string())
  }
}

/// Substitutes the owner and year placeholders in a template.
///
/// Identical inputs always render identical bytes, which is what lets
/// removal find a previously inserted header by exact match.
pub fn render(template: &str, data: &LicenseData) -> String {
  template
    .replace(OWNER_PLACEHOLDER, &data.owner)
    .replace(YEAR_PLACEHOLDER, &data.year)
}

/// End-of-line comment marker for a file, such as `//`, `#` or `--`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommentStyle {
  marker: String,
}

impl CommentStyle {
  pub fn new(marker: impl Into<String>) -> Self {
    Self {
      marker: marker.into().trim().to_string(),
    }
  }

  pub fn marker(&self) -> &str {
    &self.marker
  }

  /// Formats one template line as a comment line, without the newline.
  ///
  /// The combined text is trimmed so empty template lines become the bare
  /// marker instead of a marker with trailing whitespace.
  pub fn comment_line(&self, line: &str) -> String {
    format!("{} {}", self.marker, line).trim().to_string()
  }

  /// Prefix that identifies an inserted copyright line.
  pub fn copyright_prefix(&self) -> String {
    format!("{} Copyright", self.marker)
  }
}

impl fmt::Display for CommentStyle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.marker)
  }
}

/// How the comment marker for a file is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSelector {
  /// Use the same marker for every file.
  Explicit(CommentStyle),
  /// Pick the marker from each file's extension.
  ByExtension,
}

impl StyleSelector {
  /// Resolve the comment style for the given file path.
  ///
  /// Returns `None` when the selector is [`StyleSelector::ByExtension`] and
  /// the file type has no end-of-line comment syntax we know of.
  pub fn resolve(&self, path: &Path) -> Option<CommentStyle> {
    match self {
      Self::Explicit(style) => Some(style.clone()),
      Self::ByExtension => comment_style_for_file(path),
    }
  }
}

impl FromStr for StyleSelector {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let marker = s.trim();
    if marker.is_empty() {
      return Err("comment style cannot be empty".to_string());
    }
    if marker.eq_ignore_ascii_case("auto") {
      return Ok(Self::ByExtension);
    }
    Ok(Self::Explicit(CommentStyle::new(marker)))
  }
}

/// Determines the end-of-line comment marker for a file from its extension.
///
/// Only languages with a line comment syntax are mapped. Block-only formats
/// such as HTML or CSS return `None`.
pub fn comment_style_for_file(path: &Path) -> Option<CommentStyle> {
  let file_name = path
    .file_name()
    .and_then(|name| name.to_str())
    .unwrap_or("")
    .to_lowercase();

  let extension = path
    .extension()
    .and_then(|ext| ext.to_str())
    .unwrap_or("")
    .to_lowercase();

  let marker = match extension.as_str() {
    "c" | "h" | "cc" | "cpp" | "cs" | "go" | "hcl" | "hh" | "hpp" | "java" | "js" | "jsx" | "kt" | "kts" | "m"
    | "mjs" | "cjs" | "mm" | "php" | "proto" | "rs" | "scala" | "swift" | "dart" | "groovy" | "ts" | "tsx" | "v"
    | "sv" | "zig" => "//",
    "py" | "sh" | "bash" | "zsh" | "yaml" | "yml" | "rb" | "tcl" | "tf" | "bzl" | "pl" | "pp" | "toml" | "r"
    | "nix" | "ex" | "exs" | "cmake" => "#",
    "el" | "lisp" | "clj" | "scm" | "asm" | "ini" => ";",
    "erl" | "hrl" | "tex" => "%",
    "hs" | "sql" | "lua" | "ada" | "adb" | "ads" => "--",
    "vb" | "bas" => "'",
    "f" | "f90" | "f95" => "!",
    "bat" | "cmd" => "REM",
    _ => {
      if file_name == "cmakelists.txt"
        || file_name == "dockerfile"
        || file_name.ends_with(".dockerfile")
        || file_name == "makefile"
      {
        "#"
      } else {
        return None;
      }
    }
  };

  Some(CommentStyle::new(marker))
}

/// Formats rendered license text with the given comment style.
///
/// Every line of `text` becomes one comment line terminated by a single
/// newline. An empty `text` yields an empty block.
pub fn format_with_comment_style(text: &str, style: &CommentStyle) -> String {
  let mut result = String::with_capacity(text.len() + text.lines().count() * (style.marker().len() + 2));

  for line in text.lines() {
    result.push_str(&style.comment_line(line));
    result.push('\n');
  }

  result
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use super::*;

  #[test]
  fn test_render_replaces_every_placeholder() {
    let data = LicenseData::new("Test", "2025");
    let rendered = render("Copyright @@year@@ @@owner@@\n@@owner@@ again", &data);
    assert_eq!(rendered, "Copyright 2025 Test\nTest again");
  }

  #[test]
  fn test_render_is_reproducible() {
    let data = LicenseData::new("Acme", "1999");
    let template = "Copyright (c) @@year@@, @@owner@@.";
    assert_eq!(render(template, &data), render(template, &data));
  }

  #[test]
  fn test_format_with_line_comment_style() {
    let style = CommentStyle::new("//");
    let formatted = format_with_comment_style("Copyright 2025\n\nAll rights reserved.", &style);

    assert_eq!(formatted, "// Copyright 2025\n//\n// All rights reserved.\n");
  }

  #[test]
  fn test_format_keeps_indentation_inside_comment() {
    let style = CommentStyle::new("#");
    let formatted = format_with_comment_style("See\n\n    http://example.com", &style);

    assert_eq!(formatted, "# See\n#\n#     http://example.com\n");
  }

  #[test]
  fn test_format_empty_text_is_empty() {
    assert_eq!(format_with_comment_style("", &CommentStyle::new("--")), "");
  }

  #[test]
  fn test_comment_style_trims_marker() {
    let style = CommentStyle::new(" -- ");
    assert_eq!(style.marker(), "--");
    assert_eq!(style.copyright_prefix(), "-- Copyright");
  }

  #[test]
  fn test_style_selector_parsing() {
    assert_eq!("auto".parse::<StyleSelector>(), Ok(StyleSelector::ByExtension));
    assert_eq!(
      "#".parse::<StyleSelector>(),
      Ok(StyleSelector::Explicit(CommentStyle::new("#")))
    );
    assert!("  ".parse::<StyleSelector>().is_err());
  }

  #[test]
  fn test_builtin_styles() {
    let marker = |name: &str| comment_style_for_file(Path::new(name)).map(|s| s.marker().to_string());

    assert_eq!(marker("main.rs").as_deref(), Some("//"));
    assert_eq!(marker("script.py").as_deref(), Some("#"));
    assert_eq!(marker("query.sql").as_deref(), Some("--"));
    assert_eq!(marker("Dockerfile").as_deref(), Some("#"));
    assert_eq!(marker("index.html"), None);
    assert_eq!(marker("unknown.xyz"), None);
  }

  #[test]
  fn test_explicit_selector_ignores_extension() {
    let selector = StyleSelector::Explicit(CommentStyle::new(";"));
    assert_eq!(selector.resolve(Path::new("a.py")), Some(CommentStyle::new(";")));
  }
}

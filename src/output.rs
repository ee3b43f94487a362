//! # Output Module
//!
//! This module centralizes all user-facing output for the licentia tool.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! ## Design Goals
//!
//! - **Informative**: Show actionable information without requiring flags
//! - **Scannable**: Use formatting to make output easy to parse visually
//! - **Progressive**: More detail with `-v`, silence with `-q`
//! - **Scriptable**: Keep stdout predictable for piping/automation; errors go
//!   to stderr as `! <error>` lines

use std::path::Path;
use std::time::Duration;

use owo_colors::{OwoColorize, Stream};

use crate::catalog::LicenseId;
use crate::error::BatchError;
use crate::logging::{is_quiet, is_verbose};
use crate::report::{BatchReport, FileAction, FileReport};

/// Symbols used in output
pub mod symbols {
  /// Success
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Header removed
  pub const REMOVED: &str = "\u{2717}"; // ✗
  /// Header replaced
  pub const UPDATED: &str = "\u{21bb}"; // ↻
}

/// Maximum number of files to show in the default output before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Print the initial "Setting license on N files..." message.
pub fn print_start_message(verb: &str, file_count: usize, dry_run: bool) {
  if is_quiet() {
    return;
  }

  let files_word = if file_count == 1 { "file" } else { "files" };
  let suffix = if dry_run { " (dry run)" } else { "" };
  println!("{} {} {}{}...", verb, file_count, files_word, suffix);
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print the files of a batch grouped by the action taken.
///
/// Unchanged files are only listed in verbose mode.
pub fn print_batch_files(batch: &BatchReport, dry_run: bool) {
  if is_quiet() {
    return;
  }

  let added = files_where(batch, |a| matches!(a, FileAction::Added));
  let replaced = files_where(batch, |a| matches!(a, FileAction::Replaced { .. }));
  let removed = files_where(batch, |a| matches!(a, FileAction::Removed));
  let unchanged = files_where(batch, |a| matches!(a, FileAction::Unchanged));

  let (add_verb, replace_verb, remove_verb) = if dry_run {
    ("Would add license to", "Would replace license in", "Would remove license from")
  } else {
    ("Added license to", "Replaced license in", "Removed license from")
  };

  print_file_group(
    &added,
    &symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()).to_string(),
    add_verb,
  );
  print_file_group(
    &replaced,
    &symbols::UPDATED.if_supports_color(Stream::Stdout, |s| s.yellow()).to_string(),
    replace_verb,
  );
  print_file_group(
    &removed,
    &symbols::REMOVED.if_supports_color(Stream::Stdout, |s| s.red()).to_string(),
    remove_verb,
  );

  if is_verbose() {
    print_file_group(&unchanged, "-", "Left unchanged");
  }
}

fn files_where(batch: &BatchReport, wanted: fn(&FileAction) -> bool) -> Vec<&FileReport> {
  batch.reports.iter().filter(|r| wanted(&r.action)).collect()
}

fn print_file_group(files: &[&FileReport], symbol: &str, verb: &str) {
  if files.is_empty() {
    return;
  }

  let count = files.len();
  println!("{} {} {} {}:", symbol, verb, count, if count == 1 { "file" } else { "files" });

  let show_all = is_verbose();
  let limit = if show_all { count } else { DEFAULT_FILE_LIST_LIMIT };

  for file in files.iter().take(limit) {
    let display_path = make_relative_path(&file.path);
    match file.action {
      FileAction::Replaced { from } => println!("  {} (was {})", display_path, from),
      _ => println!("  {}", display_path),
    }
  }

  if !show_all && count > limit {
    let remaining = count - limit;
    println!(
      "  {} ... and {} more (use -v to see all)",
      "".if_supports_color(Stream::Stdout, |s| s.dimmed()),
      remaining
    );
  }
}

/// Print the success message when a batch changed nothing.
pub fn print_nothing_to_do() {
  if is_quiet() {
    return;
  }

  println!(
    "{} All files are already up to date.",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

/// Print the processing summary.
///
/// Format: "Summary: X changed, Y unchanged, Z failed"
/// In verbose mode, also shows timing.
pub fn print_summary(batch: &BatchReport, elapsed: Duration) {
  if is_quiet() {
    return;
  }

  let changed = batch.changed();
  let unchanged = batch.reports.len() - changed;
  let failed = batch.failed();

  let failed_str = if failed > 0 {
    failed.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else {
    failed.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
  };

  let mut summary_line = format!(
    "Summary: {} changed, {} unchanged, {} failed",
    changed.if_supports_color(Stream::Stdout, |s| s.cyan()),
    unchanged.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    failed_str
  );

  if is_verbose() {
    summary_line.push_str(&format!(" ({:.2}s)", elapsed.as_secs_f64()));
  }

  println!("{}", summary_line);
}

/// Print every error of a batch to stderr, one `! <error>` line each.
///
/// Errors are printed even in quiet mode.
pub fn print_errors(errors: &BatchError) {
  for error in errors.errors() {
    print_error(error);
  }
}

/// Print one `! <error>` line to stderr.
pub fn print_error(error: &dyn std::fmt::Display) {
  eprintln!("{} {}", "!".if_supports_color(Stream::Stderr, |s| s.red()), error);
}

/// Print the catalog identifiers, one `* <id>` line each.
pub fn print_license_list(ids: &[LicenseId]) {
  for id in ids {
    println!("* {}", id);
  }
}

/// Make a path relative to the current directory for display.
fn make_relative_path(path: &Path) -> String {
  if path.is_absolute()
    && let Ok(current_dir) = std::env::current_dir()
    && let Some(relative) = pathdiff::diff_paths(path, &current_dir)
  {
    return relative.to_string_lossy().to_string();
  }
  path.to_string_lossy().to_string()
}

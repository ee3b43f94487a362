//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing with one subcommand per operation:
//! `set`, `unset`, `detect`, `dump` and `list`.

mod commands;

use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Args, Parser, Subcommand};
pub use commands::run;

use crate::logging::ColorMode;
use crate::report::DetectFormat;
use crate::templates::StyleSelector;

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Put an Apache 2.0 header on every Go file
  licentia set apache2 \"Acme Inc\" // \"src/**/*.go\"

  # Swap whatever license a file carries for MPL 2.0, previewing first
  licentia set mpl2 \"Acme Inc\" '#' --replace --dry-run scripts/

  # Pick the comment marker from each file's extension
  licentia set mit \"Acme Inc\" auto src/

  # Remove a GPLv3 header
  licentia unset gpl3 \"Acme Inc\" // main.c

  # Report the license of each file as JSON
  licentia detect --format json src/

  # Print the full MIT license text
  licentia dump mit \"Acme Inc\" > LICENSE
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,

  #[command(flatten)]
  pub global: GlobalArgs,
}

/// Options shared by every subcommand
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, global = true, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    global = true,
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,

  /// Path to config file (default: .licentia.toml in the current directory)
  #[arg(long, global = true, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long, global = true)]
  pub no_config: bool,

  /// Load license texts from this directory instead of the built-in catalog
  #[arg(long, global = true, value_name = "DIR")]
  pub licenses_dir: Option<PathBuf>,

  /// Number of worker threads (default: number of CPUs)
  #[arg(short, long, global = true, value_name = "N", value_parser = clap::value_parser!(usize))]
  pub jobs: Option<usize>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
  /// Put a license header on files
  Set(SetArgs),
  /// Remove a license header from files
  Unset(UnsetArgs),
  /// Report which license each file carries
  Detect(DetectArgs),
  /// Print a full license text with the copyright notice filled in
  Dump(DumpArgs),
  /// List the available license types
  List,
}

/// Arguments for the set command
#[derive(Args, Debug)]
pub struct SetArgs {
  /// License type (see `licentia list`)
  pub license: String,

  /// Copyright owner
  pub owner: String,

  /// End-of-line comment marker such as `//` or `#`; `auto` picks it per file
  /// extension
  #[arg(value_name = "EOL_COMMENT_STYLE")]
  pub style: StyleSelector,

  /// Files, directories (processed recursively) or glob patterns
  #[arg(required = true)]
  pub files: Vec<String>,

  /// Replace a different existing license header instead of failing
  #[arg(long)]
  pub replace: bool,

  /// Copyright year (default: current year)
  #[arg(long)]
  pub year: Option<String>,

  #[command(flatten)]
  pub dry_run: DryRunArgs,
}

/// Arguments for the unset command
#[derive(Args, Debug)]
pub struct UnsetArgs {
  /// License type (see `licentia list`)
  pub license: String,

  /// Copyright owner; copyright lines are removed whatever owner they name
  pub owner: String,

  /// End-of-line comment marker such as `//` or `#`; `auto` picks it per file
  /// extension
  #[arg(value_name = "EOL_COMMENT_STYLE")]
  pub style: StyleSelector,

  /// Files, directories (processed recursively) or glob patterns
  #[arg(required = true)]
  pub files: Vec<String>,

  #[command(flatten)]
  pub dry_run: DryRunArgs,
}

/// Dry run options shared by set and unset
#[derive(Args, Debug, Default)]
pub struct DryRunArgs {
  /// Show a diff of the changes instead of writing files
  #[arg(long)]
  pub dry_run: bool,

  /// Also append the dry run diff to a file
  #[arg(long, value_name = "FILE", requires = "dry_run")]
  pub save_diff: Option<PathBuf>,
}

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
  /// Files, directories (processed recursively) or glob patterns
  #[arg(required = true)]
  pub files: Vec<String>,

  /// Output format (text, json)
  #[arg(long, default_value_t = DetectFormat::Text)]
  pub format: DetectFormat,
}

/// Arguments for the dump command
#[derive(Args, Debug)]
pub struct DumpArgs {
  /// License type (see `licentia list`)
  pub license: String,

  /// Copyright owner
  pub owner: String,

  /// Copyright year (default: current year)
  #[arg(long)]
  pub year: Option<String>,
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

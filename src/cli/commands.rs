//! # Commands
//!
//! Runs the parsed subcommands. Startup problems (bad config, missing
//! catalog, unknown license type) are returned as errors; per-file failures
//! are printed as `! <error>` lines and turn into a failing exit code.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::debug;

use super::{Cli, Command, DetectArgs, DryRunArgs, DumpArgs, GlobalArgs, SetArgs, UnsetArgs};
use crate::catalog::{DirectoryAssets, LicenseCatalog, LicenseId};
use crate::config::{Config, load_config};
use crate::diff::DiffManager;
use crate::error::{BatchError, Error};
use crate::logging::{init_tracing, set_quiet, set_verbose};
use crate::output::{
  print_batch_files, print_blank_line, print_error, print_errors, print_license_list, print_nothing_to_do,
  print_start_message, print_summary,
};
use crate::processor::{Processor, ProcessorConfig, SetRequest, UnsetRequest};
use crate::report::{BatchReport, render_detections};
use crate::templates::LicenseData;

/// Settings resolved from flags and the config file, shared by subcommands.
struct Session {
  global: GlobalArgs,
  config: Config,
  catalog: Arc<LicenseCatalog>,
}

impl Session {
  fn processor(&self, dry_run: bool) -> Result<Processor> {
    Processor::new(ProcessorConfig {
      jobs: self.global.jobs.or(self.config.jobs),
      dry_run,
      threshold: self.config.threshold(),
      max_lines: self.config.max_lines(),
      ..ProcessorConfig::new(Arc::clone(&self.catalog))
    })
  }

  fn license(&self, name: &str) -> Result<LicenseId> {
    let id = name.parse::<LicenseId>()?;
    if !self.catalog.contains(id) {
      bail!(Error::UnknownLicense(name.to_string()));
    }
    Ok(id)
  }
}

/// Run the parsed command line and return the process exit code.
pub fn run(cli: Cli) -> Result<ExitCode> {
  let global = cli.global;

  // Initialize tracing subscriber for structured logging
  init_tracing(global.quiet, global.verbose);

  // Set verbose mode for output formatting and info_log! macro
  if global.verbose > 0 {
    set_verbose();
  } else if global.quiet {
    set_quiet();
  }
  global.colors.apply();

  let current_dir = std::env::current_dir().context("Failed to get current directory")?;
  let config = load_config(global.config.as_deref(), &current_dir, global.no_config)?;

  let licenses_dir = global.licenses_dir.as_deref().or(config.licenses_dir.as_deref());
  let catalog = Arc::new(load_catalog(licenses_dir)?);

  let session = Session {
    global,
    config,
    catalog,
  };

  match cli.command {
    Command::Set(args) => run_set(&session, args),
    Command::Unset(args) => run_unset(&session, args),
    Command::Detect(args) => run_detect(&session, args),
    Command::Dump(args) => run_dump(&session, &args),
    Command::List => {
      print_license_list(&session.catalog.identifiers());
      Ok(ExitCode::SUCCESS)
    }
  }
}

fn load_catalog(licenses_dir: Option<&Path>) -> Result<LicenseCatalog> {
  match licenses_dir {
    Some(dir) => {
      debug!("Loading license catalog from {}", dir.display());
      LicenseCatalog::load(&DirectoryAssets::new(dir))
        .with_context(|| format!("Failed to load license catalog from {}", dir.display()))
    }
    None => LicenseCatalog::embedded().context("Failed to load the built-in license catalog"),
  }
}

fn license_data(owner: String, year: Option<String>) -> LicenseData {
  match year {
    Some(year) => LicenseData::new(owner, year),
    None => LicenseData::current_year(owner),
  }
}

fn run_set(session: &Session, args: SetArgs) -> Result<ExitCode> {
  let request = SetRequest {
    license: session.license(&args.license)?,
    data: license_data(args.owner, args.year),
    style: args.style,
    replace: args.replace,
  };
  let processor = session.processor(args.dry_run.dry_run)?;

  let collected = processor.collect_files(&args.files);
  print_start_message("Setting license on", collected.files.len(), args.dry_run.dry_run);

  let start_time = Instant::now();
  let mut batch = processor.set(&collected.files, &request);
  batch.errors.extend(collected.errors);
  finish_batch(batch, start_time, &args.dry_run)
}

fn run_unset(session: &Session, args: UnsetArgs) -> Result<ExitCode> {
  let request = UnsetRequest {
    license: session.license(&args.license)?,
    style: args.style,
  };
  debug!("Removing {} headers (owner given: {})", request.license, args.owner);
  let processor = session.processor(args.dry_run.dry_run)?;

  let collected = processor.collect_files(&args.files);
  print_start_message("Removing license from", collected.files.len(), args.dry_run.dry_run);

  let start_time = Instant::now();
  let mut batch = processor.unset(&collected.files, &request);
  batch.errors.extend(collected.errors);
  finish_batch(batch, start_time, &args.dry_run)
}

/// Prints diffs, the per-file listing, the summary and the errors of a batch.
fn finish_batch(batch: BatchReport, start_time: Instant, dry_run: &DryRunArgs) -> Result<ExitCode> {
  let elapsed = start_time.elapsed();

  if dry_run.dry_run {
    let diff_manager = DiffManager::new(true, dry_run.save_diff.clone());
    for diff in batch.reports.iter().filter_map(|r| r.diff.as_deref()) {
      diff_manager.emit(diff)?;
    }
  }

  print_blank_line();
  print_batch_files(&batch, dry_run.dry_run);
  if batch.changed() == 0 && batch.failed() == 0 {
    print_nothing_to_do();
  }

  print_blank_line();
  print_summary(&batch, elapsed);

  Ok(exit_code(&batch.errors))
}

fn run_detect(session: &Session, args: DetectArgs) -> Result<ExitCode> {
  let processor = session.processor(false)?;
  let collected = processor.collect_files(&args.files);
  let results = processor.detect(&collected.files);

  let rendered = render_detections(&results, args.format).context("Failed to render detection results")?;
  print!("{rendered}");
  if !rendered.is_empty() && !rendered.ends_with('\n') {
    println!();
  }

  let mut failed = !collected.errors.is_empty();
  print_errors(&collected.errors);
  for error in results.iter().filter_map(|r| r.error.as_deref()) {
    print_error(&error);
    failed = true;
  }
  Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn run_dump(session: &Session, args: &DumpArgs) -> Result<ExitCode> {
  let license = session.license(&args.license)?;
  let data = license_data(args.owner.clone(), args.year.clone());

  let text = session.catalog.dump(license, &data)?;
  print!("{text}");
  if !text.ends_with('\n') {
    println!();
  }

  Ok(ExitCode::SUCCESS)
}

fn exit_code(errors: &BatchError) -> ExitCode {
  if errors.is_empty() {
    ExitCode::SUCCESS
  } else {
    print_errors(errors);
    ExitCode::FAILURE
  }
}

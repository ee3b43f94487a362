//! # licentia
//!
//! A tool that sets, removes and detects license headers in source files.

use std::process::ExitCode;

use licentia::cli::{Cli, run};

fn main() -> ExitCode {
  let cli = Cli::parse_args();

  match run(cli) {
    Ok(code) => code,
    Err(e) => {
      eprintln!("ERROR: {e:#}");
      ExitCode::FAILURE
    }
  }
}

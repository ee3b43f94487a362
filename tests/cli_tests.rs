mod common;

use std::fs;
use std::path::Path;

use anyhow::Result;
use assert_cmd::Command;
use common::write_file;
use predicates::prelude::*;
use tempfile::tempdir;

/// A licentia command running in `dir` with colors off and no inherited config.
fn licentia(dir: &Path) -> Command {
  let mut cmd = Command::cargo_bin("licentia").expect("licentia binary");
  cmd
    .current_dir(dir)
    .env_remove("LICENTIA_CONFIG")
    .env_remove("RUST_LOG")
    .arg("--colors")
    .arg("never");
  cmd
}

#[test]
fn test_list_prints_every_license() -> Result<()> {
  let dir = tempdir()?;
  licentia(dir.path())
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::starts_with("* apache2\n* cddl\n"))
    .stdout(predicate::str::ends_with("* newbsd\n* unlicense\n"));
  Ok(())
}

#[test]
fn test_dump_renders_owner_and_year() -> Result<()> {
  let dir = tempdir()?;
  licentia(dir.path())
    .args(["dump", "mit", "Acme Inc", "--year", "2020"])
    .assert()
    .success()
    .stdout(predicate::str::starts_with("Copyright (c) 2020 Acme Inc\nMIT License\n"));
  Ok(())
}

#[test]
fn test_unknown_license_is_a_startup_error() -> Result<()> {
  let dir = tempdir()?;
  let file = write_file(dir.path(), "a.rs", "fn a() {}\n")?;

  licentia(dir.path())
    .args(["set", "wtfpl", "Acme", "//"])
    .arg(&file)
    .assert()
    .code(1)
    .stderr(predicate::str::contains("ERROR: unknown license type: wtfpl"));

  assert_eq!(fs::read_to_string(&file)?, "fn a() {}\n");
  Ok(())
}

#[test]
fn test_set_and_unset_round_trip() -> Result<()> {
  let dir = tempdir()?;
  let file = write_file(dir.path(), "src/main.go", "package main\n")?;

  licentia(dir.path())
    .args(["set", "mpl2", "Test", "//", "src"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Setting license on 1 file..."))
    .stdout(predicate::str::contains("Summary: 1 changed, 0 unchanged, 0 failed"));

  let licensed = fs::read_to_string(&file)?;
  assert!(licensed.starts_with("// This Source Code Form is subject to the terms of the Mozilla Public\n"));
  assert!(licensed.ends_with("MPL/2.0/.\n\npackage main\n"));

  licentia(dir.path())
    .args(["set", "mpl2", "Test", "//", "src"])
    .assert()
    .success()
    .stdout(predicate::str::contains("All files are already up to date."));

  licentia(dir.path())
    .args(["unset", "mpl2", "Test", "//", "src/main.go"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Removed license from 1 file:"));

  assert_eq!(fs::read_to_string(&file)?, "package main\n");
  Ok(())
}

#[test]
fn test_missing_files_are_reported_and_others_processed() -> Result<()> {
  let dir = tempdir()?;
  let present = write_file(dir.path(), "present.py", "x = 1\n")?;

  licentia(dir.path())
    .args(["set", "apache2", "Acme", "#", "present.py", "absent.py"])
    .assert()
    .code(1)
    .stdout(predicate::str::contains("1 changed, 0 unchanged, 1 failed"))
    .stderr(predicate::str::contains("! failed to read absent.py"));

  assert!(fs::read_to_string(&present)?.starts_with("# Copyright "));
  Ok(())
}

#[test]
fn test_conflicting_license_requires_replace() -> Result<()> {
  let dir = tempdir()?;
  let file = write_file(dir.path(), "lib.rs", "pub fn f() {}\n")?;

  licentia(dir.path()).args(["set", "gpl3", "Acme", "//", "lib.rs"]).assert().success();

  licentia(dir.path())
    .args(["set", "mit", "Acme", "//", "lib.rs"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("already has a gpl3 license header"));

  licentia(dir.path())
    .args(["set", "mit", "Acme", "//", "lib.rs", "--replace"])
    .assert()
    .success()
    .stdout(predicate::str::contains("(was gpl3)"));

  let content = fs::read_to_string(&file)?;
  assert!(content.contains("Permission is hereby granted"));
  assert!(!content.contains("GNU General Public License"));
  assert!(content.ends_with("\n\npub fn f() {}\n"));
  Ok(())
}

#[test]
fn test_dry_run_prints_diff_and_keeps_file() -> Result<()> {
  let dir = tempdir()?;
  let file = write_file(dir.path(), "tool.sh", "#!/bin/sh\necho hi\n")?;

  licentia(dir.path())
    .args(["set", "mit", "Acme", "#", "tool.sh", "--dry-run", "--save-diff", "changes.diff"])
    .assert()
    .success()
    .stdout(predicate::str::contains("(dry run)"))
    .stderr(predicate::str::contains("+# Copyright (c) "));

  assert_eq!(fs::read_to_string(&file)?, "#!/bin/sh\necho hi\n");
  let saved = fs::read_to_string(dir.path().join("changes.diff"))?;
  assert!(saved.starts_with("Diff for tool.sh:\n #!/bin/sh\n"));
  Ok(())
}

#[test]
fn test_detect_text_and_json() -> Result<()> {
  let dir = tempdir()?;
  write_file(dir.path(), "plain.rs", "fn main() {}\n")?;
  write_file(dir.path(), "licensed.rs", "fn main() {}\n")?;

  licentia(dir.path()).args(["set", "lgpl3", "Acme", "//", "licensed.rs"]).assert().success();

  licentia(dir.path())
    .args(["detect", "licensed.rs", "plain.rs"])
    .assert()
    .success()
    .stdout("licensed.rs: lgpl3\nplain.rs: unknown\n");

  let output = licentia(dir.path())
    .args(["detect", "--format", "json", "licensed.rs", "missing.rs"])
    .output()?;
  assert_eq!(output.status.code(), Some(1));

  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(json[0]["license"], "lgpl3");
  assert_eq!(json[1]["license"], "unknown");
  assert!(json[1]["error"].is_string());
  assert!(String::from_utf8(output.stderr)?.contains("! failed to read missing.rs"));
  Ok(())
}

#[test]
fn test_quiet_mode_only_prints_errors() -> Result<()> {
  let dir = tempdir()?;
  write_file(dir.path(), "a.rs", "fn a() {}\n")?;

  licentia(dir.path())
    .args(["-q", "set", "mit", "Acme", "//", "a.rs"])
    .assert()
    .success()
    .stdout(predicate::str::is_empty());
  Ok(())
}

#[test]
fn test_config_file_selects_licenses_dir() -> Result<()> {
  let dir = tempdir()?;
  write_file(dir.path(), "custom/mit", "Custom MIT for @@owner@@.\n")?;
  write_file(dir.path(), ".licentia.toml", "licenses-dir = \"custom\"\njobs = 2\n")?;

  licentia(dir.path())
    .arg("list")
    .assert()
    .success()
    .stdout("* mit\n");

  licentia(dir.path())
    .args(["dump", "mit", "Zed"])
    .assert()
    .success()
    .stdout("Custom MIT for Zed.\n");

  licentia(dir.path())
    .args(["--no-config", "list"])
    .assert()
    .success()
    .stdout(predicate::str::contains("* apache2"));
  Ok(())
}

#[test]
fn test_invalid_config_is_a_startup_error() -> Result<()> {
  let dir = tempdir()?;
  write_file(dir.path(), ".licentia.toml", "[detect]\nthreshold = 1.5\n")?;

  licentia(dir.path())
    .arg("list")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("ERROR: Failed to load config"))
    .stderr(predicate::str::contains("detect.threshold"));
  Ok(())
}

#[test]
fn test_missing_subcommand_is_a_usage_error() -> Result<()> {
  let dir = tempdir()?;
  licentia(dir.path()).assert().code(2);
  Ok(())
}

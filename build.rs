use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

fn main() {
  embed_license_catalog();
  set_rerun_conditions();
}

fn embed_license_catalog() {
  // Every file under licenses/ is compiled into the binary as a (name, text)
  // pair. The catalog decides later which names are full texts and which are
  // .header/.copyright sub-assets.
  let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("cargo sets CARGO_MANIFEST_DIR"));
  let licenses_dir = manifest_dir.join("licenses");

  let mut names: Vec<String> = fs::read_dir(&licenses_dir)
    .expect("licenses/ directory must exist")
    .filter_map(|entry| entry.ok())
    .filter(|entry| entry.path().is_file())
    .filter_map(|entry| entry.file_name().into_string().ok())
    .collect();
  names.sort();

  let mut generated = String::from("pub static EMBEDDED_LICENSES: &[(&str, &str)] = &[\n");
  for name in &names {
    let path = licenses_dir.join(name).display().to_string();
    let _ = writeln!(generated, "  ({name:?}, include_str!({path:?})),");
  }
  generated.push_str("];\n");

  let out_dir = PathBuf::from(env::var("OUT_DIR").expect("cargo sets OUT_DIR"));
  fs::write(out_dir.join("embedded_licenses.rs"), generated).expect("failed to write embedded license table");
}

fn set_rerun_conditions() {
  println!("cargo:rerun-if-changed=build.rs");
  println!("cargo:rerun-if-changed=licenses");
}

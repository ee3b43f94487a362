//! # licentia
//!
//! A tool that puts license headers on source files, takes them off again and
//! tells which license a file carries.
//!
//! `licentia` ships a catalog of common open-source licenses. Headers are
//! rendered from the catalog with the copyright owner and year filled in and
//! written as end-of-line comments. Existing headers are classified by fuzzy
//! text matching, so running `set` or `unset` twice leaves files as they were
//! after the first run.
//!
//! ## Features
//!
//! * Add, replace and remove license headers over files, directories and globs
//! * Keep shebangs, XML declarations and similar directive lines first
//! * Detect the license of each file, as text or JSON
//! * Dump full license texts and list the catalog
//! * Preview changes as diffs with `--dry-run`
//!
//! ## Usage as a Library
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use licentia::catalog::{LicenseCatalog, LicenseId};
//! use licentia::processor::HeaderTransformer;
//! use licentia::templates::{CommentStyle, LicenseData};
//!
//! fn main() -> anyhow::Result<()> {
//!     let catalog = Arc::new(LicenseCatalog::embedded()?);
//!     let transformer = HeaderTransformer::new(catalog);
//!     let style = CommentStyle::new("#");
//!     let data = LicenseData::new("Acme Inc", "2025");
//!
//!     let source = "#!/usr/bin/env python\nprint('hi')\n";
//!     let licensed = transformer.insert(source, LicenseId::Mit, &data, &style);
//!     assert!(licensed.starts_with("#!/usr/bin/env python\n\n# Copyright (c) 2025 Acme Inc"));
//!
//!     let restored = transformer.remove(&licensed, LicenseId::Mit, &style);
//!     assert_eq!(restored, source);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`catalog`] - The license registry and where its texts come from
//! * [`processor`] - Batch processing of files on a worker pool
//! * [`license_detection`] - Classifying existing headers
//! * [`templates`] - Template rendering and comment styles
//! * [`logging`] - Logging utilities for verbose output
//!
//! [`catalog`]: crate::catalog
//! [`processor`]: crate::processor
//! [`license_detection`]: crate::license_detection
//! [`templates`]: crate::templates
//! [`logging`]: crate::logging

pub mod catalog;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod license_detection;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod templates;

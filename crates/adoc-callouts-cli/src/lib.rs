//! adoc-callouts CLI - Command-line interface library
//!
//! This library provides the CLI functionality for adoc-callouts:
//! - Convert: rewrite callouts as definition lists, bullets or comments
//! - Check: report callout blocks and whether they can be converted
//!
//! # Library Usage
//!
//! ```ignore
//! use adoc_callouts_cli::{convert_paths, load_settings};
//!
//! let settings = load_settings(None)?;
//! let outcomes = convert_paths(&[PathBuf::from("docs")], &settings, true)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Convert every .adoc file under docs/ to definition lists
//! adoc-callouts convert docs/
//!
//! # Preview inline comments without writing
//! adoc-callouts convert --format comments --dry-run 'modules/**/*.adoc'
//!
//! # Report blocks that cannot be converted, for CI
//! adoc-callouts check docs/ --strict --output-format json
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{
    check_command, check_paths, convert_command, convert_paths, expand_paths, load_settings,
};
pub use app::{run_cli, CalloutFormat, FileOutcome, FileReport, OutputFormat};

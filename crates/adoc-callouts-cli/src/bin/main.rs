//! adoc-callouts CLI binary entry point
//!
//! This is a thin wrapper that calls the library's `run_cli()` function.

use adoc_callouts_cli::run_cli;
use anyhow::Result;

fn main() -> Result<()> {
    run_cli()
}

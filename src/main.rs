//! # Composer Manifest Expansion CLI
//!
//! This is the binary entry point for the `expand-composer-json` tool, run by
//! CI jobs before `composer install`.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments and CI environment variables using `clap`.
//! - Running the expansion provided by the `composer_expand` library.
//! - Translating failures into exit codes: `1` with a one-line diagnostic on
//!   stdout for an invalid patches file, `1` with an error on stderr for
//!   anything else.

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}

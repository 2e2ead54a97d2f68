//! # trackledger
//!
//! Command-line tool for trackledger run bundles.
//!
//! ## Usage
//!
//! ```bash
//! # Simulate 10 synthetic events into a bundle
//! trackledger demo run.bundle --events 10 --seed 42 --cutoff 10
//!
//! # Show tables, layouts and attributes of a bundle
//! trackledger info run.bundle
//!
//! # Merge several runs
//! trackledger merge merged.bundle run1.bundle run2.bundle
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}

//! # qms-ice
//!
//! Command-line front end for QMS signal analysis.
//!
//! ## Usage
//!
//! ```bash
//! # Run an analysis described by a TOML file
//! qms-ice run --config qms.toml
//!
//! # Override individual settings
//! qms-ice run data/run_QMS.txt --masses 28.00,44.00 --range 10 25 --no-plots
//!
//! # Show the columns and time span of a QMS export
//! qms-ice inspect data/run_QMS.txt
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}

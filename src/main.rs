//! oceanwatch CLI
//!
//! Command-line interface for the sensor simulation.

use std::process::ExitCode;

use oceanwatch::cli::{run_cli, Args};

fn main() -> ExitCode {
    run_cli(Args::parse())
}

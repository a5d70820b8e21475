//! Command-line interface.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested.
//! The entry point [`run_cli`] takes already-parsed [`Args`].

mod args;
mod commands;
mod output;

pub use args::{Args, Command, SimOptions, DEFAULT_RUN_TICKS, DEFAULT_VERIFY_RUNS};
pub use commands::{load_config, run_cli, simulate, verify_reproducibility};
pub use output::{
    format_config_summary, format_summary, format_update, format_update_json, format_version,
    print_help, print_version, RunSummary,
};

#[cfg(test)]
mod tests;

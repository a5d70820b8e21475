//! CLI command handlers.
//!
//! Each handler turns a parsed [`Command`] into work and an exit code. The
//! simulation itself goes through [`simulate`] so it can be tested without
//! capturing stdout.

use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info};

use super::output::{
    format_config_summary, print_help, print_summary, print_update, print_version, RunSummary,
};
use super::{Args, Command, SimOptions, DEFAULT_RUN_TICKS};
use crate::config::MonitorConfig;
use crate::engine::{EngineUpdate, MonitorEngine, TickDriver, WallTime};
use crate::error::MonitorResult;
use crate::logging::{init_logging, LogConfig};

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    let result = match args.command {
        Command::Run(options) => run_batch(&options),
        Command::Watch(options) => watch(&options),
        Command::Verify { options, runs } => verify(&options, runs),
        Command::CheckConfig { config_path } => check_config(&config_path),
        Command::Dashboard(options) => dashboard(&options),
        Command::Help => {
            print_help();
            Ok(true)
        }
        Command::Version => {
            print_version();
            Ok(true)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Load the configured (or default) config and apply CLI overrides.
///
/// # Errors
///
/// Returns error if the file cannot be read or fails validation.
pub fn load_config(options: &SimOptions) -> MonitorResult<MonitorConfig> {
    let mut config = match &options.config_path {
        Some(path) => MonitorConfig::load(path)?,
        None => MonitorConfig::default(),
    };
    if let Some(seed) = options.seed {
        config.reproducibility.seed = seed;
    }
    Ok(config)
}

fn init_command_logging(config: &MonitorConfig, verbose: bool) {
    if verbose {
        init_logging(&LogConfig {
            format: config.logging.format,
            ..LogConfig::verbose()
        });
    } else {
        init_logging(&config.logging);
    }
}

/// Run `ticks` engine steps on simulation time.
///
/// # Errors
///
/// Returns error if the configuration is invalid.
pub fn simulate(config: MonitorConfig, ticks: u64) -> MonitorResult<(Vec<EngineUpdate>, RunSummary)> {
    let seed = config.seed();
    let initial = config.initial;
    let mut engine = MonitorEngine::new(config)?;
    let updates = engine.run(ticks);
    let summary = RunSummary::from_updates(seed, initial, &updates);
    Ok((updates, summary))
}

fn run_batch(options: &SimOptions) -> MonitorResult<bool> {
    let config = load_config(options)?;
    init_command_logging(&config, options.verbose);

    let ticks = options.ticks.unwrap_or(DEFAULT_RUN_TICKS);
    info!(seed = config.seed(), ticks, "starting batch run");

    let (updates, summary) = simulate(config, ticks)?;
    for update in &updates {
        print_update(update, options.json)?;
    }
    print_summary(&summary, options.json)?;
    Ok(true)
}

fn watch(options: &SimOptions) -> MonitorResult<bool> {
    let config = load_config(options)?;
    init_command_logging(&config, options.verbose);

    let seed = config.seed();
    let initial = config.initial;
    let mut engine = MonitorEngine::new(config)?;
    let mut driver = TickDriver::for_engine(WallTime::new(), &engine);
    let mut summary = RunSummary::from_updates(seed, initial, &[]);

    info!(seed, interval = ?engine.clock().interval(), "watching");

    while options.ticks.map_or(true, |limit| summary.ticks < limit) {
        std::thread::sleep(driver.until_next());
        for update in driver.poll(&mut engine) {
            print_update(&update, options.json)?;
            summary.record(&update);
        }
    }

    print_summary(&summary, options.json)?;
    Ok(true)
}

fn verify(options: &SimOptions, runs: usize) -> MonitorResult<bool> {
    let config = load_config(options)?;
    init_command_logging(&config, options.verbose);
    let ticks = options.ticks.unwrap_or(DEFAULT_RUN_TICKS);

    let identical = verify_reproducibility(&config, ticks, runs)?;
    let sym = if identical { "✓" } else { "✗" };
    println!(
        "{sym} {runs} runs of {ticks} ticks with seed {}: {}",
        config.seed(),
        if identical { "identical" } else { "DIVERGED" }
    );
    Ok(identical)
}

/// Run a config `runs` times and check every update sequence is identical.
///
/// # Errors
///
/// Returns error if the configuration is invalid.
pub fn verify_reproducibility(config: &MonitorConfig, ticks: u64, runs: usize) -> MonitorResult<bool> {
    let (reference, _) = simulate(config.clone(), ticks)?;
    for _ in 1..runs {
        let (updates, _) = simulate(config.clone(), ticks)?;
        if updates != reference {
            return Ok(false);
        }
    }
    Ok(true)
}

fn check_config(path: &Path) -> MonitorResult<bool> {
    println!("Validating: {}\n", path.display());
    let config = MonitorConfig::load(path)?;
    println!("{}", format_config_summary(&config));
    Ok(true)
}

#[cfg(feature = "tui")]
fn dashboard(options: &SimOptions) -> MonitorResult<bool> {
    use crate::dashboard::DashboardTui;

    let config = load_config(options)?;
    // The alternate screen owns the terminal; keep stderr quiet
    init_logging(&LogConfig::quiet());

    let mut engine = MonitorEngine::new(config)?;
    let mut tui = DashboardTui::new(30)?;
    tui.run(&mut engine)?;
    Ok(true)
}

#[cfg(not(feature = "tui"))]
fn dashboard(_options: &SimOptions) -> MonitorResult<bool> {
    eprintln!("The dashboard needs the `tui` feature: cargo run --features tui -- dashboard");
    Ok(false)
}

//! CLI output formatting.
//!
//! Formatting is kept in pure `format_*` functions so it can be tested;
//! the `print_*` wrappers only write to stdout.

use std::fmt::Write as _;

use serde::Serialize;

use crate::config::MonitorConfig;
use crate::engine::{EngineUpdate, SensorReadings, UpdateOrigin};
use crate::error::MonitorResult;

/// Totals for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Seed used.
    pub seed: u64,
    /// Ticks simulated.
    pub ticks: u64,
    /// Overrides applied.
    pub overrides: u64,
    /// Anomaly alerts raised.
    pub anomalies: u64,
    /// Critical-level alerts raised.
    pub criticals: u64,
    /// Readings after the last update.
    pub final_readings: SensorReadings,
}

impl RunSummary {
    /// Tally a sequence of updates.
    #[must_use]
    pub fn from_updates(seed: u64, initial: SensorReadings, updates: &[EngineUpdate]) -> Self {
        let mut summary = Self {
            seed,
            ticks: 0,
            overrides: 0,
            anomalies: 0,
            criticals: 0,
            final_readings: initial,
        };
        for update in updates {
            summary.record(update);
        }
        summary
    }

    /// Add one update to the totals.
    pub fn record(&mut self, update: &EngineUpdate) {
        match update.origin {
            UpdateOrigin::Tick => self.ticks += 1,
            UpdateOrigin::Override => self.overrides += 1,
        }
        for alert in &update.alerts {
            if alert.is_anomaly() {
                self.anomalies += 1;
            } else {
                self.criticals += 1;
            }
        }
        self.final_readings = update.state.readings();
    }
}

/// Version line, with the git revision when the build captured one.
#[must_use]
pub fn format_version() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => {
            let short = hash.get(..7).unwrap_or(hash);
            format!("oceanwatch {version} ({short})")
        }
        _ => format!("oceanwatch {version}"),
    }
}

/// Print version information.
pub fn print_version() {
    println!("{}", format_version());
}

/// Print help message.
pub fn print_help() {
    println!(
        r"oceanwatch - Ocean sensor simulation and anomaly monitor

USAGE:
    oceanwatch <COMMAND> [OPTIONS]

COMMANDS:
    run                         Simulate a fixed number of ticks, as fast as possible
        -c, --config <FILE>     YAML configuration (defaults if omitted)
        -n, --ticks <N>         Number of ticks (default: 20)
        --seed <N>              Override the configured seed
        --json                  Emit one JSON object per update
        -v, --verbose           Debug logging on stderr

    watch                       Simulate in real time, one tick per interval
                                (same options as run; runs until Ctrl-C without --ticks)

    verify                      Run the same configuration repeatedly and compare
        --runs <N>              Number of runs (default: 3)

    check-config <FILE>         Validate a YAML configuration

    dashboard                   Interactive terminal dashboard (feature `tui`)
        -c, --config <FILE>     YAML configuration
        --seed <N>              Override the configured seed

    help                        Show this help message
    version                     Show version information

EXAMPLES:
    oceanwatch run --ticks 100 --seed 7
    oceanwatch run -c configs/default.yaml --json
    oceanwatch verify -c configs/default.yaml --runs 5
    oceanwatch check-config configs/default.yaml
"
    );
}

/// One-line rendering of an update, followed by one line per alert.
#[must_use]
pub fn format_update(update: &EngineUpdate) -> String {
    let r = update.state.readings();
    let origin = match update.origin {
        UpdateOrigin::Tick => "tick",
        UpdateOrigin::Override => "override",
    };

    let mut out = format!(
        "[{origin} {:>4} @ {}] temperature {:>5.1}°C  oxygen {:>5.1}%  salinity {:>5.1} PSU  pH {:.1}",
        update.tick, update.time, r.temperature, r.oxygen, r.salinity, r.ph
    );
    for alert in &update.alerts {
        let _ = write!(out, "\n    ! {alert}");
    }
    out
}

/// JSON rendering of an update.
///
/// # Errors
///
/// Returns error if serialization fails.
pub fn format_update_json(update: &EngineUpdate) -> MonitorResult<String> {
    Ok(serde_json::to_string(update)?)
}

/// Print an update as text or JSON.
///
/// # Errors
///
/// Returns error if JSON serialization fails.
pub fn print_update(update: &EngineUpdate, json: bool) -> MonitorResult<()> {
    if json {
        println!("{}", format_update_json(update)?);
    } else {
        println!("{}", format_update(update));
    }
    Ok(())
}

/// Run summary block.
#[must_use]
pub fn format_summary(summary: &RunSummary) -> String {
    let r = &summary.final_readings;
    format!(
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\
         Seed:       {}\n\
         Ticks:      {}\n\
         Overrides:  {}\n\
         Anomalies:  {}\n\
         Criticals:  {}\n\
         Final:      {:.1}°C  {:.1}%  {:.1} PSU  pH {:.1}\n\
         ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━",
        summary.seed,
        summary.ticks,
        summary.overrides,
        summary.anomalies,
        summary.criticals,
        r.temperature,
        r.oxygen,
        r.salinity,
        r.ph
    )
}

/// Print the run summary, as JSON or text.
///
/// # Errors
///
/// Returns error if JSON serialization fails.
pub fn print_summary(summary: &RunSummary, json: bool) -> MonitorResult<()> {
    if json {
        println!("{}", serde_json::to_string(summary)?);
    } else {
        println!("{}", format_summary(summary));
    }
    Ok(())
}

/// Human summary of a validated configuration.
#[must_use]
pub fn format_config_summary(config: &MonitorConfig) -> String {
    let i = &config.initial;
    let w = &config.walk;
    let a = &config.anomaly;
    format!(
        "✓ Configuration valid\n\n\
         Seed:            {}\n\
         Tick interval:   {} ms (catch-up limit {})\n\
         Initial:         {:.1}°C  {:.1}%  {:.1} PSU  pH {:.1}\n\
         Random walk:     spike p={} ±{}  drift ±{}  bounds [{}, {}]\n\
         Anomaly limits:  temperature {}  oxygen {}  salinity {}\n\
         Chart window:    {} samples, notifications {} ms\n\
         Scripted events: {}",
        config.seed(),
        config.timing.tick_interval_ms,
        config.timing.max_catch_up,
        i.temperature,
        i.oxygen,
        i.salinity,
        i.ph,
        w.spike_probability,
        w.spike_half_width,
        w.drift_half_width,
        w.lower_bound,
        w.upper_bound,
        a.temperature,
        a.oxygen,
        a.salinity,
        config.dashboard.window,
        config.dashboard.notification_ms,
        config.scenario.overrides.len()
    )
}

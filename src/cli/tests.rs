//! CLI module tests.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::io::Write;
use std::path::PathBuf;

use super::args::{Args, Command, SimOptions, DEFAULT_VERIFY_RUNS};
use super::commands::{load_config, simulate, verify_reproducibility};
use super::output::{
    format_config_summary, format_summary, format_update, format_update_json, format_version,
    RunSummary,
};
use crate::config::MonitorConfig;
use crate::engine::{
    EngineUpdate, SensorField, SensorReadings, SensorState, SimTime, UpdateOrigin,
};
use crate::monitor::Alert;

// ============================================================================
// Args parsing tests
// ============================================================================

#[test]
fn test_parse_no_args_shows_help() {
    let args = Args::parse_from(["oceanwatch"]);
    assert_eq!(args.command, Command::Help);
}

#[test]
fn test_parse_help_variants() {
    for flag in ["-h", "--help", "help"] {
        assert_eq!(Args::parse_from(["oceanwatch", flag]).command, Command::Help);
    }
}

#[test]
fn test_parse_version_variants() {
    for flag in ["-V", "--version", "version"] {
        assert_eq!(
            Args::parse_from(["oceanwatch", flag]).command,
            Command::Version
        );
    }
}

#[test]
fn test_parse_unknown_command() {
    let args = Args::parse_from(["oceanwatch", "swim"]);
    assert_eq!(args.command, Command::Help);
}

#[test]
fn test_parse_run_defaults() {
    let args = Args::parse_from(["oceanwatch", "run"]);
    assert_eq!(args.command, Command::Run(SimOptions::default()));
}

#[test]
fn test_parse_run_all_options() {
    let args = Args::parse_from([
        "oceanwatch",
        "run",
        "--config",
        "ocean.yaml",
        "--ticks",
        "100",
        "--seed",
        "7",
        "--json",
        "-v",
    ]);
    assert_eq!(
        args.command,
        Command::Run(SimOptions {
            config_path: Some(PathBuf::from("ocean.yaml")),
            seed: Some(7),
            ticks: Some(100),
            json: true,
            verbose: true,
        })
    );
}

#[test]
fn test_parse_short_flags() {
    let args = Args::parse_from(["oceanwatch", "watch", "-c", "a.yaml", "-n", "3"]);
    match args.command {
        Command::Watch(options) => {
            assert_eq!(options.config_path, Some(PathBuf::from("a.yaml")));
            assert_eq!(options.ticks, Some(3));
        }
        other => panic!("expected watch, got {other:?}"),
    }
}

#[test]
fn test_parse_bad_values_show_help() {
    assert_eq!(
        Args::parse_from(["oceanwatch", "run", "--seed"]).command,
        Command::Help
    );
    assert_eq!(
        Args::parse_from(["oceanwatch", "run", "--ticks", "many"]).command,
        Command::Help
    );
    assert_eq!(
        Args::parse_from(["oceanwatch", "run", "--fast"]).command,
        Command::Help
    );
}

#[test]
fn test_parse_verify() {
    let args = Args::parse_from(["oceanwatch", "verify", "--seed", "3"]);
    assert_eq!(
        args.command,
        Command::Verify {
            options: SimOptions {
                seed: Some(3),
                ..SimOptions::default()
            },
            runs: DEFAULT_VERIFY_RUNS,
        }
    );

    let args = Args::parse_from(["oceanwatch", "verify", "--runs", "5", "-n", "10"]);
    match args.command {
        Command::Verify { options, runs } => {
            assert_eq!(runs, 5);
            assert_eq!(options.ticks, Some(10));
        }
        other => panic!("expected verify, got {other:?}"),
    }

    assert_eq!(
        Args::parse_from(["oceanwatch", "verify", "--runs", "1"]).command,
        Command::Help
    );
}

#[test]
fn test_parse_check_config() {
    assert_eq!(
        Args::parse_from(["oceanwatch", "check-config", "ocean.yaml"]).command,
        Command::CheckConfig {
            config_path: PathBuf::from("ocean.yaml")
        }
    );
    assert_eq!(
        Args::parse_from(["oceanwatch", "check-config"]).command,
        Command::Help
    );
}

#[test]
fn test_parse_dashboard() {
    let args = Args::parse_from(["oceanwatch", "dashboard", "--seed", "9"]);
    assert_eq!(
        args.command,
        Command::Dashboard(SimOptions {
            seed: Some(9),
            ..SimOptions::default()
        })
    );
}

// ============================================================================
// Command tests
// ============================================================================

#[test]
fn test_load_config_defaults_and_seed_override() {
    let config = load_config(&SimOptions::default()).unwrap();
    assert_eq!(config, MonitorConfig::default());

    let config = load_config(&SimOptions {
        seed: Some(99),
        ..SimOptions::default()
    })
    .unwrap();
    assert_eq!(config.seed(), 99);
}

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "reproducibility:\n  seed: 5\ntiming:\n  tick_interval_ms: 500").unwrap();

    let config = load_config(&SimOptions {
        config_path: Some(file.path().to_path_buf()),
        ..SimOptions::default()
    })
    .unwrap();
    assert_eq!(config.seed(), 5);
    assert_eq!(config.timing.tick_interval_ms, 500);
}

#[test]
fn test_load_config_missing_file() {
    let result = load_config(&SimOptions {
        config_path: Some(PathBuf::from("/nonexistent/ocean.yaml")),
        ..SimOptions::default()
    });
    assert!(result.is_err());
}

#[test]
fn test_simulate_counts() {
    let config = MonitorConfig::builder().seed(42).build();
    let (updates, summary) = simulate(config, 25).unwrap();

    assert_eq!(updates.len(), 25);
    assert_eq!(summary.ticks, 25);
    assert_eq!(summary.overrides, 0);
    let alerts: usize = updates.iter().map(|u| u.alerts.len()).sum();
    assert_eq!(summary.anomalies + summary.criticals, alerts as u64);
    assert_eq!(summary.final_readings, updates[24].state.readings());
}

#[test]
fn test_simulate_with_scenario() {
    let config = MonitorConfig::builder()
        .seed(1)
        .override_at_tick(3, SensorReadings::new(22.0, 60.0, 40.0, 7.0))
        .build();
    let (updates, summary) = simulate(config, 5).unwrap();
    assert_eq!(updates.len(), 6);
    assert_eq!(summary.overrides, 1);
    assert_eq!(summary.ticks, 5);
}

#[test]
fn test_verify_reproducibility() {
    let config = MonitorConfig::builder().seed(17).build();
    assert!(verify_reproducibility(&config, 50, 3).unwrap());
}

// ============================================================================
// Output tests
// ============================================================================

fn sample_update() -> EngineUpdate {
    EngineUpdate {
        tick: 4,
        time: SimTime::from_secs(4.0),
        origin: UpdateOrigin::Tick,
        state: SensorState::from_readings(SensorReadings::new(3.0, 50.0, 35.0, 7.2)),
        alerts: vec![
            Alert::anomaly(SensorField::Temperature, 7.0),
            Alert::critical(SensorField::Temperature),
        ],
    }
}

#[test]
fn test_format_version() {
    assert!(format_version().starts_with(&format!("oceanwatch {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_format_update_text() {
    let text = format_update(&sample_update());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("[tick    4 @ 4.000s]"));
    assert!(lines[0].contains("3.0°C"));
    assert!(lines[0].contains("pH 7.2"));
    assert_eq!(lines[1], "    ! Anomaly detected in Temperature! Change: 7.0°C");
    assert_eq!(lines[2], "    ! Temperature level critical!");
}

#[test]
fn test_format_update_json() {
    let json = format_update_json(&sample_update()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["tick"], 4);
    assert_eq!(value["origin"], "tick");
    assert_eq!(value["alerts"][1]["kind"], "critical");
}

#[test]
fn test_format_summary() {
    let summary = RunSummary::from_updates(42, SensorReadings::default(), &[sample_update()]);
    assert_eq!(summary.anomalies, 1);
    assert_eq!(summary.criticals, 1);

    let text = format_summary(&summary);
    assert!(text.contains("Seed:       42"));
    assert!(text.contains("Ticks:      1"));
    assert!(text.contains("3.0°C"));
}

#[test]
fn test_summary_without_updates_keeps_initial() {
    let summary = RunSummary::from_updates(1, SensorReadings::default(), &[]);
    assert_eq!(summary.ticks, 0);
    assert_eq!(summary.final_readings, SensorReadings::default());
}

#[test]
fn test_format_config_summary() {
    let text = format_config_summary(&MonitorConfig::default());
    assert!(text.starts_with("✓ Configuration valid"));
    assert!(text.contains("Seed:            42"));
    assert!(text.contains("1000 ms"));
    assert!(text.contains("30 samples"));
}

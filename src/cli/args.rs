//! CLI argument parsing.
//!
//! Hand-rolled parser over any iterator of strings so it can be tested
//! without touching the process environment.

use std::path::PathBuf;

/// Ticks simulated by `run` when `--ticks` is not given.
pub const DEFAULT_RUN_TICKS: u64 = 20;

/// Runs compared by `verify` when `--runs` is not given.
pub const DEFAULT_VERIFY_RUNS: usize = 3;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Options shared by the simulation commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimOptions {
    /// YAML config; built-in defaults when absent.
    pub config_path: Option<PathBuf>,
    /// Seed override.
    pub seed: Option<u64>,
    /// Number of ticks (`watch` runs forever when absent).
    pub ticks: Option<u64>,
    /// Emit JSON lines instead of text.
    pub json: bool,
    /// Debug-level logging.
    pub verbose: bool,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Batch run on simulation time.
    Run(SimOptions),
    /// Real-time run, one tick per interval.
    Watch(SimOptions),
    /// Run the same config several times and compare.
    Verify {
        /// Simulation options.
        options: SimOptions,
        /// Number of runs.
        runs: usize,
    },
    /// Load and validate a config file.
    CheckConfig {
        /// Path to the YAML file.
        config_path: PathBuf,
    },
    /// Interactive terminal dashboard.
    Dashboard(SimOptions),
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// The first item is the program name.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        let Some(name) = args.get(1) else {
            return Self {
                command: Command::Help,
            };
        };

        let rest = &args[2..];
        let command = match name.as_str() {
            "run" => Self::parse_sim_options(rest).map(Command::Run),
            "watch" => Self::parse_sim_options(rest).map(Command::Watch),
            "dashboard" => Self::parse_sim_options(rest).map(Command::Dashboard),
            "verify" => Self::parse_verify_command(rest),
            "check-config" => Self::parse_check_config_command(rest),
            "-h" | "--help" | "help" => Ok(Command::Help),
            "-V" | "--version" | "version" => Ok(Command::Version),
            unknown => Err(format!("Unknown command: {unknown}")),
        };

        let command = command.unwrap_or_else(|message| {
            eprintln!("Error: {message}");
            Command::Help
        });

        Self { command }
    }

    fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
        args.get(i + 1)
            .map(String::as_str)
            .ok_or_else(|| format!("'{flag}' requires a value"))
    }

    fn number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
        let raw = Self::value(args, i, flag)?;
        raw.parse()
            .map_err(|_| format!("'{flag}' expects a number, got '{raw}'"))
    }

    fn parse_sim_options(args: &[String]) -> Result<SimOptions, String> {
        let mut options = SimOptions::default();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "-c" | "--config" => {
                    options.config_path = Some(PathBuf::from(Self::value(args, i, "--config")?));
                    i += 2;
                }
                "--seed" => {
                    options.seed = Some(Self::number(args, i, "--seed")?);
                    i += 2;
                }
                "-n" | "--ticks" => {
                    options.ticks = Some(Self::number(args, i, "--ticks")?);
                    i += 2;
                }
                "--json" => {
                    options.json = true;
                    i += 1;
                }
                "-v" | "--verbose" => {
                    options.verbose = true;
                    i += 1;
                }
                other => return Err(format!("Unknown option: {other}")),
            }
        }

        Ok(options)
    }

    fn parse_verify_command(args: &[String]) -> Result<Command, String> {
        let mut runs = DEFAULT_VERIFY_RUNS;
        let mut sim_args = Vec::with_capacity(args.len());

        let mut i = 0;
        while i < args.len() {
            if args[i] == "--runs" {
                runs = Self::number(args, i, "--runs")?;
                i += 2;
            } else {
                sim_args.push(args[i].clone());
                i += 1;
            }
        }

        if runs < 2 {
            return Err("'--runs' must be at least 2".to_string());
        }

        Ok(Command::Verify {
            options: Self::parse_sim_options(&sim_args)?,
            runs,
        })
    }

    fn parse_check_config_command(args: &[String]) -> Result<Command, String> {
        match args {
            [path] => Ok(Command::CheckConfig {
                config_path: PathBuf::from(path),
            }),
            [] => Err("'check-config' requires a config path".to_string()),
            _ => Err("'check-config' takes exactly one path".to_string()),
        }
    }
}

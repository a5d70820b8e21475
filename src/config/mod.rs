//! Configuration system with YAML schema and validation.
//!
//! Mistake-proofing happens in three layers:
//! - Type-safe configuration structs (unknown keys rejected)
//! - Field constraints via `validator`
//! - Cross-field semantic checks (bounds ordering, finite readings)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use validator::Validate;

use crate::engine::state::SensorReadings;
use crate::error::{MonitorError, MonitorResult};
use crate::logging::LogConfig;
use crate::monitor::{AnomalyThresholds, CriticalLimits, WalkConfig};

/// Top-level monitor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Reproducibility settings.
    #[validate(nested)]
    #[serde(default)]
    pub reproducibility: ReproducibilityConfig,

    /// Tick timing.
    #[validate(nested)]
    #[serde(default)]
    pub timing: TimingConfig,

    /// Readings at startup and after reset.
    #[serde(default)]
    pub initial: SensorReadings,

    /// Random-walk parameters.
    #[validate(nested)]
    #[serde(default)]
    pub walk: WalkConfig,

    /// Anomaly thresholds.
    #[validate(nested)]
    #[serde(default)]
    pub anomaly: AnomalyThresholds,

    /// Critical ranges.
    #[serde(default)]
    pub critical: CriticalLimits,

    /// Presentation settings.
    #[validate(nested)]
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Manual override behaviour.
    #[serde(default)]
    pub overrides: OverrideConfig,

    /// Scripted events.
    #[serde(default)]
    pub scenario: ScenarioConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LogConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl MonitorConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> MonitorResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> MonitorResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> MonitorResult<String> {
        serde_yaml::to_string(self).map_err(|e| MonitorError::serialization(e.to_string()))
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::default()
    }

    /// Run schema and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first failing constraint.
    pub fn check(&self) -> MonitorResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> MonitorResult<()> {
        let walk = &self.walk;
        for (name, value) in [
            ("walk.spike_probability", walk.spike_probability),
            ("walk.spike_half_width", walk.spike_half_width),
            ("walk.drift_half_width", walk.drift_half_width),
            ("walk.lower_bound", walk.lower_bound),
            ("walk.upper_bound", walk.upper_bound),
            ("anomaly.temperature", self.anomaly.temperature),
            ("anomaly.oxygen", self.anomaly.oxygen),
            ("anomaly.salinity", self.anomaly.salinity),
        ] {
            if !value.is_finite() {
                return Err(MonitorError::config(format!("{name} must be finite")));
            }
        }
        if walk.lower_bound >= walk.upper_bound {
            return Err(MonitorError::config(format!(
                "walk.lower_bound ({}) must be below walk.upper_bound ({})",
                walk.lower_bound, walk.upper_bound
            )));
        }

        if !self.initial.is_finite() {
            return Err(MonitorError::config("initial readings must be finite"));
        }

        for field in crate::engine::state::SensorField::ALL {
            if !self.critical.get(field).is_finite() {
                return Err(MonitorError::config(format!(
                    "critical.{}: bounds must be finite",
                    field.key()
                )));
            }
            if !self.critical.get(field).is_consistent() {
                return Err(MonitorError::config(format!(
                    "critical.{}: 'below' must be less than 'above'",
                    field.key()
                )));
            }
        }

        if let Some(bad) = self
            .scenario
            .overrides
            .iter()
            .find(|o| !o.readings.is_finite())
        {
            return Err(MonitorError::config(format!(
                "scenario override at tick {} has non-finite readings",
                bad.at_tick
            )));
        }

        Ok(())
    }

    /// The configured seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.reproducibility.seed
    }

    /// The tick interval.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.timing.tick_interval_ms)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            reproducibility: ReproducibilityConfig::default(),
            timing: TimingConfig::default(),
            initial: SensorReadings::default(),
            walk: WalkConfig::default(),
            anomaly: AnomalyThresholds::default(),
            critical: CriticalLimits::default(),
            dashboard: DashboardConfig::default(),
            overrides: OverrideConfig::default(),
            scenario: ScenarioConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct MonitorConfigBuilder {
    seed: Option<u64>,
    tick_interval_ms: Option<u64>,
    initial: Option<SensorReadings>,
    walk: Option<WalkConfig>,
    spike_half_width: Option<f64>,
    spike_probability: Option<f64>,
    window: Option<usize>,
    rebaseline: Option<bool>,
    scenario: Vec<ScheduledOverride>,
}

impl MonitorConfigBuilder {
    /// Set the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the tick interval in milliseconds.
    #[must_use]
    pub const fn tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval_ms = Some(ms);
        self
    }

    /// Set the initial readings.
    #[must_use]
    pub const fn initial(mut self, readings: SensorReadings) -> Self {
        self.initial = Some(readings);
        self
    }

    /// Replace the whole walk configuration.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // WalkConfig doesn't impl Copy
    pub fn walk(mut self, walk: WalkConfig) -> Self {
        self.walk = Some(walk);
        self
    }

    /// Set the spike half-width.
    #[must_use]
    pub const fn spike_half_width(mut self, half_width: f64) -> Self {
        self.spike_half_width = Some(half_width);
        self
    }

    /// Set the spike probability.
    #[must_use]
    pub const fn spike_probability(mut self, probability: f64) -> Self {
        self.spike_probability = Some(probability);
        self
    }

    /// Set the rolling chart window size.
    #[must_use]
    pub const fn window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }

    /// Rebaseline anomaly detection on manual override.
    #[must_use]
    pub const fn rebaseline_on_override(mut self, rebaseline: bool) -> Self {
        self.rebaseline = Some(rebaseline);
        self
    }

    /// Add a scripted override before the given tick.
    #[must_use]
    pub fn override_at_tick(mut self, at_tick: u64, readings: SensorReadings) -> Self {
        self.scenario.push(ScheduledOverride { at_tick, readings });
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> MonitorConfig {
        let mut config = MonitorConfig::default();

        if let Some(seed) = self.seed {
            config.reproducibility.seed = seed;
        }
        if let Some(ms) = self.tick_interval_ms {
            config.timing.tick_interval_ms = ms;
        }
        if let Some(initial) = self.initial {
            config.initial = initial;
        }
        if let Some(walk) = self.walk {
            config.walk = walk;
        }
        if let Some(w) = self.spike_half_width {
            config.walk.spike_half_width = w;
        }
        if let Some(p) = self.spike_probability {
            config.walk.spike_probability = p;
        }
        if let Some(window) = self.window {
            config.dashboard.window = window;
        }
        if let Some(rebaseline) = self.rebaseline {
            config.overrides.rebaseline = rebaseline;
        }
        config.scenario.overrides = self.scenario;

        config
    }
}

/// Reproducibility settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ReproducibilityConfig {
    /// Seed for the random walk.
    pub seed: u64,
}

impl Default for ReproducibilityConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

/// Tick timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TimingConfig {
    /// Milliseconds between ticks.
    #[validate(range(min = 1, max = 60_000))]
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Most ticks run in one poll after the host fell behind.
    #[validate(range(min = 1))]
    #[serde(default = "default_max_catch_up")]
    pub max_catch_up: u32,
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_max_catch_up() -> u32 {
    5
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            max_catch_up: default_max_catch_up(),
        }
    }
}

/// Presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Samples kept per chart series.
    #[validate(range(min = 1, max = 10_000))]
    #[serde(default = "default_window")]
    pub window: usize,

    /// How long a notification stays visible.
    #[validate(range(min = 1))]
    #[serde(default = "default_notification_ms")]
    pub notification_ms: u64,
}

const fn default_window() -> usize {
    30
}

const fn default_notification_ms() -> u64 {
    3000
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            notification_ms: default_notification_ms(),
        }
    }
}

impl DashboardConfig {
    /// Notification lifetime as a `Duration`.
    #[must_use]
    pub const fn notification_lifetime(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}

/// Manual override behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideConfig {
    /// Also reset the anomaly baseline to the override values.
    ///
    /// Off by default: the next tick's change is measured against the last
    /// simulated reading, so a large manual jump shows up as an anomaly.
    #[serde(default)]
    pub rebaseline: bool,
}

/// Scripted events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Overrides applied just before the given tick runs.
    #[serde(default)]
    pub overrides: Vec<ScheduledOverride>,
}

/// A manual override scheduled before a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledOverride {
    /// Tick number (1-based) before which the override lands.
    pub at_tick: u64,
    /// The replacement readings.
    #[serde(flatten)]
    pub readings: SensorReadings,
}

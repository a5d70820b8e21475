//! Core simulation engine.
//!
//! Implements the sensor update loop with:
//! - Deterministic RNG (PCG, explicitly seeded)
//! - Fixed-interval simulation clock
//! - Deterministic scheduling of scripted overrides
//! - Anomaly and critical-level alerting after every tick
//!
//! The engine owns the single live [`SensorState`]. It has two mutation
//! paths: [`MonitorEngine::tick`] (simulate, then alert) and
//! [`MonitorEngine::apply_override`] (replace, no alerts).

pub mod clock;
pub mod driver;
pub mod rng;
pub mod scheduler;
pub mod state;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use clock::{ManualTime, SimClock, TimeSource, WallTime};
pub use driver::TickDriver;
pub use rng::SimRng;
pub use scheduler::{EventScheduler, ScheduledEvent, SensorEvent};
pub use state::{SensorField, SensorReadings, SensorState};

use crate::config::MonitorConfig;
use crate::error::MonitorResult;
use crate::monitor::{Alert, AlertRules, RandomWalk};

/// Simulation time representation.
///
/// Internal representation is in nanoseconds from simulation start.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct SimTime {
    /// Time in nanoseconds from simulation start.
    nanos: u64,
}

impl SimTime {
    /// Zero time (simulation start).
    pub const ZERO: Self = Self { nanos: 0 };

    /// Create time from seconds.
    ///
    /// # Panics
    ///
    /// Panics if seconds is negative or not finite.
    #[must_use]
    pub fn from_secs(secs: f64) -> Self {
        assert!(secs >= 0.0, "SimTime cannot be negative");
        assert!(secs.is_finite(), "SimTime must be finite");
        let nanos = (secs * 1_000_000_000.0) as u64;
        Self { nanos }
    }

    /// Create time from milliseconds.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            nanos: millis.saturating_mul(1_000_000),
        }
    }

    /// Create time from nanoseconds.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Get time as seconds (f64).
    #[must_use]
    pub fn as_secs_f64(&self) -> f64 {
        self.nanos as f64 / 1_000_000_000.0
    }

    /// Get time as nanoseconds.
    #[must_use]
    pub const fn as_nanos(&self) -> u64 {
        self.nanos
    }

    /// Add duration to time, saturating at the maximum.
    #[must_use]
    pub const fn add_nanos(self, nanos: u64) -> Self {
        Self {
            nanos: self.nanos.saturating_add(nanos),
        }
    }

    /// Subtract duration from time, saturating at zero.
    #[must_use]
    pub const fn saturating_sub_nanos(self, nanos: u64) -> Self {
        Self {
            nanos: self.nanos.saturating_sub(nanos),
        }
    }
}

impl std::ops::Add for SimTime {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.add_nanos(rhs.nanos)
    }
}

impl std::ops::Sub for SimTime {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.saturating_sub_nanos(rhs.nanos)
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

/// Result of advancing the state by one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickOutcome {
    /// The state after the tick (baseline already committed).
    pub state: SensorState,
    /// Alerts raised by this tick, anomalies first.
    pub alerts: Vec<Alert>,
}

/// Advance the readings by one tick and evaluate both alert rules.
///
/// Temperature, oxygen and salinity each take one random-walk step and are
/// clamped. pH is carried over unchanged. Anomalies are measured against
/// the baseline held in `state`. The returned state's baseline is then
/// set to its own new values.
pub fn advance_tick(
    state: &SensorState,
    walk: &RandomWalk,
    rules: &AlertRules,
    rng: &mut SimRng,
) -> TickOutcome {
    let mut next = *state;

    for field in SensorField::ALL {
        let (value, perturbation) = walk.advance(state.get(field), rng);
        if perturbation.is_spike() {
            debug!(
                field = field.key(),
                delta = perturbation.delta(),
                "spike triggered"
            );
        }
        next.set(field, value);
    }

    let alerts = rules.evaluate(&next.readings(), &state.previous_readings());
    next.commit_baseline();

    TickOutcome {
        state: next,
        alerts,
    }
}

/// Where an update came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateOrigin {
    /// The periodic simulation tick.
    Tick,
    /// A manual override (interactive or scripted).
    Override,
}

/// What the presentation layer receives after every state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineUpdate {
    /// Ticks completed when the update was produced.
    pub tick: u64,
    /// Simulation time of the update.
    pub time: SimTime,
    /// Tick or override.
    pub origin: UpdateOrigin,
    /// State after the change.
    pub state: SensorState,
    /// Alerts raised (always empty for overrides).
    pub alerts: Vec<Alert>,
}

impl EngineUpdate {
    /// Whether this update came from a tick.
    #[must_use]
    pub fn is_tick(&self) -> bool {
        self.origin == UpdateOrigin::Tick
    }
}

/// Main simulation engine.
///
/// Coordinates:
/// - The live sensor state
/// - Random walk and alert rules
/// - Clock and seeded RNG
/// - Scheduled overrides
#[derive(Debug)]
pub struct MonitorEngine {
    /// Current sensor state.
    state: SensorState,
    /// Random-walk rule.
    walk: RandomWalk,
    /// Alert rules.
    rules: AlertRules,
    /// Random number generator.
    rng: SimRng,
    /// Simulation clock.
    clock: SimClock,
    /// Pending scripted events.
    scheduler: EventScheduler,
    /// Configuration (initial readings, scenario, override policy).
    config: MonitorConfig,
}

impl MonitorEngine {
    /// Create a new engine from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if configuration validation fails.
    pub fn new(config: MonitorConfig) -> MonitorResult<Self> {
        config.check()?;

        let mut engine = Self {
            state: SensorState::from_readings(config.initial),
            walk: RandomWalk::new(config.walk.clone()),
            rules: AlertRules::new(config.anomaly.clone(), config.critical.clone()),
            rng: SimRng::new(config.seed()),
            clock: SimClock::from_millis(config.timing.tick_interval_ms),
            scheduler: EventScheduler::new(),
            config,
        };
        engine.load_scenario();
        Ok(engine)
    }

    fn load_scenario(&mut self) {
        for o in &self.config.scenario.overrides {
            let at = self.clock.time_of_tick(o.at_tick);
            self.scheduler
                .schedule(at, SensorEvent::ManualOverride(o.readings));
        }
    }

    /// Get current simulation state.
    #[must_use]
    pub const fn state(&self) -> &SensorState {
        &self.state
    }

    /// The current state as an alert-free override update.
    ///
    /// Used to seed a view without advancing the engine.
    #[must_use]
    pub fn snapshot(&self) -> EngineUpdate {
        EngineUpdate {
            tick: self.clock.tick_count(),
            time: self.clock.current_time(),
            origin: UpdateOrigin::Override,
            state: self.state,
            alerts: Vec::new(),
        }
    }

    /// Get the configuration the engine was built from.
    #[must_use]
    pub const fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Get current simulation time.
    #[must_use]
    pub const fn current_time(&self) -> SimTime {
        self.clock.current_time()
    }

    /// Number of ticks completed.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.clock.tick_count()
    }

    /// Simulation clock.
    #[must_use]
    pub const fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Seed of the random walk.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Alert rules in force.
    #[must_use]
    pub const fn rules(&self) -> &AlertRules {
        &self.rules
    }

    /// Number of scripted events still pending.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    /// Run one tick: random walk, clamp, alert rules.
    ///
    /// Scheduled events are not consulted; see [`Self::step`].
    pub fn tick(&mut self) -> EngineUpdate {
        let outcome = advance_tick(&self.state, &self.walk, &self.rules, &mut self.rng);
        let time = self.clock.tick();
        self.state = outcome.state;

        for alert in &outcome.alerts {
            warn!(tick = self.clock.tick_count(), %alert, "sensor alert");
        }

        EngineUpdate {
            tick: self.clock.tick_count(),
            time,
            origin: UpdateOrigin::Tick,
            state: self.state,
            alerts: outcome.alerts,
        }
    }

    /// Apply every scheduled event due by the next tick, then run the tick.
    ///
    /// The returned updates are in the order they happened; the last one
    /// is always the tick.
    pub fn step(&mut self) -> Vec<EngineUpdate> {
        let due = self
            .clock
            .current_time()
            .add_nanos(self.clock.interval_nanos());

        let mut updates = Vec::new();
        while let Some(scheduled) = self.scheduler.next_before(due) {
            match scheduled.event {
                SensorEvent::ManualOverride(readings) => {
                    updates.push(self.override_at(readings, scheduled.time));
                }
            }
        }
        updates.push(self.tick());
        updates
    }

    /// Run `n` steps and collect every update.
    pub fn run(&mut self, n: u64) -> Vec<EngineUpdate> {
        let mut updates = Vec::new();
        for _ in 0..n {
            updates.extend(self.step());
        }
        updates
    }

    /// Replace the live readings now.
    ///
    /// No random walk and no alert evaluation; the input is trusted.
    pub fn apply_override(&mut self, readings: SensorReadings) -> EngineUpdate {
        self.override_at(readings, self.clock.current_time())
    }

    fn override_at(&mut self, readings: SensorReadings, time: SimTime) -> EngineUpdate {
        self.state.replace_readings(readings);
        if self.config.overrides.rebaseline {
            self.state.commit_baseline();
        }

        info!(
            tick = self.clock.tick_count(),
            temperature = readings.temperature,
            oxygen = readings.oxygen,
            salinity = readings.salinity,
            ph = readings.ph,
            "manual override applied"
        );

        EngineUpdate {
            tick: self.clock.tick_count(),
            time,
            origin: UpdateOrigin::Override,
            state: self.state,
            alerts: Vec::new(),
        }
    }

    /// Queue an override for the given simulation time.
    pub fn schedule_override(&mut self, at: SimTime, readings: SensorReadings) {
        self.scheduler
            .schedule(at, SensorEvent::ManualOverride(readings));
    }

    /// Queue an override to land just before the given tick runs.
    pub fn schedule_override_at_tick(&mut self, tick: u64, readings: SensorReadings) {
        let at = self.clock.time_of_tick(tick);
        self.schedule_override(at, readings);
    }

    /// Return to the initial state (same seed = same result).
    pub fn reset(&mut self) {
        let seed = self.rng.seed();
        self.reset_with_seed(seed);
    }

    /// Return to the initial state with a new seed.
    pub fn reset_with_seed(&mut self, seed: u64) {
        self.state = SensorState::from_readings(self.config.initial);
        self.rng.reseed(seed);
        self.clock.reset();
        self.scheduler.clear();
        self.load_scenario();
        debug!(seed, "engine reset");
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Falsification: no tick leaves a simulated field outside [0, 100].
        #[test]
        fn prop_tick_stays_in_bounds(
            seed in 0u64..u64::MAX,
            t in -1e3f64..1e3, o in -1e3f64..1e3, s in -1e3f64..1e3,
            spike_half_width in 0.0f64..100.0,
        ) {
            let walk = RandomWalk::new(crate::monitor::WalkConfig {
                spike_half_width,
                ..Default::default()
            });
            let rules = AlertRules::default();
            let mut rng = SimRng::new(seed);
            let mut state = SensorState::from_readings(SensorReadings::new(t, o, s, 7.2));

            for _ in 0..20 {
                state = advance_tick(&state, &walk, &rules, &mut rng).state;
                for field in SensorField::ALL {
                    prop_assert!((0.0..=100.0).contains(&state.get(field)));
                }
            }
        }

        /// Falsification: pH never changes under ticks.
        #[test]
        fn prop_tick_preserves_ph(seed in 0u64..u64::MAX, ph in -20.0f64..20.0) {
            let walk = RandomWalk::default();
            let rules = AlertRules::default();
            let mut rng = SimRng::new(seed);
            let mut state = SensorState::from_readings(SensorReadings::new(10.0, 50.0, 35.0, ph));

            for _ in 0..20 {
                state = advance_tick(&state, &walk, &rules, &mut rng).state;
                prop_assert_eq!(state.ph.to_bits(), ph.to_bits());
            }
        }
    }
}

//! Simulation clock and time sources.
//!
//! `SimClock` counts ticks on simulation time: every tick advances it by
//! exactly one fixed interval, independent of how late the host ran it.
//! `TimeSource` is the host-provided notion of "now" that decides when
//! ticks fall due. Tests use [`ManualTime`], real hosts use [`WallTime`].

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::engine::SimTime;

/// Simulation clock.
///
/// Manages time progression through the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    /// Current simulation time.
    current: SimTime,
    /// Tick interval in nanoseconds.
    interval_nanos: u64,
    /// Number of ticks taken.
    tick_count: u64,
}

impl SimClock {
    /// Create a clock with the given tick interval in milliseconds.
    #[must_use]
    pub const fn from_millis(interval_ms: u64) -> Self {
        Self::from_nanos(interval_ms * 1_000_000)
    }

    /// Create a clock with the given tick interval in nanoseconds.
    #[must_use]
    pub const fn from_nanos(interval_nanos: u64) -> Self {
        Self {
            current: SimTime::ZERO,
            interval_nanos,
            tick_count: 0,
        }
    }

    /// Get current simulation time.
    #[must_use]
    pub const fn current_time(&self) -> SimTime {
        self.current
    }

    /// Get tick interval in nanoseconds.
    #[must_use]
    pub const fn interval_nanos(&self) -> u64 {
        self.interval_nanos
    }

    /// Get tick interval as a `Duration`.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_nanos(self.interval_nanos)
    }

    /// Get number of ticks taken.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulation time at which the given tick number runs.
    #[must_use]
    pub const fn time_of_tick(&self, tick: u64) -> SimTime {
        SimTime::from_nanos(tick.saturating_mul(self.interval_nanos))
    }

    /// Advance clock by one interval.
    ///
    /// Returns the new time.
    #[allow(clippy::missing_const_for_fn)] // Mutable const not stable
    pub fn tick(&mut self) -> SimTime {
        self.current = self.current.add_nanos(self.interval_nanos);
        self.tick_count += 1;
        self.current
    }

    /// Reset clock to initial state.
    #[allow(clippy::missing_const_for_fn)] // Mutable const not stable
    pub fn reset(&mut self) {
        self.current = SimTime::ZERO;
        self.tick_count = 0;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        // Dashboard refresh: one tick per second
        Self::from_millis(1000)
    }
}

/// Host-provided source of the current time.
pub trait TimeSource {
    /// Time elapsed since the source started.
    fn now(&self) -> SimTime;
}

/// Manually advanced time, for deterministic tests and batch runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualTime {
    now: SimTime,
}

impl ManualTime {
    /// Start at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { now: SimTime::ZERO }
    }

    /// Move time forward.
    #[allow(clippy::missing_const_for_fn)] // Mutable const not stable
    pub fn advance(&mut self, by: Duration) {
        self.now = self.now.add_nanos(duration_nanos(by));
    }

    /// Jump to an absolute time (never moves backwards).
    pub fn set(&mut self, to: SimTime) {
        self.now = self.now.max(to);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> SimTime {
        self.now
    }
}

/// Monotonic wall-clock time measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct WallTime {
    start: Instant,
}

impl WallTime {
    /// Start counting from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for WallTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for WallTime {
    fn now(&self) -> SimTime {
        SimTime::from_nanos(duration_nanos(self.start.elapsed()))
    }
}

fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_creation() {
        let clock = SimClock::from_millis(1000);

        assert_eq!(clock.current_time(), SimTime::ZERO);
        assert_eq!(clock.interval(), Duration::from_secs(1));
        assert_eq!(clock.tick_count(), 0);
    }

    #[test]
    fn test_clock_tick() {
        let mut clock = SimClock::from_millis(1000);

        clock.tick();
        assert_eq!(clock.tick_count(), 1);
        assert!((clock.current_time().as_secs_f64() - 1.0).abs() < 1e-9);

        clock.tick();
        assert_eq!(clock.tick_count(), 2);
        assert!((clock.current_time().as_secs_f64() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_clock_time_of_tick() {
        let clock = SimClock::from_millis(250);
        assert_eq!(clock.time_of_tick(0), SimTime::ZERO);
        assert_eq!(clock.time_of_tick(4), SimTime::from_secs(1.0));
    }

    #[test]
    fn test_clock_reset() {
        let mut clock = SimClock::from_millis(10);
        for _ in 0..100 {
            clock.tick();
        }
        assert!(clock.tick_count() > 0);

        clock.reset();
        assert_eq!(clock.tick_count(), 0);
        assert_eq!(clock.current_time(), SimTime::ZERO);
    }

    #[test]
    fn test_clock_default() {
        let clock = SimClock::default();
        assert_eq!(clock.interval_nanos(), 1_000_000_000);
    }

    #[test]
    fn test_manual_time_advance() {
        let mut time = ManualTime::new();
        assert_eq!(time.now(), SimTime::ZERO);

        time.advance(Duration::from_millis(1500));
        assert_eq!(time.now(), SimTime::from_nanos(1_500_000_000));
    }

    #[test]
    fn test_manual_time_never_rewinds() {
        let mut time = ManualTime::new();
        time.set(SimTime::from_secs(5.0));
        time.set(SimTime::from_secs(2.0));
        assert_eq!(time.now(), SimTime::from_secs(5.0));
    }

    #[test]
    fn test_wall_time_monotonic() {
        let time = WallTime::new();
        let a = time.now();
        let b = time.now();
        assert!(b >= a);
    }
}

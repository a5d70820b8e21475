//! Fixed-cadence tick driver.
//!
//! Hosts call [`TickDriver::poll`] whenever they wake up. The driver works
//! out how many tick intervals have elapsed on its [`TimeSource`] and runs
//! that many engine steps, one after another. A host that fell far behind
//! runs at most `max_catch_up` ticks per poll; the remainder are dropped.

use std::time::Duration;
use tracing::warn;

use super::clock::TimeSource;
use super::{EngineUpdate, MonitorEngine, SimTime};

/// Drives a [`MonitorEngine`] from a time source.
#[derive(Debug)]
pub struct TickDriver<S: TimeSource> {
    source: S,
    next_due: SimTime,
    interval_nanos: u64,
    max_catch_up: u32,
    skipped: u64,
}

impl<S: TimeSource> TickDriver<S> {
    /// Create a driver whose first tick is due one interval from now.
    #[must_use]
    pub fn new(source: S, interval: Duration, max_catch_up: u32) -> Self {
        let interval_nanos = u64::try_from(interval.as_nanos())
            .unwrap_or(u64::MAX)
            .max(1);
        let next_due = source.now().add_nanos(interval_nanos);
        Self {
            source,
            next_due,
            interval_nanos,
            max_catch_up: max_catch_up.max(1),
            skipped: 0,
        }
    }

    /// Create a driver using the engine's configured cadence.
    #[must_use]
    pub fn for_engine(source: S, engine: &MonitorEngine) -> Self {
        let timing = &engine.config().timing;
        Self::new(
            source,
            Duration::from_millis(timing.tick_interval_ms),
            timing.max_catch_up,
        )
    }

    /// Run every tick that has fallen due.
    ///
    /// Ticks never overlap: each one finishes before the next starts.
    pub fn poll(&mut self, engine: &mut MonitorEngine) -> Vec<EngineUpdate> {
        let now = self.source.now();
        let mut updates = Vec::new();
        let mut ran = 0u32;

        while self.next_due <= now && ran < self.max_catch_up {
            updates.extend(engine.step());
            self.next_due = self.next_due.add_nanos(self.interval_nanos);
            ran += 1;
        }

        if self.next_due <= now {
            let behind = (now - self.next_due).as_nanos() / self.interval_nanos + 1;
            self.next_due = self
                .next_due
                .add_nanos(behind.saturating_mul(self.interval_nanos));
            self.skipped += behind;
            warn!(
                skipped = behind,
                max_catch_up = self.max_catch_up,
                "host fell behind, dropping missed ticks"
            );
        }

        updates
    }

    /// Time until the next tick is due (zero if already due).
    #[must_use]
    pub fn until_next(&self) -> Duration {
        let now = self.source.now();
        Duration::from_nanos((self.next_due - now).as_nanos())
    }

    /// Restart the cadence from the source's current time.
    pub fn restart(&mut self) {
        self.next_due = self.source.now().add_nanos(self.interval_nanos);
    }

    /// Total ticks dropped by catch-up limiting.
    #[must_use]
    pub const fn skipped(&self) -> u64 {
        self.skipped
    }

    /// The time source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the time source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::MonitorConfig;
    use crate::engine::clock::ManualTime;

    fn setup(max_catch_up: u32) -> (MonitorEngine, TickDriver<ManualTime>) {
        let engine = MonitorEngine::new(MonitorConfig::builder().seed(42).build()).unwrap();
        let driver = TickDriver::new(ManualTime::new(), Duration::from_secs(1), max_catch_up);
        (engine, driver)
    }

    #[test]
    fn test_no_tick_before_interval() {
        let (mut engine, mut driver) = setup(5);
        driver.source_mut().advance(Duration::from_millis(999));
        assert!(driver.poll(&mut engine).is_empty());
        assert_eq!(driver.until_next(), Duration::from_millis(1));
    }

    #[test]
    fn test_one_tick_per_interval() {
        let (mut engine, mut driver) = setup(5);
        for expected in 1..=5 {
            driver.source_mut().advance(Duration::from_secs(1));
            let updates = driver.poll(&mut engine);
            assert_eq!(updates.len(), 1);
            assert_eq!(updates[0].tick, expected);
        }
    }

    #[test]
    fn test_catch_up_runs_sequentially() {
        let (mut engine, mut driver) = setup(5);
        driver.source_mut().advance(Duration::from_millis(3500));
        let updates = driver.poll(&mut engine);
        let ticks: Vec<u64> = updates.iter().map(|u| u.tick).collect();
        assert_eq!(ticks, vec![1, 2, 3]);
        assert_eq!(driver.until_next(), Duration::from_millis(500));
    }

    #[test]
    fn test_catch_up_is_capped() {
        let (mut engine, mut driver) = setup(2);
        driver.source_mut().advance(Duration::from_secs(10));
        let updates = driver.poll(&mut engine);
        assert_eq!(updates.len(), 2);
        assert_eq!(driver.skipped(), 8);
        assert_eq!(engine.tick_count(), 2);

        // Cadence resumes one interval past "now"
        assert_eq!(driver.until_next(), Duration::from_secs(1));
        driver.source_mut().advance(Duration::from_secs(1));
        assert_eq!(driver.poll(&mut engine).len(), 1);
    }

    #[test]
    fn test_for_engine_uses_config() {
        let config = MonitorConfig::builder().tick_interval_ms(250).build();
        let engine = MonitorEngine::new(config).unwrap();
        let driver = TickDriver::for_engine(ManualTime::new(), &engine);
        assert_eq!(driver.until_next(), Duration::from_millis(250));
    }

    #[test]
    fn test_restart() {
        let (mut engine, mut driver) = setup(5);
        driver.source_mut().advance(Duration::from_secs(30));
        driver.restart();
        assert!(driver.poll(&mut engine).is_empty());
        assert_eq!(engine.tick_count(), 0);
    }
}

//! Event scheduler with deterministic ordering.
//!
//! Holds scripted events (manual overrides from a scenario) until the
//! simulation reaches their time. Guarantees:
//! - Events are processed in time order
//! - Ties are broken by insertion order (sequence number)
//! - Reproducible across runs

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::engine::state::SensorReadings;
use crate::engine::SimTime;

/// An event injected into the simulation from outside the tick rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SensorEvent {
    /// Replace the live readings without simulating or alerting.
    ManualOverride(SensorReadings),
}

/// A scheduled event with time and sequence number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// Scheduled time.
    pub time: SimTime,
    /// Sequence number for deterministic tie-breaking.
    pub sequence: u64,
    /// The event to execute.
    pub event: SensorEvent,
}

impl ScheduledEvent {
    /// Create a new scheduled event.
    #[must_use]
    pub const fn new(time: SimTime, sequence: u64, event: SensorEvent) -> Self {
        Self {
            time,
            sequence,
            event,
        }
    }
}

// Min-heap ordering: by time, then sequence
impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.sequence == other.sequence
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Priority-ordered event queue.
///
/// # Example
///
/// ```rust
/// use oceanwatch::engine::scheduler::{EventScheduler, SensorEvent};
/// use oceanwatch::engine::state::SensorReadings;
/// use oceanwatch::engine::SimTime;
///
/// let mut scheduler = EventScheduler::new();
/// scheduler.schedule(
///     SimTime::from_secs(5.0),
///     SensorEvent::ManualOverride(SensorReadings::new(22.0, 60.0, 40.0, 7.0)),
/// );
/// assert!(scheduler.next_before(SimTime::from_secs(4.0)).is_none());
/// assert!(scheduler.next_before(SimTime::from_secs(5.0)).is_some());
/// ```
#[derive(Debug, Default)]
pub struct EventScheduler {
    /// Min-heap ordered by (time, sequence).
    queue: BinaryHeap<Reverse<ScheduledEvent>>,
    /// Monotonic sequence counter for tie-breaking.
    sequence: u64,
}

impl EventScheduler {
    /// Create a new event scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an event at the given time.
    pub fn schedule(&mut self, time: SimTime, event: SensorEvent) {
        let seq = self.sequence;
        self.sequence += 1;

        self.queue.push(Reverse(ScheduledEvent::new(time, seq, event)));
    }

    /// Get the next event (removes from queue).
    #[must_use]
    #[allow(clippy::should_implement_trait)] // Not an Iterator, different semantics
    pub fn next(&mut self) -> Option<ScheduledEvent> {
        self.queue.pop().map(|Reverse(e)| e)
    }

    /// Peek at the next event without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&ScheduledEvent> {
        self.queue.peek().map(|Reverse(e)| e)
    }

    /// Get the next event if its time is before or at the given time.
    #[must_use]
    pub fn next_before(&mut self, time: SimTime) -> Option<ScheduledEvent> {
        match self.peek() {
            Some(e) if e.time <= time => self.next(),
            _ => None,
        }
    }

    /// Check if the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Get the number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Clear all pending events.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

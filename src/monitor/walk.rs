//! Bounded random walk with occasional spikes.
//!
//! Each simulated reading moves by a small uniform drift every tick. With a
//! fixed probability the drift is replaced by a much wider spike. The result
//! is clamped to the sensor's valid range.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::engine::rng::SimRng;

/// Random-walk parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct WalkConfig {
    /// Probability that a tick's delta is a spike.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_spike_probability")]
    pub spike_probability: f64,

    /// Spike deltas are drawn from `[-spike_half_width, spike_half_width)`.
    #[validate(range(min = 0.0))]
    #[serde(default = "default_spike_half_width")]
    pub spike_half_width: f64,

    /// Drift deltas are drawn from `[-drift_half_width, drift_half_width)`.
    #[validate(range(min = 0.0))]
    #[serde(default = "default_drift_half_width")]
    pub drift_half_width: f64,

    /// Lowest value a reading may take after a tick.
    #[serde(default)]
    pub lower_bound: f64,

    /// Highest value a reading may take after a tick.
    #[serde(default = "default_upper_bound")]
    pub upper_bound: f64,
}

fn default_spike_probability() -> f64 {
    0.1
}

fn default_spike_half_width() -> f64 {
    10.0
}

fn default_drift_half_width() -> f64 {
    1.0
}

fn default_upper_bound() -> f64 {
    100.0
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            spike_probability: default_spike_probability(),
            spike_half_width: default_spike_half_width(),
            drift_half_width: default_drift_half_width(),
            lower_bound: 0.0,
            upper_bound: default_upper_bound(),
        }
    }
}

/// The delta applied to one reading on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Perturbation {
    /// Small continuous movement.
    Drift(f64),
    /// Rare large excursion.
    Spike(f64),
}

impl Perturbation {
    /// The signed delta.
    #[must_use]
    pub const fn delta(self) -> f64 {
        match self {
            Self::Drift(d) | Self::Spike(d) => d,
        }
    }

    /// Whether this is a spike.
    #[must_use]
    pub const fn is_spike(self) -> bool {
        matches!(self, Self::Spike(_))
    }
}

/// The random-walk rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RandomWalk {
    config: WalkConfig,
}

impl RandomWalk {
    /// Create a walk with the given parameters.
    #[must_use]
    pub const fn new(config: WalkConfig) -> Self {
        Self { config }
    }

    /// Get the parameters.
    #[must_use]
    pub const fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Draw the next perturbation.
    ///
    /// Always takes two draws from `rng`: the spike decision, then the delta.
    pub fn perturbation(&self, rng: &mut SimRng) -> Perturbation {
        if rng.gen_chance(self.config.spike_probability) {
            Perturbation::Spike(rng.gen_symmetric(self.config.spike_half_width))
        } else {
            Perturbation::Drift(rng.gen_symmetric(self.config.drift_half_width))
        }
    }

    /// Clamp a value into the valid range.
    ///
    /// NaN maps to the lower bound. With inverted bounds the upper one wins.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value
            .max(self.config.lower_bound)
            .min(self.config.upper_bound)
    }

    /// Advance one reading by one tick.
    ///
    /// Returns the clamped new value and the perturbation that produced it.
    pub fn advance(&self, value: f64, rng: &mut SimRng) -> (f64, Perturbation) {
        let p = self.perturbation(rng);
        (self.clamp(value + p.delta()), p)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Falsification: no starting value escapes the clamp.
        #[test]
        fn prop_advance_stays_in_bounds(
            seed in 0u64..u64::MAX,
            start in -1e6f64..1e6,
            spike_half_width in 0.0f64..500.0,
        ) {
            let walk = RandomWalk::new(WalkConfig {
                spike_half_width,
                ..WalkConfig::default()
            });
            let mut rng = SimRng::new(seed);
            let mut value = start;
            for _ in 0..50 {
                value = walk.advance(value, &mut rng).0;
                prop_assert!((0.0..=100.0).contains(&value));
            }
        }
    }
}

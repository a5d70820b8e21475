//! Deterministic random number generation.
//!
//! Wraps PCG (Permuted Congruential Generator) so every random draw the
//! simulation makes comes from one explicitly seeded source.
//!
//! # Reproducibility Guarantee
//!
//! Given the same seed, all random number sequences will be
//! bitwise-identical across runs and platforms.

use rand::prelude::*;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

/// Deterministic, reproducible random number generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimRng {
    /// Seed the generator was created from.
    seed: u64,
    /// Number of draws taken so far.
    draws: u64,
    /// Internal PCG state.
    rng: Pcg64,
}

impl SimRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            draws: 0,
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// Get the seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of values drawn since creation or the last reseed.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    /// Restart the sequence from a new seed.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    /// Generate a random f64 in [0, 1).
    pub fn gen_f64(&mut self) -> f64 {
        self.draws += 1;
        self.rng.gen()
    }

    /// Generate a random f64 in `[min, max)`.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn gen_range_f64(&mut self, min: f64, max: f64) -> f64 {
        assert!(min <= max, "Invalid range: min > max");
        min + (max - min) * self.gen_f64()
    }

    /// Generate a value in `[-half_width, half_width)`.
    ///
    /// A negative half-width is treated as its magnitude; a non-finite one
    /// as zero. Always consumes exactly one draw.
    pub fn gen_symmetric(&mut self, half_width: f64) -> f64 {
        let w = if half_width.is_finite() {
            half_width.abs()
        } else {
            0.0
        };
        w.mul_add(2.0 * self.gen_f64(), -w)
    }

    /// Return `true` with the given probability.
    ///
    /// Always consumes exactly one draw, so the sequence position does
    /// not depend on the probability.
    pub fn gen_chance(&mut self, probability: f64) -> bool {
        self.gen_f64() < probability
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Falsification test: reproducibility holds for any seed.
        #[test]
        fn prop_reproducibility(seed in 0u64..u64::MAX) {
            let mut rng1 = SimRng::new(seed);
            let mut rng2 = SimRng::new(seed);

            let seq1: Vec<f64> = (0..100).map(|_| rng1.gen_f64()).collect();
            let seq2: Vec<f64> = (0..100).map(|_| rng2.gen_f64()).collect();

            prop_assert_eq!(seq1, seq2);
        }

        /// Falsification test: values in [0, 1) for any seed.
        #[test]
        fn prop_unit_interval(seed in 0u64..u64::MAX) {
            let mut rng = SimRng::new(seed);

            for _ in 0..100 {
                let v = rng.gen_f64();
                prop_assert!((0.0..1.0).contains(&v), "Value {} not in [0, 1)", v);
            }
        }
    }
}

//! Uniform random-draw sources for the threshold rule.
//!
//! The engine consumes randomness only through [`UniformSource`], a single
//! "uniform in [0,1)" operation. The caller picks the seeding policy:
//! [`SeededUniform::from_entropy`] for production runs,
//! [`SeededUniform::from_seed`] for bit-identical replay.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws in `[0, 1)`.
pub trait UniformSource {
    /// Next draw, uniform in `[0, 1)`. Each call consumes one sample.
    fn next_uniform(&mut self) -> f64;
}

/// [`UniformSource`] backed by [`StdRng`]; deterministic given a seed.
pub struct SeededUniform {
    rng: StdRng,
}

impl SeededUniform {
    /// Build a source with a fixed `seed` (replayable).
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Build a source seeded from OS entropy (non-replayable).
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }
}

impl UniformSource for SeededUniform {
    fn next_uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// [`UniformSource`] that replays a fixed sequence of draws, cycling when
/// exhausted. Intended for tests that script an exact draw sequence.
pub struct ScriptedUniform {
    draws: Vec<f64>,
    next: usize,
}

impl ScriptedUniform {
    /// Build a scripted source from `draws`; each value must lie in `[0, 1)`
    /// and the sequence must be non-empty.
    pub fn new(draws: Vec<f64>) -> Self {
        debug_assert!(!draws.is_empty());
        debug_assert!(draws.iter().all(|d| (0.0..1.0).contains(d)));
        Self { draws, next: 0 }
    }
}

impl UniformSource for ScriptedUniform {
    fn next_uniform(&mut self) -> f64 {
        let d = self.draws[self.next % self.draws.len()];
        self.next += 1;
        d
    }
}

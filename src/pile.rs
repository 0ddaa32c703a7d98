//! Owned-state pile: allocates its buffers and drives itself incrementally.
//!
//! [`Pile`] wraps the slice kernels in `relax` for callers that want growing
//! histories rather than pre-sized buffers, e.g. to run through the transient
//! phase, inspect the crossover, then keep iterating in the recurrent phase.
//! Deterministic given the seed in [`PileParams`].

use crate::engine::{self, EngineError};
use crate::relax;
use crate::rng::SeededUniform;
use crate::thresholds::init_thresholds;

/// Parameters for building a [`Pile`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PileParams {
    /// Number of active sites `L` (at least 1).
    pub size: usize,
    /// Probability that a freshly drawn threshold is 1 (else 2); in `[0, 1]`.
    pub p: f64,
    /// RNG seed (deterministic).
    pub seed: u64,
}

/// A driven Oslo pile owning its heights, thresholds, and histories.
pub struct Pile {
    p: f64,
    src: SeededUniform,
    heights: Vec<u32>,
    thresholds: Vec<u8>,
    height_history: Vec<u32>,
    avalanche_sizes: Vec<u64>,
    crossover_step: Option<usize>,
    grains_dissipated: u64,
    steps_done: usize,
}

impl Pile {
    /// Build an empty pile with freshly drawn thresholds.
    pub fn new(params: PileParams) -> Result<Self, EngineError> {
        if params.size == 0 {
            return Err(EngineError::EmptySystem);
        }
        engine::check_probability(params.p)?;
        let mut src = SeededUniform::from_seed(params.seed);
        let mut thresholds = vec![0u8; params.size];
        init_thresholds(&mut thresholds, params.p, &mut src);
        Ok(Self {
            p: params.p,
            src,
            heights: vec![0; params.size + 1],
            thresholds,
            height_history: Vec::new(),
            avalanche_sizes: Vec::new(),
            crossover_step: None,
            grains_dissipated: 0,
            steps_done: 0,
        })
    }

    /// Drive `n` grains, relaxing after each, appending to the histories.
    pub fn iterate(&mut self, n: usize) {
        for _ in 0..n {
            relax::drive(&mut self.heights);
            let out = relax::relax(&mut self.heights, &mut self.thresholds, self.p, &mut self.src);
            if out.boundary_topples > 0 && self.crossover_step.is_none() {
                self.crossover_step = Some(self.steps_done);
            }
            self.grains_dissipated += out.boundary_topples;
            self.avalanche_sizes.push(out.topples);
            self.height_history.push(self.heights[0]);
            self.steps_done += 1;
        }
    }

    /// Number of active sites `L`.
    pub fn size(&self) -> usize {
        self.thresholds.len()
    }

    /// Total drive steps executed so far.
    pub fn steps_done(&self) -> usize {
        self.steps_done
    }

    /// Current height profile (`L + 1` entries, sink last).
    pub fn heights(&self) -> &[u32] {
        &self.heights
    }

    /// Current per-site thresholds, each in {1, 2}.
    pub fn thresholds(&self) -> &[u8] {
        &self.thresholds
    }

    /// `heights[0]` after each executed step.
    pub fn height_history(&self) -> &[u32] {
        &self.height_history
    }

    /// Avalanche size of each executed step.
    pub fn avalanche_sizes(&self) -> &[u64] {
        &self.avalanche_sizes
    }

    /// First step with a boundary topple, if any yet.
    pub fn crossover_step(&self) -> Option<usize> {
        self.crossover_step
    }

    /// Total grains dissipated at the boundary so far.
    pub fn grains_dissipated(&self) -> u64 {
        self.grains_dissipated
    }

    /// Mean slope `h[0] / L` of the current profile.
    pub fn z_mean(&self) -> f64 {
        f64::from(self.heights[0]) / self.size() as f64
    }

    /// Mean-field crossover estimate from the current profile.
    pub fn crossover_theory(&self) -> f64 {
        engine::crossover_theory(self.heights[0], self.size())
    }

    /// Avalanche sizes from the crossover step onward (the recurrent phase);
    /// empty while the pile is still transient.
    pub fn recurrent_sizes(&self) -> &[u64] {
        match self.crossover_step {
            Some(t) => &self.avalanche_sizes[t..],
            None => &[],
        }
    }

    /// Driven-site heights from the crossover step onward; empty while the
    /// pile is still transient.
    pub fn recurrent_heights(&self) -> &[u32] {
        match self.crossover_step {
            Some(t) => &self.height_history[t..],
            None => &[],
        }
    }

    /// Mean driven-site height over the recurrent phase, `None` while the
    /// pile is still transient.
    pub fn mean_recurrent_height(&self) -> Option<f64> {
        let h = self.recurrent_heights();
        if h.is_empty() {
            return None;
        }
        let sum: f64 = h.iter().map(|&v| f64::from(v)).sum();
        Some(sum / h.len() as f64)
    }
}

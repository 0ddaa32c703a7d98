//! Full Oslo run: drive/relax cycles over caller-owned buffers.
//!
//! The caller allocates everything: `heights` (`L + 1` entries, zeroed, with
//! the last entry acting as the boundary sink), `thresholds` (`L` entries,
//! fully overwritten by initialization), and the two per-step record buffers
//! of length `n_steps`. The engine mutates them in place and never allocates.
//! Contract violations are rejected up front with [`EngineError`] before any
//! buffer is touched.

use crate::relax;
use crate::rng::UniformSource;
use crate::thresholds::init_thresholds;

/// Parameters for one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunParams {
    /// Number of drive steps (grains added at the leftmost site).
    pub n_steps: usize,
    /// Probability that a freshly drawn threshold is 1 (else 2); in `[0, 1]`.
    pub p: f64,
}

/// Scalar diagnostics produced by a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunStats {
    /// Index of the first drive step with a boundary topple, latched once;
    /// `None` if no grain reached the boundary within the run.
    pub crossover_step: Option<usize>,
    /// Mean-field crossover estimate `(z_mean / 2) * L^2 * (1 + 1/L)` from
    /// the final profile. A derived diagnostic, unused by the simulation.
    pub crossover_theory: f64,
    /// Total grains dissipated at the boundary over the whole run.
    pub grains_dissipated: u64,
}

/// Errors from violated run contracts.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EngineError {
    /// The pile needs at least one active site.
    #[error("pile must have at least one site")]
    EmptySystem,
    /// Threshold probability outside `[0, 1]` (NaN included).
    #[error("threshold probability {0} outside [0, 1]")]
    ProbabilityOutOfRange(f64),
    /// Height profile length does not equal sites + 1 (the boundary sink).
    #[error("height profile length {0} does not match {1} sites plus boundary")]
    HeightLenMismatch(usize, usize),
    /// A per-step record buffer length does not equal the number of steps.
    #[error("record buffer length {0} does not match {1} drive steps")]
    RecordLenMismatch(usize, usize),
}

pub(crate) fn check_probability(p: f64) -> Result<(), EngineError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(EngineError::ProbabilityOutOfRange(p));
    }
    Ok(())
}

/// Mean-field crossover estimate from the driven-site height `h0` and `sites`.
pub fn crossover_theory(h0: u32, sites: usize) -> f64 {
    let l = sites as f64;
    let z_mean = f64::from(h0) / l;
    (z_mean / 2.0) * l * l * (1.0 + 1.0 / l)
}

/// Run `params.n_steps` drive+relax cycles, recording per-step avalanche
/// sizes and the post-relaxation height of the driven site.
///
/// `thresholds.len()` defines the system size `L`. On success the caller's
/// buffers hold: the steady-state profile and thresholds, `height_history[i]`
/// = `heights[0]` after step `i`, and `avalanche_sizes[i]` = topples in step
/// `i`. The returned [`RunStats`] carry the latched crossover step, the
/// closed-form crossover estimate, and the dissipated-grain total (so the
/// caller can check mass conservation: grains injected = grains in profile +
/// grains dissipated).
pub fn run<U: UniformSource>(
    params: &RunParams,
    heights: &mut [u32],
    thresholds: &mut [u8],
    height_history: &mut [u32],
    avalanche_sizes: &mut [u64],
    src: &mut U,
) -> Result<RunStats, EngineError> {
    let sites = thresholds.len();
    if sites == 0 {
        return Err(EngineError::EmptySystem);
    }
    check_probability(params.p)?;
    if heights.len() != sites + 1 {
        return Err(EngineError::HeightLenMismatch(heights.len(), sites));
    }
    if height_history.len() != params.n_steps {
        return Err(EngineError::RecordLenMismatch(height_history.len(), params.n_steps));
    }
    if avalanche_sizes.len() != params.n_steps {
        return Err(EngineError::RecordLenMismatch(avalanche_sizes.len(), params.n_steps));
    }

    init_thresholds(thresholds, params.p, src);

    let mut crossover_step = None;
    let mut grains_dissipated = 0u64;
    for i in 0..params.n_steps {
        relax::drive(heights);
        let out = relax::relax(heights, thresholds, params.p, src);
        if out.boundary_topples > 0 && crossover_step.is_none() {
            crossover_step = Some(i);
        }
        grains_dissipated += out.boundary_topples;
        avalanche_sizes[i] = out.topples;
        height_history[i] = heights[0];
    }

    Ok(RunStats {
        crossover_step,
        crossover_theory: crossover_theory(heights[0], sites),
        grains_dissipated,
    })
}

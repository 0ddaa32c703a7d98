//! Oslo model avalanche engine.
//!
//! A 1-D pile of discrete grains driven one grain at a time at the left
//! boundary. Each site carries a stochastic slope threshold in {1, 2};
//! sites whose local slope exceeds their threshold topple rightward until
//! the pile is quiescent, and grains falling off the right edge dissipate.
//! The crate records per-step avalanche sizes and driven-site heights,
//! latches the crossover into the recurrent regime, and ships the
//! post-processing (moments, log binning) used to study the avalanche-size
//! distribution. Single-threaded and allocation-free in the kernels;
//! deterministic given a seeded [`rng::UniformSource`].
#![deny(missing_docs)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::dbg_macro, clippy::large_enum_variant)]

pub mod engine;
pub mod pile;
pub mod relax;
pub mod rng;
pub mod stats;
pub mod thresholds;

pub use engine::{run, EngineError, RunParams, RunStats};
pub use pile::{Pile, PileParams};
pub use rng::{ScriptedUniform, SeededUniform, UniformSource};

/// Returns the engine version string from Cargo metadata.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

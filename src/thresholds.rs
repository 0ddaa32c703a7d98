//! Two-state {1, 2} slope-threshold rule.
//!
//! Each site carries a critical slope drawn independently: 1 with probability
//! `p`, else 2. A site's threshold is redrawn every time it topples, which is
//! what makes the Oslo model stochastic rather than a plain BTW sandpile
//! (`p = 0` or `p = 1` recovers the deterministic limits).

use crate::rng::UniformSource;

/// Draw one threshold: sample `r` uniform in `[0, 1)`; 1 if `r < p`, else 2.
pub fn draw_threshold<U: UniformSource>(p: f64, src: &mut U) -> u8 {
    if src.next_uniform() < p {
        1
    } else {
        2
    }
}

/// Overwrite every entry of `thresholds` with a fresh independent draw.
pub fn init_thresholds<U: UniformSource>(thresholds: &mut [u8], p: f64, src: &mut U) {
    for zth in thresholds.iter_mut() {
        *zth = draw_threshold(p, src);
    }
}

//! Deterministic simulation-level RNG.
//!
//! Used for stochastic trip pruning during OD demand adjustment.  The same
//! seed always yields the same adjusted trip table.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Simulation-level RNG for global operations.
///
/// Used only in single-threaded contexts.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset: one per
    /// consumer, so adding a consumer does not disturb the others' streams.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Choose `amount` distinct indices from `0..len` (clamped to `len`),
    /// returned in ascending order.
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        let mut picked = rand::seq::index::sample(&mut self.0, len, amount.min(len)).into_vec();
        picked.sort_unstable();
        picked
    }
}

//! Deterministic, stream-split RNG.
//!
//! # Determinism strategy
//!
//! Each independent consumer (one regression tree, one dataset shuffle) gets
//! its own `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (stream * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive stream numbers across the seed space.  Streams
//! never share state, so results are identical whether trees are trained
//! sequentially or on a thread pool.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded RNG for one logical stream.
pub struct StreamRng(SmallRng);

impl StreamRng {
    /// Seed deterministically from the global seed and a stream number.
    pub fn new(global_seed: u64, stream: u64) -> Self {
        let seed = global_seed ^ stream.wrapping_mul(MIXING_CONSTANT);
        StreamRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform index in `0..n`.
    ///
    /// # Panics
    /// Panics if `n == 0`.
    #[inline]
    pub fn index(&mut self, n: usize) -> usize {
        self.0.gen_range(0..n)
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }
}

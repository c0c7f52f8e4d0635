//! WASM-compatible random number generator for the widgets.
//!
//! Uses the `rand` crate with `SmallRng` (xoshiro256++), which is plenty for
//! novelty picks. Entropy is sourced from `getrandom` (browser crypto API).

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// A seedable RNG shared by the spin engine and the scoring model.
///
/// Seed it for deterministic tests, or create it from system entropy on the page.
pub struct LuckRng {
    inner: SmallRng,
}

impl LuckRng {
    /// Create from system entropy (browser crypto.getRandomValues or OS).
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Create with a specific seed for deterministic behavior.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generate a random usize in [0, max). `max` must be non-zero.
    #[inline(always)]
    pub fn gen_range(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }

    /// Generate a random u32 in [min, max].
    #[inline(always)]
    pub fn gen_inclusive(&mut self, min: u32, max: u32) -> u32 {
        self.inner.random_range(min..=max)
    }

    /// Shuffled copy of `items` (Fisher-Yates).
    pub fn shuffled<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut out = items.to_vec();
        out.shuffle(&mut self.inner);
        out
    }
}

impl Default for LuckRng {
    fn default() -> Self {
        Self::new()
    }
}

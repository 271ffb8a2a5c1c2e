//! Seedable randomness shared by identity rotation and pacing.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Cloneable handle to a seedable random source.
///
/// The lock is only held for a single draw and never across an await point.
#[derive(Clone)]
pub struct Jitter {
    rng: Arc<Mutex<StdRng>>,
}

impl Jitter {
    /// Creates a source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Creates a deterministic source.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Draws an index uniformly from `0..len`. `len` must be non-zero.
    pub fn index(&self, len: usize) -> usize {
        self.with_rng(|rng| rng.gen_range(0..len))
    }

    /// Draws a value uniformly from `min..=max`.
    pub fn between(&self, min: u64, max: u64) -> u64 {
        if min >= max {
            return min;
        }
        self.with_rng(|rng| rng.gen_range(min..=max))
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

impl Default for Jitter {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl std::fmt::Debug for Jitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jitter").finish_non_exhaustive()
    }
}

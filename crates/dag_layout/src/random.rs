use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

/// Source of uniform random numbers for the slot optimizer
pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// Uniform draw in `[0, bound)`, `0` when `bound` is `0`
    fn below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        // Use the high bits, the low bits of an LCG have short periods
        ((self.next_u64() >> 32) % bound as u64) as usize
    }
}

/// Simple LCG PRNG, deterministic for a given seed
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    /// Seeded from the process' hash randomness
    pub fn from_entropy() -> Self {
        let mut hasher = RandomState::new().build_hasher();
        hasher.write_u64(0x9e37_79b9_7f4a_7c15);
        Self::new(hasher.finish())
    }
}

impl Default for SeededRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for SeededRng {
    fn next_u64(&mut self) -> u64 {
        // LCG parameters from Numerical Recipes
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }
}

//! Random number generation for dungeon layouts
//!
//! Uses a seeded ChaCha RNG so a layout can be reproduced from its seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Layout random number generator
///
/// Wraps ChaCha8Rng. Splitting and door placement both draw from the same
/// stream, so a seed fully determines the generated graph.
#[derive(Debug, Clone)]
pub struct DungeonRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl DungeonRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rewind the stream back to the start of the seed
    pub fn reseed(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    /// Uniform integer in `lo..=hi`
    ///
    /// Returns `lo` if the range is empty (`hi < lo`).
    pub fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Uniform integer strictly between `lo` and `hi`
    ///
    /// Returns `None` when no integer lies in the open interval.
    pub fn strictly_between(&mut self, lo: i32, hi: i32) -> Option<i32> {
        if hi - lo < 2 {
            return None;
        }
        Some(self.rng.gen_range(lo + 1..hi))
    }
}

impl Default for DungeonRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_inclusive_bounds() {
        let mut rng = DungeonRng::new(42);
        for _ in 0..1000 {
            let n = rng.range_inclusive(4, 16);
            assert!((4..=16).contains(&n));
        }
    }

    #[test]
    fn test_range_inclusive_hits_both_ends() {
        let mut rng = DungeonRng::new(7);
        let mut seen_lo = false;
        let mut seen_hi = false;
        for _ in 0..500 {
            match rng.range_inclusive(3, 5) {
                3 => seen_lo = true,
                5 => seen_hi = true,
                _ => {}
            }
        }
        assert!(seen_lo && seen_hi);
    }

    #[test]
    fn test_strictly_between() {
        let mut rng = DungeonRng::new(42);
        for _ in 0..1000 {
            let n = rng.strictly_between(1, 9).unwrap();
            assert!(n > 1 && n < 9);
        }
        assert_eq!(rng.strictly_between(3, 4), None);
        assert_eq!(rng.strictly_between(3, 5), Some(4));
    }

    #[test]
    fn test_reproducibility() {
        let mut rng1 = DungeonRng::new(42);
        let mut rng2 = DungeonRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.range_inclusive(0, 100), rng2.range_inclusive(0, 100));
        }
    }

    #[test]
    fn test_reseed_rewinds() {
        let mut rng = DungeonRng::new(99);
        let first: Vec<i32> = (0..10).map(|_| rng.range_inclusive(0, 1000)).collect();
        rng.reseed();
        let second: Vec<i32> = (0..10).map(|_| rng.range_inclusive(0, 1000)).collect();
        assert_eq!(first, second);
        assert_eq!(rng.seed(), 99);
    }

    #[test]
    fn test_empty_range() {
        let mut rng = DungeonRng::new(42);
        assert_eq!(rng.range_inclusive(5, 5), 5);
        assert_eq!(rng.range_inclusive(5, 2), 5);
    }
}

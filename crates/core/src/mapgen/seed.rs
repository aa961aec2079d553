//! Deterministic seed mixing and the explicit random stream threaded through generation.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

/// Random source owned by a single generation call. Nothing in the engine reads
/// process-wide randomness; every decision draws from one of these.
#[derive(Clone, Debug)]
pub struct FloorRng {
    inner: ChaCha8Rng,
}

impl FloorRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform value in `min..=max`.
    pub fn range_inclusive(&mut self, min_value: usize, max_value: usize) -> usize {
        debug_assert!(min_value <= max_value);
        let span = (max_value - min_value) as u64 + 1;
        min_value + (self.next_u64() % span) as usize
    }

    /// Uniform index into a non-empty collection of `len` elements.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }

    pub fn percent(&mut self, chance: u32) -> bool {
        self.next_u64() % 100 < u64::from(chance)
    }
}

pub(crate) fn derive_floor_seed(run_seed: u64, depth: u32, attempt: u32) -> u64 {
    let mut mixed = run_seed ^ 0x9E37_79B9_7F4A_7C15;
    mixed ^= u64::from(depth).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= u64::from(attempt).wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}

/// Independent stream for post-generation consumers (spawners) so they never
/// perturb terrain randomness.
pub(crate) fn derive_spawn_seed(run_seed: u64, depth: u32) -> u64 {
    let mut mixed = derive_floor_seed(run_seed, depth, u32::MAX) ^ 0xD6E8_FD9A_5B89_7A4D;
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_inclusive_stays_inside_requested_bounds() {
        let mut rng = FloorRng::seed_from_u64(12_345);
        for _ in 0..500 {
            let value = rng.range_inclusive(7, 13);
            assert!((7..=13).contains(&value));
        }
        assert_eq!(rng.range_inclusive(4, 4), 4);
    }

    #[test]
    fn percent_extremes_are_absolute() {
        let mut rng = FloorRng::seed_from_u64(5);
        for _ in 0..100 {
            assert!(rng.percent(100));
            assert!(!rng.percent(0));
        }
    }

    #[test]
    fn floor_seed_changes_when_inputs_change() {
        let baseline = derive_floor_seed(99, 2, 0);
        assert_ne!(baseline, derive_floor_seed(98, 2, 0));
        assert_ne!(baseline, derive_floor_seed(99, 3, 0));
        assert_ne!(baseline, derive_floor_seed(99, 2, 1));
        assert_eq!(baseline, derive_floor_seed(99, 2, 0));
        assert_ne!(derive_spawn_seed(99, 2), baseline);
    }

    #[test]
    fn identical_seeds_replay_identical_streams() {
        let mut left = FloorRng::seed_from_u64(77);
        let mut right = FloorRng::seed_from_u64(77);
        for _ in 0..32 {
            assert_eq!(left.next_u64(), right.next_u64());
        }
    }
}

//! Seeded random stream
//!
//! The seed string is hashed to 64 bits (FNV-1a, then a splitmix64 finalizer)
//! and fed to PCG32. Floats come from the top 24 bits of each draw so the
//! whole path is integer arithmetic plus one exact scale.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 2^-24: maps a 24-bit integer onto [0, 1)
const UNIT_SCALE: f32 = 1.0 / 16_777_216.0;

/// Hash a seed string into a 64-bit PCG seed
pub fn hash_seed(seed: &str) -> u64 {
    let mut h = FNV_OFFSET;
    for byte in seed.bytes() {
        h ^= byte as u64;
        h = h.wrapping_mul(FNV_PRIME);
    }
    splitmix64(h)
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Deterministic float stream for one generation
#[derive(Debug, Clone)]
pub struct SeededRng {
    rng: Pcg32,
}

impl SeededRng {
    pub fn new(seed: &str) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(hash_seed(seed)),
        }
    }

    /// Next float in [0, 1)
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        (self.rng.next_u32() >> 8) as f32 * UNIT_SCALE
    }

    /// Uniform float in [lo, hi)
    #[inline]
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// True with probability `p`
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// +1.0 or -1.0 with equal odds
    #[inline]
    pub fn sign(&mut self) -> f32 {
        if self.next_f32() < 0.5 { -1.0 } else { 1.0 }
    }

    /// Uniform integer in [lo, hi] (inclusive)
    pub fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo + 1) as f32;
        lo + ((self.next_f32() * span) as u32).min(hi - lo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = SeededRng::new("AAAA");
        let mut b = SeededRng::new("AAAA");
        for _ in 0..1000 {
            assert_eq!(a.next_f32().to_bits(), b.next_f32().to_bits());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = SeededRng::new("AAAA");
        let mut b = SeededRng::new("AAAB");
        let same = (0..32).filter(|_| a.next_f32() == b.next_f32()).count();
        assert!(same < 4);
    }

    #[test]
    fn test_unit_interval() {
        let mut rng = SeededRng::new("bounds");
        for _ in 0..10_000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_range_u32_inclusive() {
        let mut rng = SeededRng::new("ints");
        let mut seen_lo = false;
        let mut seen_hi = false;
        for _ in 0..2000 {
            let v = rng.range_u32(30, 33);
            assert!((30..=33).contains(&v));
            seen_lo |= v == 30;
            seen_hi |= v == 33;
        }
        assert!(seen_lo && seen_hi);
        assert_eq!(rng.range_u32(7, 7), 7);
    }

    #[test]
    fn test_hash_is_stable() {
        // Pinned so a change to the hash (and every stored seed) is caught
        assert_eq!(hash_seed(""), splitmix64(FNV_OFFSET));
        assert_ne!(hash_seed("a"), hash_seed("b"));
    }
}

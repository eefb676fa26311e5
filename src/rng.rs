// src/rng.rs
//! Pseudo-Random Plumbing for the CPU Target
//!
//! # Design Philosophy
//!
//! Each simulated path owns its own PRNG so that paths stay independent
//! under any thread scheduling:
//! 1. **Reproducibility**: same master seed → bit-identical ensembles
//! 2. **Parallel safety**: no shared RNG state between workers
//! 3. **Statistical quality**: `StdRng` is a cryptographically-strong
//!    generator, comfortably beyond Mersenne-Twister quality
//!
//! # Seed Derivation
//!
//! Per-path seeds are derived from the master seed with a splitmix64-style
//! mix so that consecutive path indices do not produce correlated `StdRng`
//! streams:
//! ```text
//! z = master + index
//! z = (z ⊕ (z >> 30)) * 0xbf58476d1ce4e5b9
//! z = (z ⊕ (z >> 27)) * 0x94d049bb133111eb
//! seed = z ⊕ (z >> 31)
//! ```
//!
//! When no master seed is supplied, one is drawn from OS entropy per
//! launch, matching the original engine's `std::random_device` draw.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Mix a (master seed, path index) pair into a well-spread path seed.
#[inline]
pub fn mix_seed(master: u64, index: u64) -> u64 {
    let mut z = master.wrapping_add(index);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9u64);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111ebu64);
    z ^ (z >> 31)
}

/// Derive one seed per path from an optional master seed.
///
/// `None` draws a fresh master seed from OS entropy, so repeated launches
/// differ; `Some(master)` is fully deterministic.
pub fn path_seeds(master: Option<u64>, iterations: usize) -> Vec<u64> {
    let base = master.unwrap_or_else(rand::random);
    (0..iterations as u64).map(|i| mix_seed(base, i)).collect()
}

/// Seed a per-path generator
pub fn seed_rng_from_u64(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draw a standard normal variate from a path's generator
pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

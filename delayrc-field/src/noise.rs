// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Seeded entropy handle shared by every stochastic term of a run.
//!
//! A single `NoiseSource` is created per run from the experiment seed and is
//! threaded by `&mut` through mask generation, delay-line initialization and
//! every integration step. Draw order is therefore part of the result: the
//! same seed and the same call sequence reproduce the same trajectory.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Seeded pseudo-random stream of standard-normal and uniform samples.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    rng: StdRng,
    seed: u64,
    /// Number of standard-normal samples drawn so far
    normal_draws: u64,
}

impl NoiseSource {
    /// Create a noise source from an explicit seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            normal_draws: 0,
        }
    }

    /// Draw one independent standard-normal sample.
    pub fn standard_normal(&mut self) -> f64 {
        self.normal_draws += 1;
        self.rng.sample(StandardNormal)
    }

    /// Draw one uniform sample in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// The seed this stream was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Total standard-normal samples consumed.
    pub fn normal_draws(&self) -> u64 {
        self.normal_draws
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = NoiseSource::new(7);
        let mut b = NoiseSource::new(7);
        for _ in 0..100 {
            assert_eq!(a.standard_normal().to_bits(), b.standard_normal().to_bits());
        }
        assert_eq!(a.uniform().to_bits(), b.uniform().to_bits());
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = NoiseSource::new(1);
        let mut b = NoiseSource::new(2);
        let xs: Vec<f64> = (0..8).map(|_| a.standard_normal()).collect();
        let ys: Vec<f64> = (0..8).map(|_| b.standard_normal()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_normal_moments() {
        let mut noise = NoiseSource::new(42);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| noise.standard_normal()).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.05, "mean should be ~0, got {}", mean);
        assert!((var - 1.0).abs() < 0.05, "variance should be ~1, got {}", var);
        assert_eq!(noise.normal_draws(), n as u64);
    }

    #[test]
    fn test_uniform_range() {
        let mut noise = NoiseSource::new(3);
        for _ in 0..1000 {
            let u = noise.uniform();
            assert!((0.0..1.0).contains(&u));
        }
        // Uniform draws are not counted as normal draws
        assert_eq!(noise.normal_draws(), 0);
    }
}

// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Fixed-step Euler–Maruyama integrator for delay reservoirs.
//!
//!   z(t+h) = z(t) + h·f(z(t), z(t - τ), u) + A·ξ·√h
//!
//! where `h = integ_step`, `A = noise_amp` and `ξ` is a standard-normal draw
//! (two independent draws for a complex node). The delay line holds exactly
//! `τ / h` past states, so its oldest entry *is* `z(t - τ)`; after each step
//! the new state is pushed and the oldest evicted.

use crate::noise::NoiseSource;
use crate::reservoir::Reservoir;
use crate::state::NodeState;

/// Advance `model` by one integration step under input `u_t`.
///
/// The derivative reads the delay line before it is updated, so a step always
/// sees the oldest value as of its own start. Returns the new state.
pub fn step<R: Reservoir + ?Sized>(model: &mut R, noise: &mut NoiseSource, u_t: f64) -> R::State {
    let z_t = model.core().z_t;
    let z_delayed = model.core().z_tau.oldest();
    let dzdt = model.dynamics(z_t, z_delayed, u_t);

    let params = model.params();
    let h = params.integ_step;
    let diffusion = params.noise_amp * h.sqrt();
    let xi = R::State::sample_noise(noise);

    let z_next = z_t + dzdt * h + xi * diffusion;

    let core = model.core_mut();
    core.z_t = z_next;
    core.z_tau.push_evict(z_next);
    z_next
}

/// Apply [`step`] `steps` times with a constant input.
pub fn hold<R: Reservoir + ?Sized>(
    model: &mut R,
    noise: &mut NoiseSource,
    u_t: f64,
    steps: usize,
) -> R::State {
    let mut z = model.core().z_t;
    for _ in 0..steps {
        z = step(model, noise, u_t);
    }
    z
}

/// Euler–Maruyama solver that keeps track of how far it has integrated.
#[derive(Debug, Clone, Default)]
pub struct EulerMaruyama {
    /// Simulated time
    pub time: f64,
    /// Number of steps taken
    pub steps: u64,
}

impl EulerMaruyama {
    pub fn new() -> Self {
        Self::default()
    }

    /// One step; see [`step`].
    pub fn step<R: Reservoir + ?Sized>(
        &mut self,
        model: &mut R,
        noise: &mut NoiseSource,
        u_t: f64,
    ) -> R::State {
        let z = step(model, noise, u_t);
        self.steps += 1;
        self.time += model.params().integ_step;
        z
    }

    /// `n` steps with a constant input; see [`hold`].
    pub fn run<R: Reservoir + ?Sized>(
        &mut self,
        model: &mut R,
        noise: &mut NoiseSource,
        u_t: f64,
        n: usize,
    ) -> R::State {
        let z = hold(model, noise, u_t, n);
        self.steps += n as u64;
        self.time += n as f64 * model.params().integ_step;
        z
    }
}

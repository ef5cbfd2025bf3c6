// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Ikeda delay reservoir (sine-squared nonlinearity).
//!
//!   dz/dt = -ε·z(t) + β·sin²(z(t - τ) + γ·u(t) + φ)
//!
//! The classic optoelectronic delay oscillator: β is the feedback gain, γ the
//! input gain, ε the loss coefficient and φ the phase offset of the
//! interferometer. The delay line starts from the constant 0.1 with no noise.

use serde::{Deserialize, Serialize};

use crate::params::{apply_finite, ConfigError, ParameterMap, ParameterSet, ReservoirParams};
use crate::reservoir::{DelayInit, Reservoir, ReservoirCore};

/// Initial value of `z_t` and every delay-line entry.
pub const IKEDA_SEED: f64 = 0.1;

/// Model-specific Ikeda parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IkedaParams {
    /// Feedback gain β
    pub beta: f64,
    /// Input gain γ
    pub gamma: f64,
    /// Loss coefficient ε
    pub epsilon: f64,
    /// Phase offset φ
    pub phi: f64,
}

impl Default for IkedaParams {
    fn default() -> Self {
        Self {
            beta: 1.6,
            gamma: 0.9,
            epsilon: 1.0,
            phi: 0.2,
        }
    }
}

impl ParameterSet for IkedaParams {
    const KEYS: &'static [&'static str] = &["beta", "gamma", "epsilon", "phi"];

    fn with_overrides(&self, overrides: &ParameterMap) -> Result<Self, ConfigError> {
        let mut next = self.clone();
        apply_finite(overrides, "beta", &mut next.beta)?;
        apply_finite(overrides, "gamma", &mut next.gamma)?;
        apply_finite(overrides, "epsilon", &mut next.epsilon)?;
        apply_finite(overrides, "phi", &mut next.phi)?;
        Ok(next)
    }

    fn entries(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("beta", self.beta),
            ("gamma", self.gamma),
            ("epsilon", self.epsilon),
            ("phi", self.phi),
        ]
    }
}

/// Real-valued Ikeda reservoir.
#[derive(Debug, Clone, PartialEq)]
pub struct Ikeda {
    core: ReservoirCore<f64>,
    params: IkedaParams,
}

impl Ikeda {
    /// Ikeda reservoir with default parameters and a seeded delay line.
    pub fn new() -> Self {
        Self {
            core: ReservoirCore::from_valid(ReservoirParams::default(), IKEDA_SEED),
            params: IkedaParams::default(),
        }
    }

    /// Ikeda reservoir with explicit parameters. Fails if `general` does not
    /// validate.
    pub fn with_params(general: ReservoirParams, params: IkedaParams) -> Result<Self, ConfigError> {
        Ok(Self {
            core: ReservoirCore::new(general, IKEDA_SEED)?,
            params,
        })
    }

    /// Residual `-ε·z + β·sin²(z + φ)` of a constant history `z` under zero
    /// input. Zero exactly at a fixed point.
    pub fn equilibrium_residual(&self, z: f64) -> f64 {
        self.dynamics(z, z, 0.0)
    }
}

impl Default for Ikeda {
    fn default() -> Self {
        Self::new()
    }
}

impl Reservoir for Ikeda {
    type State = f64;
    type Params = IkedaParams;

    fn name(&self) -> &'static str {
        "ikeda"
    }

    fn core(&self) -> &ReservoirCore<f64> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ReservoirCore<f64> {
        &mut self.core
    }

    fn model_params(&self) -> &IkedaParams {
        &self.params
    }

    fn model_params_mut(&mut self) -> &mut IkedaParams {
        &mut self.params
    }

    fn dynamics(&self, z_t: f64, z_delayed: f64, u_t: f64) -> f64 {
        let p = &self.params;
        let s = (z_delayed + p.gamma * u_t + p.phi).sin();
        -p.epsilon * z_t + p.beta * s * s
    }

    fn readout(&self) -> f64 {
        self.core.z_t
    }

    fn delay_init(&self) -> DelayInit<f64> {
        DelayInit::Constant { seed: IKEDA_SEED }
    }
}

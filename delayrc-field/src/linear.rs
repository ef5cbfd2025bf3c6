// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Linear delay reservoir: the base model.
//!
//!   dz/dt = -r·z(t) + κ·z(t - τ) + g·u(t)
//!
//! With the default `κ = g = 0` this is pure decay `dz/dt = -z`. The model is
//! generic over the node state, so the same law runs on a real or a complex
//! node. Its delay line starts from `init_value` perturbed by independent
//! noise per entry.

use serde::{Deserialize, Serialize};

use crate::params::{apply_finite, ConfigError, ParameterMap, ParameterSet, ReservoirParams};
use crate::reservoir::{DelayInit, Reservoir, ReservoirCore};
use crate::state::NodeState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    /// Decay rate r
    pub rate: f64,
    /// Delayed feedback gain κ
    pub feedback: f64,
    /// Input gain g
    pub input_gain: f64,
    /// Seed value of the delay line
    pub init_value: f64,
}

impl Default for LinearParams {
    fn default() -> Self {
        Self {
            rate: 1.0,
            feedback: 0.0,
            input_gain: 0.0,
            init_value: 0.0,
        }
    }
}

impl ParameterSet for LinearParams {
    const KEYS: &'static [&'static str] = &["rate", "feedback", "input_gain", "init_value"];

    fn with_overrides(&self, overrides: &ParameterMap) -> Result<Self, ConfigError> {
        let mut next = self.clone();
        apply_finite(overrides, "rate", &mut next.rate)?;
        apply_finite(overrides, "feedback", &mut next.feedback)?;
        apply_finite(overrides, "input_gain", &mut next.input_gain)?;
        apply_finite(overrides, "init_value", &mut next.init_value)?;
        Ok(next)
    }

    fn entries(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("rate", self.rate),
            ("feedback", self.feedback),
            ("input_gain", self.input_gain),
            ("init_value", self.init_value),
        ]
    }
}

/// Linear delay reservoir over node state `S`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearReservoir<S: NodeState> {
    core: ReservoirCore<S>,
    params: LinearParams,
}

/// Complex-valued linear reservoir.
pub type ComplexLinearReservoir = LinearReservoir<num_complex::Complex<f64>>;

impl<S: NodeState> LinearReservoir<S> {
    pub fn new() -> Self {
        let params = LinearParams::default();
        let seed = S::from_real(params.init_value);
        Self {
            core: ReservoirCore::from_valid(ReservoirParams::default(), seed),
            params,
        }
    }

    /// Fails if `general` does not validate.
    pub fn with_params(general: ReservoirParams, params: LinearParams) -> Result<Self, ConfigError> {
        let seed = S::from_real(params.init_value);
        Ok(Self {
            core: ReservoirCore::new(general, seed)?,
            params,
        })
    }
}

impl<S: NodeState> Default for LinearReservoir<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: NodeState> Reservoir for LinearReservoir<S> {
    type State = S;
    type Params = LinearParams;

    fn name(&self) -> &'static str {
        "linear"
    }

    fn core(&self) -> &ReservoirCore<S> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ReservoirCore<S> {
        &mut self.core
    }

    fn model_params(&self) -> &LinearParams {
        &self.params
    }

    fn model_params_mut(&mut self) -> &mut LinearParams {
        &mut self.params
    }

    fn dynamics(&self, z_t: S, z_delayed: S, u_t: f64) -> S {
        let p = &self.params;
        z_t * (-p.rate) + z_delayed * p.feedback + S::from_real(p.input_gain * u_t)
    }

    fn readout(&self) -> f64 {
        self.core.z_t.real()
    }

    fn delay_init(&self) -> DelayInit<S> {
        DelayInit::Noisy {
            seed: S::from_real(self.params.init_value),
        }
    }
}

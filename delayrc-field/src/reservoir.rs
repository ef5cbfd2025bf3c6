// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Delay-based reservoir models.
//!
//! A reservoir is one nonlinear node `z(t)` with delayed feedback
//! `z(t - delay)`. Concrete models implement [`Reservoir`]: they own a
//! [`ReservoirCore`] (generic parameters, current state and delay line) and
//! supply the feedback law, the readout projection, the delay-line
//! initialization policy and their model-specific parameters. The integrator
//! and the virtual-node driver only ever talk to this trait.

use std::fmt;

use serde::Serialize;

use crate::delay_line::DelayLine;
use crate::noise::NoiseSource;
use crate::params::{ConfigError, ParameterMap, ParameterSet, ReservoirParams};
use crate::state::NodeState;

const LONG_LINE: &str = "______________________";

/// How a model fills its delay line before a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DelayInit<S> {
    /// `z_t = seed`, every delay entry `seed + noise_amp · ξ`
    /// (transient stochastic history).
    Noisy { seed: S },
    /// `z_t = seed`, every delay entry `seed`. Consumes no noise.
    Constant { seed: S },
}

impl<S: Copy> DelayInit<S> {
    pub fn seed(&self) -> S {
        match *self {
            DelayInit::Noisy { seed } | DelayInit::Constant { seed } => seed,
        }
    }
}

/// Generic parameters plus the mutable integration state of a reservoir.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservoirCore<S: NodeState> {
    pub params: ReservoirParams,
    /// Current node state `z(t)`
    pub z_t: S,
    /// Past states `z(t - delay) .. z(t - integ_step)`, oldest first
    pub z_tau: DelayLine<S>,
}

impl<S: NodeState> ReservoirCore<S> {
    /// Core with a delay line of `params.steps_per_delay()` copies of `seed`.
    /// Fails if `params` does not validate.
    pub fn new(params: ReservoirParams, seed: S) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self::from_valid(params, seed))
    }

    /// `params` must already satisfy [`ReservoirParams::validate`].
    pub(crate) fn from_valid(params: ReservoirParams, seed: S) -> Self {
        let len = params.steps_per_delay();
        Self {
            params,
            z_t: seed,
            z_tau: DelayLine::filled(len, seed),
        }
    }
}

/// Parameter listing of a model, for diagnostics and result headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterReport {
    /// Model name (e.g. `ikeda`)
    pub name: String,
    /// Generic reservoir parameters
    pub general: Vec<(String, f64)>,
    /// Model-specific parameters
    pub model: Vec<(String, f64)>,
    /// `theta · num_nodes`
    pub input_time: f64,
}

impl ParameterReport {
    /// Value of a named parameter from either group.
    pub fn value(&self, key: &str) -> Option<f64> {
        self.general
            .iter()
            .chain(self.model.iter())
            .find(|(k, _)| k == key)
            .map(|&(_, v)| v)
    }
}

impl fmt::Display for ParameterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", LONG_LINE)?;
        writeln!(f, "{} RC parameters:", self.name)?;
        for (k, v) in &self.model {
            writeln!(f, "{} = {}", k, v)?;
        }
        writeln!(f, "{}", LONG_LINE)?;
        writeln!(f, "General RC parameters:")?;
        for (k, v) in &self.general {
            writeln!(f, "{} = {}", k, v)?;
        }
        writeln!(f, "input time = {}", self.input_time)?;
        write!(f, "{}", LONG_LINE)
    }
}

/// Capability set of a delay-based reservoir model.
///
/// Required methods define the model. Provided methods implement the shared
/// parameter and delay-line protocol and should not need overriding.
pub trait Reservoir {
    /// Node state type (real or complex).
    type State: NodeState;
    /// Model-specific parameters.
    type Params: ParameterSet;

    /// Short model name used in logs and result files.
    fn name(&self) -> &'static str;

    fn core(&self) -> &ReservoirCore<Self::State>;
    fn core_mut(&mut self) -> &mut ReservoirCore<Self::State>;

    fn model_params(&self) -> &Self::Params;
    fn model_params_mut(&mut self) -> &mut Self::Params;

    /// Feedback law `dz/dt = f(z(t), z(t - delay), u(t))`. Must be pure.
    fn dynamics(&self, z_t: Self::State, z_delayed: Self::State, u_t: f64) -> Self::State;

    /// Real-valued virtual-node sample of the current state.
    fn readout(&self) -> f64;

    /// Delay-line initialization policy of this model.
    fn delay_init(&self) -> DelayInit<Self::State>;

    // ─── Provided ────────────────────────────────────

    fn params(&self) -> &ReservoirParams {
        &self.core().params
    }

    fn z_t(&self) -> Self::State {
        self.core().z_t
    }

    fn delay_line(&self) -> &DelayLine<Self::State> {
        &self.core().z_tau
    }

    /// Apply named overrides to the generic and model-specific parameters.
    ///
    /// Unknown keys are ignored. On error nothing is modified. If the delay
    /// line length changes, the line is refilled with the model's seed value;
    /// call [`Reservoir::init_delay`] afterwards for the model's full policy.
    fn set_parameters(&mut self, overrides: &ParameterMap) -> Result<(), ConfigError> {
        let general = self.core().params.with_overrides(overrides)?;
        let specific = self.model_params().with_overrides(overrides)?;

        for key in overrides.keys() {
            if !ReservoirParams::KEYS.contains(&key) && !Self::Params::KEYS.contains(&key) {
                tracing::debug!(model = self.name(), key, "ignoring unrecognised parameter");
            }
        }

        let resized = general.steps_per_delay() != self.core().params.steps_per_delay();
        *self.model_params_mut() = specific;
        self.core_mut().params = general;
        if resized {
            let seed = self.delay_init().seed();
            let core = self.core_mut();
            core.z_tau = DelayLine::filled(core.params.steps_per_delay(), seed);
            core.z_t = seed;
        }
        Ok(())
    }

    /// Reset `z_t` and the delay line according to the model's policy.
    fn init_delay(&mut self, noise: &mut NoiseSource) {
        let policy = self.delay_init();
        let core = self.core_mut();
        let len = core.params.steps_per_delay();
        match policy {
            DelayInit::Constant { seed } => {
                core.z_t = seed;
                core.z_tau = DelayLine::filled(len, seed);
            }
            DelayInit::Noisy { seed } => {
                let amp = core.params.noise_amp;
                let history = (0..len)
                    .map(|_| seed + Self::State::sample_noise(noise) * amp)
                    .collect();
                core.z_t = seed;
                core.z_tau = DelayLine::from_history(history);
            }
        }
    }

    /// Current parameter listing.
    fn parameter_report(&self) -> ParameterReport {
        let params = self.params();
        ParameterReport {
            name: self.name().to_string(),
            general: params
                .entries()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            model: self
                .model_params()
                .entries()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            input_time: params.input_time(),
        }
    }

    /// Log the current parameters at info level and return them.
    fn describe_parameters(&self) -> ParameterReport {
        let report = self.parameter_report();
        tracing::info!("\n{}", report);
        report
    }
}

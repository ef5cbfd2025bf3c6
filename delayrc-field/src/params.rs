// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Reservoir parameters and named overrides.
//!
//! Overrides arrive as a [`ParameterMap`] of raw strings (from the command
//! line or a config file). Each parameter set validates the keys it
//! recognises into a fresh copy via [`ParameterSet::with_overrides`] and
//! ignores the rest, so a model can merge its generic and model-specific
//! sets and commit them only when both succeed.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid or unparseable parameter override.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A recognised key carried a value that is not a number.
    #[error("parameter `{key}` expects a number, got `{value}`")]
    NotNumeric { key: String, value: String },
    /// A recognised key carried a number outside its valid range.
    #[error("parameter `{key}` is invalid: {reason}")]
    Invalid { key: String, reason: String },
    /// An override that is not of the form `key=value`.
    #[error("malformed override `{0}` (expected key=value)")]
    Malformed(String),
}

impl ConfigError {
    pub fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Named overrides: key → raw value string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterMap {
    entries: BTreeMap<String, String>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an override.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.entries.insert(key.into(), value.to_string());
    }

    /// Builder form of [`ParameterMap::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Parse one `key=value` override. A leading `-` or `--` on the key is
    /// accepted (`-beta=1.6`).
    pub fn insert_arg(&mut self, arg: &str) -> Result<(), ConfigError> {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| ConfigError::Malformed(arg.to_string()))?;
        let key = key.trim_start_matches('-').trim();
        if key.is_empty() {
            return Err(ConfigError::Malformed(arg.to_string()));
        }
        self.set(key, value.trim());
        Ok(())
    }

    /// Build a map from a list of `key=value` overrides.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::new();
        for arg in args {
            map.insert_arg(arg.as_ref())?;
        }
        Ok(map)
    }

    /// Merge `other` into `self`; keys in `other` win.
    pub fn merge(&mut self, other: &ParameterMap) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Numeric value of `key`, if present.
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, ConfigError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ConfigError::NotNumeric {
                    key: key.to_string(),
                    value: raw.clone(),
                }),
        }
    }

    /// Value of `key` as a count. Fractional values are truncated toward
    /// zero, matching how counts were always read from float overrides.
    pub fn get_count(&self, key: &str) -> Result<Option<usize>, ConfigError> {
        match self.get_f64(key)? {
            None => Ok(None),
            Some(v) if !v.is_finite() || v < 0.0 => Err(ConfigError::invalid(
                key,
                format!("expected a non-negative count, got {}", v),
            )),
            Some(v) => Ok(Some(v.trunc() as usize)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A validated group of named parameters that can absorb overrides.
pub trait ParameterSet: Clone + fmt::Debug {
    /// Keys this set recognises.
    const KEYS: &'static [&'static str];

    /// Copy of `self` with every recognised key in `overrides` applied and
    /// validated. `self` is never modified.
    fn with_overrides(&self, overrides: &ParameterMap) -> Result<Self, ConfigError>;

    /// Current values, in `KEYS` order.
    fn entries(&self) -> Vec<(&'static str, f64)>;
}

/// How a time ratio is converted to an integer number of integration steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPolicy {
    /// Round to the nearest integer. `0.3 / 0.1` gives 3.
    #[default]
    Round,
    /// Truncate toward zero. `0.3 / 0.1` evaluates to `2.999…` in `f64`
    /// and gives 2.
    Truncate,
}

impl StepPolicy {
    pub fn steps(self, duration: f64, integ_step: f64) -> usize {
        let ratio = duration / integ_step;
        let steps = match self {
            StepPolicy::Round => ratio.round(),
            StepPolicy::Truncate => ratio.trunc(),
        };
        if steps.is_finite() && steps > 0.0 {
            steps as usize
        } else {
            0
        }
    }

    fn from_code(key: &str, code: f64) -> Result<Self, ConfigError> {
        match code as i64 {
            0 if code == 0.0 => Ok(StepPolicy::Round),
            1 if code == 1.0 => Ok(StepPolicy::Truncate),
            _ => Err(ConfigError::invalid(
                key,
                format!("expected 0 (round) or 1 (truncate), got {}", code),
            )),
        }
    }

    fn code(self) -> f64 {
        match self {
            StepPolicy::Round => 0.0,
            StepPolicy::Truncate => 1.0,
        }
    }
}

/// Physical and numerical parameters shared by every delay reservoir.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservoirParams {
    /// Feedback delay (time units)
    pub delay: f64,
    /// Number of virtual nodes multiplexed onto the delay line
    pub num_nodes: usize,
    /// Time per virtual node
    pub theta: f64,
    /// Integration step size
    pub integ_step: f64,
    /// Stochastic forcing amplitude (0 = deterministic)
    pub noise_amp: f64,
    /// Conversion of `theta` and `delay` into integer step counts
    #[serde(default)]
    pub step_policy: StepPolicy,
}

impl Default for ReservoirParams {
    fn default() -> Self {
        Self {
            delay: 80.0,
            num_nodes: 50,
            theta: 1.4,
            integ_step: 0.01,
            noise_amp: 1e-3,
            step_policy: StepPolicy::Round,
        }
    }
}

impl ReservoirParams {
    /// Integration steps per virtual node.
    pub fn steps_per_node(&self) -> usize {
        self.step_policy.steps(self.theta, self.integ_step)
    }

    /// Length of the delay line in integration steps.
    pub fn steps_per_delay(&self) -> usize {
        self.step_policy.steps(self.delay, self.integ_step)
    }

    /// Time needed to feed one input sample through every virtual node.
    pub fn input_time(&self) -> f64 {
        self.theta * self.num_nodes as f64
    }

    /// Check every invariant of the parameter set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("delay", self.delay)?;
        positive("theta", self.theta)?;
        positive("integ_step", self.integ_step)?;
        if !self.noise_amp.is_finite() || self.noise_amp < 0.0 {
            return Err(ConfigError::invalid(
                "noise_amp",
                format!("must be finite and >= 0, got {}", self.noise_amp),
            ));
        }
        if self.num_nodes == 0 {
            return Err(ConfigError::invalid("num_nodes", "must be at least 1"));
        }
        if self.steps_per_node() == 0 {
            return Err(ConfigError::invalid(
                "theta",
                format!(
                    "theta / integ_step = {} gives no integration steps per node",
                    self.theta / self.integ_step
                ),
            ));
        }
        if self.steps_per_delay() == 0 {
            return Err(ConfigError::invalid(
                "delay",
                format!(
                    "delay / integ_step = {} gives an empty delay line",
                    self.delay / self.integ_step
                ),
            ));
        }
        Ok(())
    }
}

impl ParameterSet for ReservoirParams {
    const KEYS: &'static [&'static str] = &[
        "delay",
        "num_nodes",
        "theta",
        "integ_step",
        "noise_amp",
        "step_policy",
    ];

    fn with_overrides(&self, overrides: &ParameterMap) -> Result<Self, ConfigError> {
        let mut next = self.clone();
        if let Some(v) = overrides.get_f64("delay")? {
            next.delay = v;
        }
        if let Some(n) = overrides.get_count("num_nodes")? {
            next.num_nodes = n;
        }
        if let Some(v) = overrides.get_f64("theta")? {
            next.theta = v;
        }
        if let Some(v) = overrides.get_f64("integ_step")? {
            next.integ_step = v;
        }
        if let Some(v) = overrides.get_f64("noise_amp")? {
            next.noise_amp = v;
        }
        if let Some(raw) = overrides.raw("step_policy") {
            next.step_policy = match raw.trim() {
                "round" => StepPolicy::Round,
                "truncate" => StepPolicy::Truncate,
                _ => {
                    let code = overrides.get_f64("step_policy")?.unwrap_or_default();
                    StepPolicy::from_code("step_policy", code)?
                }
            };
        }
        next.validate()?;
        Ok(next)
    }

    fn entries(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("delay", self.delay),
            ("num_nodes", self.num_nodes as f64),
            ("theta", self.theta),
            ("integ_step", self.integ_step),
            ("noise_amp", self.noise_amp),
            ("step_policy", self.step_policy.code()),
        ]
    }
}

fn positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            key,
            format!("must be finite and > 0, got {}", value),
        ))
    }
}

/// Read a finite float override into `slot`.
pub fn apply_finite(
    overrides: &ParameterMap,
    key: &str,
    slot: &mut f64,
) -> Result<(), ConfigError> {
    if let Some(v) = overrides.get_f64(key)? {
        if !v.is_finite() {
            return Err(ConfigError::invalid(key, format!("must be finite, got {}", v)));
        }
        *slot = v;
    }
    Ok(())
}

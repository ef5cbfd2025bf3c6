// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Experiment configuration.
//!
//! Everything a run needs is expressed as one flat [`ParameterMap`]: the
//! experiment keys below plus any generic or model-specific reservoir keys.
//! A JSON file supplies a base map and command-line overrides are merged on
//! top, so the last writer wins. The reservoir keys are passed through to
//! [`Reservoir::set_parameters`](delayrc_field::Reservoir::set_parameters)
//! untouched.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use delayrc_field::{ConfigError, ParameterMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RcError;

/// Keys consumed by the experiment itself rather than the reservoir.
pub const EXPERIMENT_KEYS: &[&str] = &[
    "reservoir",
    "seed",
    "pred_steps",
    "init_length",
    "train_length",
    "test_length",
    "ridge_alpha",
];

/// Reservoir model selected at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReservoirKind {
    /// Sine-squared delay oscillator, real state
    #[default]
    Ikeda,
    /// Linear decay, real state
    Linear,
    /// Linear decay, complex state
    LinearComplex,
}

impl ReservoirKind {
    pub const ALL: [ReservoirKind; 3] = [
        ReservoirKind::Ikeda,
        ReservoirKind::Linear,
        ReservoirKind::LinearComplex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservoirKind::Ikeda => "ikeda",
            ReservoirKind::Linear => "linear",
            ReservoirKind::LinearComplex => "linear-complex",
        }
    }
}

impl fmt::Display for ReservoirKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservoirKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ConfigError::invalid(
                    "reservoir",
                    format!("unknown model `{}` (expected ikeda, linear or linear-complex)", s),
                )
            })
    }
}

/// Settings of one prediction experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub reservoir: ReservoirKind,
    /// Seed of the run's noise source (mask and stochastic forcing)
    pub seed: u64,
    /// Prediction horizon in samples
    pub pred_steps: usize,
    /// Washout samples, discarded
    pub init_length: usize,
    pub train_length: usize,
    pub test_length: usize,
    /// Ridge penalty; exact least squares when absent
    pub ridge_alpha: Option<f64>,
    /// Reservoir overrides (generic and model-specific keys)
    pub parameters: ParameterMap,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            reservoir: ReservoirKind::default(),
            seed: 0,
            pred_steps: 17,
            init_length: 1000,
            train_length: 5000,
            test_length: 1000,
            ridge_alpha: None,
            parameters: ParameterMap::new(),
        }
    }
}

impl ExperimentConfig {
    /// Split a flat override map into experiment settings and reservoir
    /// parameters. Absent experiment keys keep their defaults.
    pub fn from_parameters(map: &ParameterMap) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = map.raw("reservoir") {
            config.reservoir = raw.parse()?;
        }
        if let Some(seed) = map.get_count("seed")? {
            config.seed = seed as u64;
        }
        if let Some(n) = map.get_count("pred_steps")? {
            config.pred_steps = n;
        }
        if let Some(n) = map.get_count("init_length")? {
            config.init_length = n;
        }
        if let Some(n) = map.get_count("train_length")? {
            config.train_length = n;
        }
        if let Some(n) = map.get_count("test_length")? {
            config.test_length = n;
        }
        config.ridge_alpha = map.get_f64("ridge_alpha")?;

        let mut parameters = ParameterMap::new();
        for key in map.keys().filter(|k| !EXPERIMENT_KEYS.contains(k)) {
            if let Some(raw) = map.raw(key) {
                parameters.set(key, raw);
            }
        }
        config.parameters = parameters;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.train_length == 0 {
            return Err(ConfigError::invalid("train_length", "must be at least 1"));
        }
        if self.test_length == 0 {
            return Err(ConfigError::invalid("test_length", "must be at least 1"));
        }
        if let Some(alpha) = self.ridge_alpha {
            if !alpha.is_finite() || alpha < 0.0 {
                return Err(ConfigError::invalid(
                    "ridge_alpha",
                    format!("must be finite and >= 0, got {}", alpha),
                ));
            }
        }
        Ok(())
    }

    /// Samples of the raw series a run consumes.
    pub fn required_length(&self) -> usize {
        self.init_length + self.train_length + self.test_length + self.pred_steps
    }
}

/// Read a flat JSON object of parameters (`{"beta": 1.2, "reservoir": "ikeda"}`).
///
/// Numbers, strings and booleans are accepted; `null` entries are skipped.
pub fn load_parameter_file(path: &Path) -> Result<ParameterMap, RcError> {
    let text = fs::read_to_string(path)?;
    parse_parameter_json(&text)
}

pub fn parse_parameter_json(text: &str) -> Result<ParameterMap, RcError> {
    let value: Value = serde_json::from_str(text)?;
    let object = value
        .as_object()
        .ok_or_else(|| ConfigError::Malformed("parameter file must be a JSON object".into()))?;

    let mut map = ParameterMap::new();
    for (key, v) in object {
        match v {
            Value::Null => {}
            Value::String(s) => map.set(key.as_str(), s),
            Value::Number(n) => map.set(key.as_str(), n),
            Value::Bool(b) => map.set(key.as_str(), u8::from(*b)),
            Value::Array(_) | Value::Object(_) => {
                let msg = format!("{}: nested values are not supported", key);
                return Err(ConfigError::Malformed(msg).into());
            }
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = ExperimentConfig::default();
        assert_eq!(c.reservoir, ReservoirKind::Ikeda);
        assert_eq!(c.pred_steps, 17);
        assert_eq!(c.required_length(), 7017);
        assert!(c.ridge_alpha.is_none());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_from_parameters_splits_keys() {
        let map = ParameterMap::from_args([
            "-seed=42",
            "-ridge_alpha=1e-6",
            "-beta=1.1",
            "-theta=0.7",
            "reservoir=linear-complex",
        ])
        .unwrap();
        let c = ExperimentConfig::from_parameters(&map).unwrap();
        assert_eq!(c.seed, 42);
        assert_eq!(c.ridge_alpha, Some(1e-6));
        assert_eq!(c.reservoir, ReservoirKind::LinearComplex);
        assert_eq!(c.parameters.len(), 2);
        assert_eq!(c.parameters.get_f64("beta").unwrap(), Some(1.1));
        assert!(!c.parameters.contains("seed"));
    }

    #[test]
    fn test_invalid_experiment_values() {
        for arg in ["train_length=0", "ridge_alpha=-1", "seed=abc", "reservoir=lorenz"] {
            let map = ParameterMap::from_args([arg]).unwrap();
            assert!(ExperimentConfig::from_parameters(&map).is_err(), "{} accepted", arg);
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("IKEDA".parse::<ReservoirKind>().unwrap(), ReservoirKind::Ikeda);
        assert_eq!("linear".parse::<ReservoirKind>().unwrap(), ReservoirKind::Linear);
        for kind in ReservoirKind::ALL {
            assert_eq!(kind.to_string().parse::<ReservoirKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parameter_json() {
        let map = parse_parameter_json(
            r#"{"beta": 0.8, "reservoir": "linear", "ridge_alpha": null, "seed": 3}"#,
        )
        .unwrap();
        assert_eq!(map.get_f64("beta").unwrap(), Some(0.8));
        assert_eq!(map.raw("reservoir"), Some("linear"));
        assert!(!map.contains("ridge_alpha"));

        assert!(parse_parameter_json("[1, 2]").is_err());
        assert!(parse_parameter_json(r#"{"beta": [1]}"#).is_err());
    }

    #[test]
    fn test_file_then_cli_precedence() {
        let mut map = parse_parameter_json(r#"{"seed": 3, "beta": 0.8}"#).unwrap();
        map.merge(&ParameterMap::from_args(["seed=9"]).unwrap());
        let c = ExperimentConfig::from_parameters(&map).unwrap();
        assert_eq!(c.seed, 9);
        assert_eq!(c.parameters.get_f64("beta").unwrap(), Some(0.8));
    }

    #[test]
    fn test_config_serialization() {
        let c = ExperimentConfig {
            ridge_alpha: Some(0.01),
            parameters: ParameterMap::new().with("beta", 1.0),
            ..ExperimentConfig::default()
        };
        let json = serde_json::to_string_pretty(&c).unwrap();
        let restored: ExperimentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, c);
    }
}

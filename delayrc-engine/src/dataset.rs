// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Benchmark time series: loading, normalisation and phase windows.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::ExperimentConfig;
use crate::error::RcError;
use crate::metrics::{mean, sample_std};

// ─── Loading ─────────────────────────────────────────

/// Load a single-column CSV series (no header). Extra columns are ignored.
pub fn load_series(path: &Path) -> Result<Vec<f64>, RcError> {
    let file = File::open(path)?;
    let series = read_series(file)?;
    tracing::info!(path = %path.display(), samples = series.len(), "loaded series");
    Ok(series)
}

pub fn read_series<R: Read>(reader: R) -> Result<Vec<f64>, RcError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut series = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        let Some(field) = record.get(0).filter(|f| !f.is_empty()) else {
            continue;
        };
        let value: f64 = field
            .parse()
            .map_err(|_| RcError::Dataset(format!("line {}: `{}` is not a number", line + 1, field)))?;
        series.push(value);
    }
    if series.is_empty() {
        return Err(RcError::Dataset("series is empty".into()));
    }
    Ok(series)
}

/// Shift to zero mean and scale to unit sample standard deviation.
pub fn normalize(series: &[f64]) -> Result<Vec<f64>, RcError> {
    let m = mean(series);
    let s = sample_std(series);
    if !(s.is_finite() && s > 0.0) {
        return Err(RcError::Dataset(format!(
            "cannot normalise a series with standard deviation {}",
            s
        )));
    }
    Ok(series.iter().map(|x| (x - m) / s).collect())
}

// ─── Phase windows ───────────────────────────────────

/// Input/target windows of one experiment.
///
/// Targets lead their inputs by `pred_steps` samples: `target[k] =
/// series[start + k + pred_steps]` for `input[k] = series[start + k]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseData {
    pub init_input: Vec<f64>,
    pub train_input: Vec<f64>,
    pub train_target: Vec<f64>,
    pub test_input: Vec<f64>,
    pub test_target: Vec<f64>,
}

/// Cut consecutive init, train and test windows from `series`.
pub fn split_phases(series: &[f64], config: &ExperimentConfig) -> Result<PhaseData, RcError> {
    let needed = config.required_length();
    if series.len() < needed {
        return Err(RcError::Dataset(format!(
            "series has {} samples, run needs {} (init {} + train {} + test {} + horizon {})",
            series.len(),
            needed,
            config.init_length,
            config.train_length,
            config.test_length,
            config.pred_steps
        )));
    }

    let p = config.pred_steps;
    let train_start = config.init_length;
    let test_start = train_start + config.train_length;
    let test_end = test_start + config.test_length;

    Ok(PhaseData {
        init_input: series[..train_start].to_vec(),
        train_input: series[train_start..test_start].to_vec(),
        train_target: series[train_start + p..test_start + p].to_vec(),
        test_input: series[test_start..test_end].to_vec(),
        test_target: series[test_start + p..test_end + p].to_vec(),
    })
}

// ─── Mackey-Glass generator ──────────────────────────

/// Mackey–Glass delay equation
/// `dx/dt = β·x(t-τ) / (1 + x(t-τ)ⁿ) − γ·x(t)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MackeyGlass {
    pub tau: f64,
    pub beta: f64,
    pub gamma: f64,
    pub n: f64,
    /// Euler sub-steps per unit time; one sample is emitted per unit time
    pub substeps: usize,
    /// Unit-time samples discarded before output starts
    pub washout: usize,
}

impl Default for MackeyGlass {
    fn default() -> Self {
        Self {
            tau: 17.0,
            beta: 0.2,
            gamma: 0.1,
            n: 10.0,
            substeps: 10,
            washout: 500,
        }
    }
}

impl MackeyGlass {
    /// `length` samples at unit spacing. The initial history is 1.2 plus a
    /// small seeded perturbation.
    pub fn generate(&self, length: usize, seed: u64) -> Vec<f64> {
        if length == 0 {
            return Vec::new();
        }
        let substeps = self.substeps.max(1);
        let dt = 1.0 / substeps as f64;
        let lag = ((self.tau * substeps as f64).round() as usize).max(1);
        let total = (length + self.washout) * substeps;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut x: Vec<f64> = (0..=lag)
            .map(|_| 1.2 + (rng.gen::<f64>() - 0.5) * 0.1)
            .collect();
        x.reserve(total);

        for t in lag..lag + total {
            let x_tau = x[t - lag];
            let dx = self.beta * x_tau / (1.0 + x_tau.powf(self.n)) - self.gamma * x[t];
            x.push(x[t] + dt * dx);
        }

        x[lag + self.washout * substeps + substeps..]
            .iter()
            .step_by(substeps)
            .take(length)
            .copied()
            .collect()
    }
}

/// Default τ = 17 series.
pub fn mackey_glass(length: usize, seed: u64) -> Vec<f64> {
    MackeyGlass::default().generate(length, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_series() {
        let data = "0.5\n1.5, extra\n\n-2e-1\n";
        let s = read_series(data.as_bytes()).unwrap();
        assert_eq!(s, vec![0.5, 1.5, -0.2]);
    }

    #[test]
    fn test_read_series_errors() {
        let err = read_series("1.0\nabc\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RcError::Dataset(ref m) if m.contains("line 2")));
        assert!(read_series("".as_bytes()).is_err());
    }

    #[test]
    fn test_normalize() {
        let z = normalize(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!(mean(&z).abs() < 1e-12);
        assert!((sample_std(&z) - 1.0).abs() < 1e-12);
        assert!(normalize(&[3.0; 5]).is_err());
    }

    #[test]
    fn test_split_alignment() {
        let series: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let config = ExperimentConfig {
            pred_steps: 3,
            init_length: 5,
            train_length: 20,
            test_length: 10,
            ..ExperimentConfig::default()
        };
        let d = split_phases(&series, &config).unwrap();
        assert_eq!(d.init_input.len(), 5);
        assert_eq!(d.train_input.len(), 20);
        assert_eq!(d.train_target.len(), 20);
        assert_eq!(d.test_input.len(), 10);
        assert_eq!(d.test_target.len(), 10);
        assert_eq!(d.train_input[0], 5.0);
        assert_eq!(d.train_target[0], 8.0);
        assert_eq!(d.test_input[0], 25.0);
        assert_eq!(*d.test_target.last().unwrap(), 37.0);
    }

    #[test]
    fn test_split_too_short() {
        let series = vec![0.0; 37];
        let config = ExperimentConfig {
            pred_steps: 3,
            init_length: 5,
            train_length: 20,
            test_length: 10,
            ..ExperimentConfig::default()
        };
        assert!(split_phases(&series, &config).is_err());
        assert!(split_phases(&vec![0.0; 38], &config).is_ok());
    }

    #[test]
    fn test_mackey_glass_properties() {
        let a = mackey_glass(1000, 4);
        let b = mackey_glass(1000, 4);
        assert_eq!(a, b);
        assert_eq!(a.len(), 1000);
        assert!(a.iter().all(|x| x.is_finite() && *x > 0.0 && *x < 2.0));
        // chaotic regime: not settled to a fixed point
        assert!(sample_std(&a) > 0.1, "std {}", sample_std(&a));
    }

    #[test]
    fn test_mackey_glass_short_lengths() {
        assert!(mackey_glass(0, 1).is_empty());
        let one = mackey_glass(1, 1);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0], mackey_glass(5, 1)[0]);
        let quick = MackeyGlass {
            washout: 0,
            ..MackeyGlass::default()
        };
        assert!(quick.generate(0, 2).is_empty());
        assert_eq!(quick.generate(3, 2).len(), 3);
    }
}

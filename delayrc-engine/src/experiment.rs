// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! End-to-end prediction experiment.
//!
//! normalise → split → configure model → seed noise, draw mask, init delay
//! line → washout → training states → testing states → fit readout →
//! predictions and errors.

use delayrc_field::{
    ComplexLinearReservoir, Ikeda, LinearReservoir, ParameterReport, Reservoir,
};
use serde::Serialize;

use crate::config::{ExperimentConfig, ReservoirKind};
use crate::dataset::{normalize, split_phases};
use crate::driver::Pipeline;
use crate::error::{NumericInstabilityWarning, RcError};
use crate::metrics::nrmse;
use crate::readout::ReadoutWeights;
use crate::training::ReadoutTrainer;

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    pub config: ExperimentConfig,
    /// Parameters the model actually ran with
    pub parameters: ParameterReport,
    pub weights: ReadoutWeights,
    pub train_nrmse: f64,
    pub test_nrmse: f64,
    /// Test-phase predictions
    pub y_pred: Vec<f64>,
    /// Test-phase targets
    pub y_test: Vec<f64>,
    /// Non-finite samples seen during training or testing
    pub instabilities: Vec<NumericInstabilityWarning>,
    /// Simulated time over all phases
    pub simulated_time: f64,
    pub integration_steps: u64,
}

/// Run `config` on a raw (unnormalised) series with the model it selects.
pub fn run_experiment(config: &ExperimentConfig, series: &[f64]) -> Result<ExperimentReport, RcError> {
    tracing::info!(reservoir = %config.reservoir, "selected reservoir");
    match config.reservoir {
        ReservoirKind::Ikeda => run_with(Ikeda::new(), config, series),
        ReservoirKind::Linear => run_with(LinearReservoir::<f64>::new(), config, series),
        ReservoirKind::LinearComplex => run_with(ComplexLinearReservoir::new(), config, series),
    }
}

/// Run `config` with an explicit model. `config.reservoir` is not consulted.
pub fn run_with<R: Reservoir>(
    mut model: R,
    config: &ExperimentConfig,
    series: &[f64],
) -> Result<ExperimentReport, RcError> {
    config.validate()?;
    let series = normalize(series)?;
    let data = split_phases(&series, config)?;

    model.set_parameters(&config.parameters)?;
    let parameters = model.describe_parameters();

    let (trained, train_states) = Pipeline::seeded(model, config.seed)
        .warm_up(&data.init_input)?
        .collect_training(&data.train_input)?;
    let (test_states, finished) = trained.collect_testing(&data.test_input)?;

    let instabilities: Vec<NumericInstabilityWarning> = [&train_states, &test_states]
        .iter()
        .filter_map(|s| s.instability().copied())
        .collect();

    let weights = ReadoutTrainer::new(config.ridge_alpha).fit(&train_states, &data.train_target)?;

    let train_pred = weights.predict(&train_states)?;
    let train_nrmse = nrmse(&train_pred, &data.train_target)?;
    tracing::info!(train_nrmse, "training predictions computed");

    let y_pred = weights.predict(&test_states)?;
    let test_nrmse = nrmse(&y_pred, &data.test_target)?;
    tracing::info!(test_nrmse, "testing predictions computed");

    Ok(ExperimentReport {
        config: config.clone(),
        parameters,
        weights,
        train_nrmse,
        test_nrmse,
        y_pred,
        y_test: data.test_target,
        instabilities,
        simulated_time: finished.elapsed(),
        integration_steps: finished.steps(),
    })
}

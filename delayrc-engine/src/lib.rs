// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

pub mod error;
pub mod mask;
pub mod readout;
pub mod metrics;
pub mod training;
pub mod driver;
pub mod config;
pub mod dataset;
pub mod experiment;
pub mod report;

pub use error::{NumericInstabilityWarning, Phase, RcError};
pub use mask::Mask;
pub use readout::{predict, FitMethod, ReadoutWeights, StateMatrix};
pub use metrics::nrmse;
pub use training::{fit_linear, fit_ridge, ReadoutTrainer};
pub use driver::{integrate, Pipeline};
pub use config::{ExperimentConfig, ReservoirKind};
pub use dataset::{mackey_glass, MackeyGlass};
pub use experiment::{run_experiment, ExperimentReport};

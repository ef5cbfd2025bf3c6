// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Delay reservoir Mackey-Glass benchmark.
//!
//! Loads (or generates) the series, runs the experiment and writes the
//! result log, `y_pred.csv`, `y_test.csv` and `report.json`.
//!
//! ```text
//! delayrc-bench --data mackey_glass_tau17.csv seed=1 ridge_alpha=1e-6
//! delayrc-bench --synthetic --reservoir linear input_gain=1 feedback=0.5
//! ```

mod cli;
mod logging;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use delayrc_engine::dataset::load_series;
use delayrc_engine::report::write_outputs;
use delayrc_engine::{mackey_glass, run_experiment, ExperimentConfig};

use crate::cli::{Cli, DEFAULT_DATA};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(&cli.log_level);

    let config = cli.experiment_config()?;
    let series = input_series(&cli, &config)?;

    let report = run_experiment(&config, &series).context("experiment failed")?;
    for warning in &report.instabilities {
        tracing::warn!("{}", warning);
    }

    let paths = write_outputs(&report, &cli.output_dir).with_context(|| {
        format!("failed to write results to {}", cli.output_dir.display())
    })?;

    println!("Training NRMSE = {}", report.train_nrmse);
    println!("Testing NRMSE = {}", report.test_nrmse);
    println!("Results: {}", paths.result_log.display());
    Ok(())
}

fn input_series(cli: &Cli, config: &ExperimentConfig) -> Result<Vec<f64>> {
    if cli.synthetic {
        let length = config.required_length();
        tracing::info!(length, seed = config.seed, "generating Mackey-Glass series");
        return Ok(mackey_glass(length, config.seed));
    }
    let path = cli.data.as_deref().unwrap_or(Path::new(DEFAULT_DATA));
    load_series(path).with_context(|| format!("failed to load series from {}", path.display()))
}

// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use delayrc_engine::config::load_parameter_file;
use delayrc_engine::{ExperimentConfig, ReservoirKind};
use delayrc_field::ParameterMap;

/// Default benchmark series, one value per line.
pub const DEFAULT_DATA: &str = "mackey_glass_tau17.csv";

/// Mackey-Glass prediction with a delay-based reservoir computer.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Series CSV (single column, no header)
    #[arg(long, conflicts_with = "synthetic")]
    pub data: Option<PathBuf>,

    /// Generate a Mackey-Glass τ=17 series instead of reading one
    #[arg(long)]
    pub synthetic: bool,

    /// Reservoir model (overrides `reservoir` in the config file)
    #[arg(long)]
    pub reservoir: Option<ReservoirKind>,

    /// Directory for result files
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// JSON object of parameters; command-line overrides win
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Parameter overrides, `key=value` or `-key=value` (e.g. beta=1.2 seed=3)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub overrides: Vec<String>,
}

impl Cli {
    /// Config file, then trailing overrides, then `--reservoir`.
    pub fn parameters(&self) -> Result<ParameterMap> {
        let mut map = match &self.config {
            Some(path) => load_parameter_file(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?,
            None => ParameterMap::new(),
        };
        let overrides =
            ParameterMap::from_args(&self.overrides).context("invalid parameter override")?;
        map.merge(&overrides);
        if let Some(kind) = self.reservoir {
            map.set("reservoir", kind);
        }
        Ok(map)
    }

    pub fn experiment_config(&self) -> Result<ExperimentConfig> {
        let map = self.parameters()?;
        for key in ["seed", "pred_steps"] {
            if !map.contains(key) {
                tracing::info!("no {} given, using default", key);
            }
        }
        ExperimentConfig::from_parameters(&map).context("invalid experiment configuration")
    }
}

// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Result files.
//!
//! The result log is a small ragged CSV:
//!
//! ```text
//! reservoir,delay,num_nodes,theta,integ_step,noise_amp
//! ikeda,80,50,1.4,0.01,0.001
//! beta,gamma,epsilon,phi
//! 1.6,0.9,1,0.2
//! Training NRMSE,Testing NRMSE
//! 0.0123,0.0456
//! ```
//!
//! The model block is omitted for models without specific parameters.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::RcError;
use crate::experiment::ExperimentReport;

pub const RESULT_LOG: &str = "delay_rc_output.csv";
pub const PREDICTIONS: &str = "y_pred.csv";
pub const TARGETS: &str = "y_test.csv";
pub const REPORT_JSON: &str = "report.json";

/// Generic parameters listed in the result log, in column order.
const GENERAL_COLUMNS: [&str; 5] = ["delay", "num_nodes", "theta", "integ_step", "noise_amp"];

/// Paths of the files written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputPaths {
    pub result_log: PathBuf,
    pub predictions: PathBuf,
    pub targets: PathBuf,
    pub report: PathBuf,
}

/// Write every result file into `dir`, creating it if needed.
pub fn write_outputs(report: &ExperimentReport, dir: &Path) -> Result<OutputPaths, RcError> {
    fs::create_dir_all(dir)?;
    let paths = OutputPaths {
        result_log: dir.join(RESULT_LOG),
        predictions: dir.join(PREDICTIONS),
        targets: dir.join(TARGETS),
        report: dir.join(REPORT_JSON),
    };

    write_result_log(report, File::create(&paths.result_log)?)?;
    write_column(&report.y_pred, File::create(&paths.predictions)?)?;
    write_column(&report.y_test, File::create(&paths.targets)?)?;
    serde_json::to_writer_pretty(File::create(&paths.report)?, report)?;

    tracing::info!(dir = %dir.display(), "results written");
    Ok(paths)
}

pub fn write_result_log<W: Write>(report: &ExperimentReport, writer: W) -> Result<(), RcError> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    let params = &report.parameters;

    let mut header = vec!["reservoir".to_string()];
    let mut values = vec![params.name.clone()];
    for key in GENERAL_COLUMNS {
        header.push(key.to_string());
        values.push(params.value(key).map(|v| v.to_string()).unwrap_or_default());
    }
    wtr.write_record(&header)?;
    wtr.write_record(&values)?;

    if !params.model.is_empty() {
        wtr.write_record(params.model.iter().map(|(k, _)| k.as_str()))?;
        wtr.write_record(params.model.iter().map(|(_, v)| v.to_string()))?;
    }

    wtr.write_record(["Training NRMSE", "Testing NRMSE"])?;
    wtr.write_record([report.train_nrmse.to_string(), report.test_nrmse.to_string()])?;
    wtr.flush()?;
    Ok(())
}

/// One value per line, no header.
pub fn write_column<W: Write>(values: &[f64], writer: W) -> Result<(), RcError> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    for v in values {
        wtr.write_record([v.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Error types for the reservoir engine.

use std::fmt;

use delayrc_field::ConfigError;
use serde::Serialize;
use thiserror::Error;

/// Failure of a simulation, training or I/O operation.
#[derive(Debug, Error)]
pub enum RcError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Dimensions of two operands disagree.
    #[error("shape mismatch in {what}: expected {expected}, got {actual}")]
    Shape {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The least-squares system has no unique solution.
    #[error("state matrix is rank deficient: rank {rank} < {columns} columns (use ridge_alpha)")]
    SingularSystem { rank: usize, columns: usize },

    /// A regression operand holds NaN or an infinity.
    #[error("non-finite value {value} in {what} at row {row}, column {column}")]
    NonFinite {
        what: &'static str,
        row: usize,
        column: usize,
        value: f64,
    },

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RcError {
    pub fn shape(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::Shape {
            what,
            expected,
            actual,
        }
    }
}

/// Simulation phase a state matrix was collected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Init,
    Train,
    Test,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Init => "init",
            Phase::Train => "train",
            Phase::Test => "test",
        })
    }
}

/// A non-finite virtual-node sample. Non-fatal: the run continues and the
/// value is carried into the state matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericInstabilityWarning {
    /// Phase the sample was taken in, when driven through a pipeline
    pub phase: Option<Phase>,
    /// Input index
    pub row: usize,
    /// Virtual node index
    pub column: usize,
    pub value: f64,
}

impl fmt::Display for NumericInstabilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "non-finite reservoir state {} at ", self.value)?;
        if let Some(phase) = self.phase {
            write!(f, "{} ", phase)?;
        }
        write!(f, "sample {}, node {}", self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: RcError = ConfigError::invalid("beta", "bad").into();
        assert!(matches!(err, RcError::Config(_)));
        assert!(err.to_string().contains("beta"));
    }

    #[test]
    fn test_warning_display() {
        let w = NumericInstabilityWarning {
            phase: Some(Phase::Train),
            row: 3,
            column: 7,
            value: f64::NAN,
        };
        assert_eq!(w.to_string(), "non-finite reservoir state NaN at train sample 3, node 7");
        let w = NumericInstabilityWarning { phase: None, ..w };
        assert_eq!(w.to_string(), "non-finite reservoir state NaN at sample 3, node 7");
    }
}

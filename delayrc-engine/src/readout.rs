// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Virtual-node state matrices and the linear readout.
//!
//! A [`StateMatrix`] has one row per input sample and `num_nodes + 1`
//! columns: the sampled virtual-node states followed by a constant bias 1.
//! The readout is a plain dot product of a row with [`ReadoutWeights`], so
//! the bias weight plays the role of an intercept.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{NumericInstabilityWarning, RcError};

// ─── State Matrix ────────────────────────────────────

/// Row-major `rows × cols` matrix of virtual-node samples.
#[derive(Debug, Clone, PartialEq)]
pub struct StateMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
    instability: Option<NumericInstabilityWarning>,
}

impl StateMatrix {
    /// Wrap row-major data. Fails if `data.len() != rows * cols`.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, RcError> {
        if data.len() != rows * cols {
            return Err(RcError::shape("state matrix data", rows * cols, data.len()));
        }
        Ok(Self {
            data,
            rows,
            cols,
            instability: None,
        })
    }

    /// Build from rows of equal length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, RcError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(RcError::shape("state matrix row", cols, row.len()));
            }
            data.extend_from_slice(row);
        }
        Self::from_row_major(rows.len(), cols, data)
    }

    pub(crate) fn with_instability(mut self, warning: Option<NumericInstabilityWarning>) -> Self {
        self.instability = warning;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Number of virtual-node columns (excludes the bias column).
    pub fn num_nodes(&self) -> usize {
        self.cols.saturating_sub(1)
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.cols.max(1))
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Whether the last column is the constant bias 1.
    pub fn has_bias_column(&self) -> bool {
        self.cols > 0 && self.iter_rows().all(|r| r[self.cols - 1] == 1.0)
    }

    /// `(row, column, value)` of the first NaN or infinite entry.
    pub fn first_non_finite(&self) -> Option<(usize, usize, f64)> {
        self.data
            .iter()
            .position(|v| !v.is_finite())
            .map(|i| (i / self.cols, i % self.cols, self.data[i]))
    }

    /// Instability recorded while the matrix was collected.
    pub fn instability(&self) -> Option<&NumericInstabilityWarning> {
        self.instability.as_ref()
    }

    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_slice(self.rows, self.cols, &self.data)
    }
}

// ─── Readout Weights ─────────────────────────────────

/// How a set of readout weights was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum FitMethod {
    /// Exact least squares
    Linear,
    /// Ridge regression with penalty `alpha`
    Ridge { alpha: f64 },
}

/// Trained readout: one weight per virtual node plus the bias weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadoutWeights {
    weights: Vec<f64>,
    method: FitMethod,
}

impl ReadoutWeights {
    pub fn new(weights: Vec<f64>, method: FitMethod) -> Self {
        Self { weights, method }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    pub fn method(&self) -> FitMethod {
        self.method
    }

    /// Weight of the bias column.
    pub fn bias(&self) -> Option<f64> {
        self.weights.last().copied()
    }

    /// See [`predict`].
    pub fn predict(&self, states: &StateMatrix) -> Result<Vec<f64>, RcError> {
        predict(states, self)
    }
}

/// Row-wise dot product of `states` with `weights`.
pub fn predict(states: &StateMatrix, weights: &ReadoutWeights) -> Result<Vec<f64>, RcError> {
    if states.cols() != weights.len() {
        return Err(RcError::shape("readout weights", states.cols(), weights.len()));
    }
    Ok(states
        .iter_rows()
        .map(|row| row.iter().zip(weights.as_slice()).map(|(s, w)| s * w).sum())
        .collect())
}

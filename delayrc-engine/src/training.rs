// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Closed-form readout training.
//!
//! Two solvers over a state matrix `S` (L × D, bias column included) and a
//! target vector `y` (L):
//!
//! - **Linear**: exact least squares `argmin ‖S·w − y‖²` via SVD. A
//!   rank-deficient `S` is an error, never a silent minimum-norm fallback.
//! - **Ridge**: `w = (SᵀS + αI)⁺ · Sᵀy` with `⁺` the Moore–Penrose
//!   pseudo-inverse. The bias column is penalised like any other.

use delayrc_field::ConfigError;
use nalgebra::{DMatrix, DVector};

use crate::error::RcError;
use crate::readout::{FitMethod, ReadoutWeights, StateMatrix};

// ─── Solvers ─────────────────────────────────────────

/// Exact least-squares readout.
pub fn fit_linear(states: &StateMatrix, target: &[f64]) -> Result<ReadoutWeights, RcError> {
    check_system(states, target)?;
    let cols = states.cols();

    let svd = states.to_dmatrix().svd(true, true);
    let tol = rank_tolerance(&svd.singular_values, states.rows(), cols);
    let rank = svd.singular_values.iter().filter(|&&s| s > tol).count();
    if rank < cols {
        return Err(RcError::SingularSystem {
            rank,
            columns: cols,
        });
    }

    let b = DVector::from_column_slice(target);
    let w = svd
        .solve(&b, tol)
        .map_err(|_| RcError::SingularSystem { rank, columns: cols })?;
    tracing::debug!(rank, columns = cols, "least-squares readout solved");
    Ok(ReadoutWeights::new(w.iter().copied().collect(), FitMethod::Linear))
}

/// Ridge-regularised readout.
pub fn fit_ridge(
    states: &StateMatrix,
    target: &[f64],
    alpha: f64,
) -> Result<ReadoutWeights, RcError> {
    if !alpha.is_finite() || alpha < 0.0 {
        return Err(ConfigError::invalid(
            "ridge_alpha",
            format!("must be finite and >= 0, got {}", alpha),
        )
        .into());
    }
    check_system(states, target)?;
    let cols = states.cols();

    let s = states.to_dmatrix();
    let st = s.transpose();
    let normal = &st * &s + DMatrix::<f64>::identity(cols, cols) * alpha;
    let rhs = &st * DVector::from_column_slice(target);

    let svd = normal.svd(true, true);
    let tol = rank_tolerance(&svd.singular_values, cols, cols);
    let pinv = svd
        .pseudo_inverse(tol)
        .map_err(|_| RcError::SingularSystem { rank: 0, columns: cols })?;
    let w = pinv * rhs;
    Ok(ReadoutWeights::new(
        w.iter().copied().collect(),
        FitMethod::Ridge { alpha },
    ))
}

/// Shapes must agree and every entry must be finite: the SVD does not
/// terminate on NaN input.
fn check_system(states: &StateMatrix, target: &[f64]) -> Result<(), RcError> {
    if states.is_empty() {
        return Err(RcError::shape("state matrix rows", 1, 0));
    }
    if states.rows() != target.len() {
        return Err(RcError::shape("regression targets", states.rows(), target.len()));
    }
    if let Some((row, column, value)) = states.first_non_finite() {
        return Err(RcError::NonFinite {
            what: "state matrix",
            row,
            column,
            value,
        });
    }
    if let Some(row) = target.iter().position(|y| !y.is_finite()) {
        return Err(RcError::NonFinite {
            what: "regression targets",
            row,
            column: 0,
            value: target[row],
        });
    }
    Ok(())
}

/// Singular values at or below `max(m, n) · σ_max · ε` count as zero.
fn rank_tolerance(singular_values: &DVector<f64>, rows: usize, cols: usize) -> f64 {
    let s_max = singular_values.iter().copied().fold(0.0, f64::max);
    rows.max(cols) as f64 * s_max * f64::EPSILON
}

// ─── Readout Trainer ─────────────────────────────────

/// Picks the solver: ridge when a penalty is configured, exact least
/// squares otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReadoutTrainer {
    pub ridge_alpha: Option<f64>,
}

impl ReadoutTrainer {
    pub fn new(ridge_alpha: Option<f64>) -> Self {
        Self { ridge_alpha }
    }

    pub fn fit(&self, states: &StateMatrix, target: &[f64]) -> Result<ReadoutWeights, RcError> {
        match self.ridge_alpha {
            Some(alpha) => {
                tracing::info!(alpha, rows = states.rows(), "training ridge readout");
                fit_ridge(states, target, alpha)
            }
            None => {
                tracing::info!(rows = states.rows(), "training least-squares readout");
                fit_linear(states, target)
            }
        }
    }
}

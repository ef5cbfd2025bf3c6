// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Error metrics and summary statistics.

use crate::error::RcError;

/// Root-mean-square error between `predicted` and `target`.
///
/// Not divided by the target spread. The benchmark series is z-scored before
/// use, so on that data it equals the normalised error.
pub fn nrmse(predicted: &[f64], target: &[f64]) -> Result<f64, RcError> {
    if predicted.len() != target.len() {
        return Err(RcError::shape("nrmse inputs", target.len(), predicted.len()));
    }
    if target.is_empty() {
        return Err(RcError::shape("nrmse inputs", 1, 0));
    }
    let sq: f64 = predicted
        .iter()
        .zip(target)
        .map(|(p, y)| (p - y) * (p - y))
        .sum();
    Ok((sq / target.len() as f64).sqrt())
}

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample standard deviation (`n - 1` denominator). Zero for fewer than two
/// samples.
pub fn sample_std(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    let ss: f64 = xs.iter().map(|x| (x - m) * (x - m)).sum();
    (ss / (xs.len() - 1) as f64).sqrt()
}

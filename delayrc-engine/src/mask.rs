// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Input mask: one scaling coefficient per virtual node.

use delayrc_field::NoiseSource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    coefficients: Vec<f64>,
}

impl Mask {
    /// Draw `num_nodes` coefficients uniformly from `[-0.5, 0.5)`.
    pub fn random(num_nodes: usize, noise: &mut NoiseSource) -> Self {
        let coefficients = (0..num_nodes).map(|_| noise.uniform() - 0.5).collect();
        Self { coefficients }
    }

    pub fn from_vec(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.coefficients
    }
}

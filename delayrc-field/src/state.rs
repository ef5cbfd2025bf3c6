// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Scalar node state: real (`f64`) or complex (`Complex<f64>`).
//!
//! The integrator is written once against `NodeState`. The only place the
//! two representations differ is the noise term: a real state consumes one
//! standard-normal draw per step, a complex state consumes two (real and
//! imaginary parts drawn independently).

use std::fmt::Debug;
use std::ops::{Add, Mul};

use num_complex::Complex;

use crate::noise::NoiseSource;

/// State variable of the nonlinear node.
pub trait NodeState:
    Copy + Debug + PartialEq + Add<Output = Self> + Mul<f64, Output = Self> + Send + Sync + 'static
{
    /// Embed a real value.
    fn from_real(x: f64) -> Self;

    /// Draw a unit-variance noise term of this type.
    fn sample_noise(noise: &mut NoiseSource) -> Self;

    /// Real part.
    fn real(self) -> f64;

    /// Whether every component is finite.
    fn is_finite(self) -> bool;
}

impl NodeState for f64 {
    fn from_real(x: f64) -> Self {
        x
    }

    fn sample_noise(noise: &mut NoiseSource) -> Self {
        noise.standard_normal()
    }

    fn real(self) -> f64 {
        self
    }

    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

impl NodeState for Complex<f64> {
    fn from_real(x: f64) -> Self {
        Complex::new(x, 0.0)
    }

    fn sample_noise(noise: &mut NoiseSource) -> Self {
        let re = noise.standard_normal();
        let im = noise.standard_normal();
        Complex::new(re, im)
    }

    fn real(self) -> f64 {
        self.re
    }

    fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

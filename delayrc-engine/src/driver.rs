// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Virtual-node driver and the phase-ordered simulation pipeline.
//!
//! Time multiplexing: each input sample `u[k]` is spread over `num_nodes`
//! consecutive intervals of length `theta`. During interval `n` the node is
//! driven with the constant `mask[n] · u[k]` for `steps_per_node`
//! integration steps, then sampled. The `num_nodes` samples plus a bias 1
//! form row `k` of the state matrix.
//!
//! [`Pipeline`] owns the model, its noise stream and the mask, and encodes
//! the run order washout → training → testing in its type parameter:
//!
//! ```text
//! Pipeline<R, Fresh> ──warm_up──▶ Pipeline<R, WarmedUp>
//!     ──collect_training──▶ Pipeline<R, Trained> ──collect_testing──▶ Pipeline<R, Finished>
//! ```

use std::marker::PhantomData;

use delayrc_field::{EulerMaruyama, NoiseSource, Reservoir};

use crate::error::{NumericInstabilityWarning, Phase, RcError};
use crate::mask::Mask;
use crate::readout::StateMatrix;

// ─── Driver ──────────────────────────────────────────

/// Drive `model` with `input` through `mask` and collect the state matrix.
///
/// Continues from the model's current state; nothing is reset. A non-finite
/// sample is logged once and flagged on the matrix, but does not stop the
/// run.
pub fn integrate<R: Reservoir + ?Sized>(
    model: &mut R,
    noise: &mut NoiseSource,
    input: &[f64],
    mask: &Mask,
) -> Result<StateMatrix, RcError> {
    drive(model, noise, &mut EulerMaruyama::new(), input, mask, None)
}

/// [`integrate`] for a named phase; warnings carry the phase.
pub fn integrate_phase<R: Reservoir + ?Sized>(
    model: &mut R,
    noise: &mut NoiseSource,
    input: &[f64],
    mask: &Mask,
    phase: Phase,
) -> Result<StateMatrix, RcError> {
    drive(model, noise, &mut EulerMaruyama::new(), input, mask, Some(phase))
}

fn drive<R: Reservoir + ?Sized>(
    model: &mut R,
    noise: &mut NoiseSource,
    solver: &mut EulerMaruyama,
    input: &[f64],
    mask: &Mask,
    phase: Option<Phase>,
) -> Result<StateMatrix, RcError> {
    let num_nodes = model.params().num_nodes;
    if mask.len() != num_nodes {
        return Err(RcError::shape("mask length", num_nodes, mask.len()));
    }
    let steps_per_node = model.params().steps_per_node();
    let cols = num_nodes + 1;

    let mut data = Vec::with_capacity(input.len() * cols);
    let mut first_bad: Option<NumericInstabilityWarning> = None;

    for (k, &u) in input.iter().enumerate() {
        for (n, &m) in mask.as_slice().iter().enumerate() {
            solver.run(model, noise, m * u, steps_per_node);
            let sample = model.readout();
            if first_bad.is_none() && !sample.is_finite() {
                let warning = NumericInstabilityWarning {
                    phase,
                    row: k,
                    column: n,
                    value: sample,
                };
                tracing::warn!(model = model.name(), "{}", warning);
                first_bad = Some(warning);
            }
            data.push(sample);
        }
        data.push(1.0);
    }

    let states = StateMatrix::from_row_major(input.len(), cols, data)?;
    Ok(states.with_instability(first_bad))
}

// ─── Pipeline ────────────────────────────────────────

/// Phase marker: constructed, delay line initialised, nothing integrated.
#[derive(Debug, Clone, Copy)]
pub struct Fresh;
/// Phase marker: washout done.
#[derive(Debug, Clone, Copy)]
pub struct WarmedUp;
/// Phase marker: training states collected.
#[derive(Debug, Clone, Copy)]
pub struct Trained;
/// Phase marker: testing states collected.
#[derive(Debug, Clone, Copy)]
pub struct Finished;

/// A reservoir run in phase `P`.
#[derive(Debug, Clone)]
pub struct Pipeline<R, P> {
    model: R,
    noise: NoiseSource,
    mask: Mask,
    solver: EulerMaruyama,
    _phase: PhantomData<P>,
}

impl<R: Reservoir> Pipeline<R, Fresh> {
    /// Assemble a pipeline from parts. The model is used as is; call
    /// [`Reservoir::init_delay`] beforehand if needed.
    pub fn new(model: R, noise: NoiseSource, mask: Mask) -> Result<Self, RcError> {
        let num_nodes = model.params().num_nodes;
        if mask.len() != num_nodes {
            return Err(RcError::shape("mask length", num_nodes, mask.len()));
        }
        Ok(Self {
            model,
            noise,
            mask,
            solver: EulerMaruyama::new(),
            _phase: PhantomData,
        })
    }

    /// Seed a noise source, draw the mask from it, then initialise the
    /// delay line from the same stream.
    pub fn seeded(mut model: R, seed: u64) -> Self {
        let mut noise = NoiseSource::new(seed);
        let mask = Mask::random(model.params().num_nodes, &mut noise);
        model.init_delay(&mut noise);
        Self {
            model,
            noise,
            mask,
            solver: EulerMaruyama::new(),
            _phase: PhantomData,
        }
    }

    /// Run the washout input and discard its states.
    pub fn warm_up(mut self, input: &[f64]) -> Result<Pipeline<R, WarmedUp>, RcError> {
        tracing::info!(samples = input.len(), "running initial phase");
        self.run(input, Phase::Init)?;
        Ok(self.advance())
    }
}

impl<R: Reservoir> Pipeline<R, WarmedUp> {
    /// Collect the training state matrix.
    pub fn collect_training(
        mut self,
        input: &[f64],
    ) -> Result<(Pipeline<R, Trained>, StateMatrix), RcError> {
        tracing::info!(samples = input.len(), "running training phase");
        let states = self.run(input, Phase::Train)?;
        Ok((self.advance(), states))
    }
}

impl<R: Reservoir> Pipeline<R, Trained> {
    /// Collect the testing state matrix. Ends the run.
    pub fn collect_testing(
        mut self,
        input: &[f64],
    ) -> Result<(StateMatrix, Pipeline<R, Finished>), RcError> {
        tracing::info!(samples = input.len(), "running testing phase");
        let states = self.run(input, Phase::Test)?;
        Ok((states, self.advance()))
    }
}

impl<R: Reservoir, P> Pipeline<R, P> {
    pub fn model(&self) -> &R {
        &self.model
    }

    pub fn noise(&self) -> &NoiseSource {
        &self.noise
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Simulated time so far.
    pub fn elapsed(&self) -> f64 {
        self.solver.time
    }

    /// Integration steps so far.
    pub fn steps(&self) -> u64 {
        self.solver.steps
    }

    pub fn into_parts(self) -> (R, NoiseSource, Mask) {
        (self.model, self.noise, self.mask)
    }

    fn run(&mut self, input: &[f64], phase: Phase) -> Result<StateMatrix, RcError> {
        drive(
            &mut self.model,
            &mut self.noise,
            &mut self.solver,
            input,
            &self.mask,
            Some(phase),
        )
    }

    fn advance<Q>(self) -> Pipeline<R, Q> {
        Pipeline {
            model: self.model,
            noise: self.noise,
            mask: self.mask,
            solver: self.solver,
            _phase: PhantomData,
        }
    }
}

impl<R: Reservoir + Clone, P: Clone> Pipeline<R, P> {
    /// Copy of the complete simulation state, noise stream included.
    /// Continuing the copy reproduces what this pipeline would do.
    pub fn checkpoint(&self) -> Self {
        self.clone()
    }
}

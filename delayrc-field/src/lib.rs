// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

pub mod noise;
pub mod state;
pub mod delay_line;
pub mod params;
pub mod reservoir;
pub mod ikeda;
pub mod linear;
pub mod integrator;

pub use noise::NoiseSource;
pub use state::NodeState;
pub use delay_line::DelayLine;
pub use params::{ConfigError, ParameterMap, ParameterSet, ReservoirParams, StepPolicy};
pub use reservoir::{DelayInit, ParameterReport, Reservoir, ReservoirCore};
pub use ikeda::{Ikeda, IkedaParams};
pub use linear::{ComplexLinearReservoir, LinearParams, LinearReservoir};
pub use integrator::EulerMaruyama;

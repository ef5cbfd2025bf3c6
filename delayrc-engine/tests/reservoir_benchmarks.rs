// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Delay reservoir benchmarks and end-to-end checks.
//!
//! 1. Ikeda relaxation toward its fixed point under zero input
//! 2. State matrix structure and reproducibility
//! 3. Readout solvers on real reservoir states
//! 4. Shape errors across the public API
//! 5. Mackey-Glass τ=17 prediction, full pipeline
//!
//! Run with: `cargo test -p delayrc-engine --test reservoir_benchmarks -- --nocapture`

use delayrc_engine::{
    dataset::{normalize, split_phases},
    fit_linear, fit_ridge, integrate, mackey_glass, metrics::sample_std, nrmse, predict,
    run_experiment, ExperimentConfig, FitMethod, Mask, Pipeline, RcError, ReadoutWeights,
    ReservoirKind, StateMatrix,
};
use delayrc_field::{
    integrator, ComplexLinearReservoir, Ikeda, LinearParams, LinearReservoir, NoiseSource,
    ParameterMap, Reservoir, ReservoirParams,
};

// ═══════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════

fn small_ikeda(noise_amp: f64) -> Ikeda {
    let mut rc = Ikeda::new();
    rc.set_parameters(
        &ParameterMap::new()
            .with("num_nodes", 12)
            .with("theta", 0.3)
            .with("integ_step", 0.05)
            .with("delay", 4.0)
            .with("noise_amp", noise_amp),
    )
    .unwrap();
    rc
}

fn sine_input(n: usize) -> Vec<f64> {
    (0..n).map(|k| (0.21 * k as f64).sin() + 0.3 * (0.05 * k as f64).cos()).collect()
}

// ═══════════════════════════════════════════════════════════
// 1. Ikeda fixed point
// ═══════════════════════════════════════════════════════════

#[test]
fn test_ikeda_relaxation_under_zero_input() {
    println!("\n=== Ikeda relaxation, u ≡ 0, 100 steps ===");
    let mut rc = Ikeda::new();
    rc.set_parameters(
        &ParameterMap::new()
            .with("num_nodes", 50)
            .with("theta", 1.4)
            .with("integ_step", 0.01)
            .with("delay", 80)
            .with("noise_amp", 0),
    )
    .unwrap();
    let mut noise = NoiseSource::new(0);
    rc.init_delay(&mut noise);

    // For the first 8000 steps the delayed state is the constant history
    // 0.1, so the node relaxes linearly toward z* with -ε z* + β sin²(0.1 + φ) = 0
    let p = rc.model_params().clone();
    let z_star = p.beta * (0.1 + p.phi).sin().powi(2) / p.epsilon;
    let decay = 1.0 - p.epsilon * 0.01;

    let mut gap = (0.1 - z_star).abs();
    for n in 1..=100 {
        let z = integrator::step(&mut rc, &mut noise, 0.0);
        let expected = z_star + (0.1 - z_star) * decay.powi(n);
        assert!((z - expected).abs() < 1e-12, "step {}: {} vs {}", n, z, expected);
        let next_gap = (z - z_star).abs();
        assert!(next_gap < gap, "not contracting at step {}", n);
        gap = next_gap;
    }
    println!("  z* = {:.6}, z_100 = {:.6}, gap = {:.3e}", z_star, rc.z_t(), gap);
    assert_eq!(noise.normal_draws(), 100);
    assert_eq!(rc.delay_line().len(), 8000);
}

#[test]
fn test_ikeda_converges_to_delayed_fixed_point() {
    // Short delay: the feedback loop closes quickly and z(t) = z(t - τ) = z*
    let mut rc = Ikeda::new();
    rc.set_parameters(
        &ParameterMap::new()
            .with("delay", 1.0)
            .with("integ_step", 0.01)
            .with("noise_amp", 0),
    )
    .unwrap();
    let mut noise = NoiseSource::new(0);
    rc.init_delay(&mut noise);

    integrator::hold(&mut rc, &mut noise, 0.0, 5000);
    let z = rc.z_t();
    let residual = rc.equilibrium_residual(z);
    println!("  z* = {:.9}, residual = {:.3e}", z, residual);
    assert!(residual.abs() < 1e-6, "residual {}", residual);
    assert!(rc.delay_line().iter().all(|zd| (zd - z).abs() < 1e-5));
}

// ═══════════════════════════════════════════════════════════
// 2. State matrix
// ═══════════════════════════════════════════════════════════

#[test]
fn test_state_matrix_structure() {
    let input = sine_input(30);
    for nodes in [1, 7, 12] {
        let mut rc = small_ikeda(1e-3);
        rc.set_parameters(&ParameterMap::new().with("num_nodes", nodes)).unwrap();
        let mut noise = NoiseSource::new(1);
        let mask = Mask::random(nodes, &mut noise);
        let states = integrate(&mut rc, &mut noise, &input, &mask).unwrap();
        assert_eq!(states.rows(), 30);
        assert_eq!(states.cols(), nodes + 1);
        assert!(states.has_bias_column());
        assert!(states.first_non_finite().is_none());
    }
}

#[test]
fn test_same_seed_same_states() {
    let run = |seed: u64| {
        let pipeline = Pipeline::seeded(small_ikeda(0.01), seed)
            .warm_up(&sine_input(10))
            .unwrap();
        let (trained, train) = pipeline.collect_training(&sine_input(40)).unwrap();
        let (test, _) = trained.collect_testing(&sine_input(15)).unwrap();
        (train, test)
    };
    let (a_train, a_test) = run(17);
    let (b_train, b_test) = run(17);
    assert_eq!(a_train, b_train);
    assert_eq!(a_test, b_test);

    let (c_train, _) = run(18);
    assert_ne!(a_train, c_train);
}

#[test]
fn test_zero_noise_seed_only_moves_mask() {
    // Same mask, different noise seeds, no noise: identical trajectories
    let mask = Mask::random(12, &mut NoiseSource::new(3));
    let input = sine_input(25);
    let mut a = small_ikeda(0.0);
    let mut b = small_ikeda(0.0);
    let sa = integrate(&mut a, &mut NoiseSource::new(1), &input, &mask).unwrap();
    let sb = integrate(&mut b, &mut NoiseSource::new(2), &input, &mask).unwrap();
    assert_eq!(sa, sb);
}

#[test]
fn test_delay_line_length_invariant() {
    let mut rc = small_ikeda(0.01);
    let mut noise = NoiseSource::new(0);
    let mask = Mask::random(12, &mut noise);
    rc.init_delay(&mut noise);
    assert_eq!(rc.delay_line().len(), rc.params().steps_per_delay());

    integrate(&mut rc, &mut noise, &sine_input(20), &mask).unwrap();
    assert_eq!(rc.delay_line().len(), 80);

    rc.set_parameters(&ParameterMap::new().with("delay", 6.0)).unwrap();
    assert_eq!(rc.delay_line().len(), 120);
    integrate(&mut rc, &mut noise, &sine_input(5), &mask).unwrap();
    assert_eq!(rc.delay_line().len(), 120);
}

#[test]
fn test_complex_reservoir_consumes_two_draws_per_step() {
    let params = ReservoirParams {
        delay: 1.0,
        num_nodes: 3,
        theta: 0.1,
        integ_step: 0.05,
        noise_amp: 0.1,
        ..ReservoirParams::default()
    };
    let linear = LinearParams {
        input_gain: 1.0,
        ..LinearParams::default()
    };
    let mask = Mask::from_vec(vec![0.3, -0.2, 0.1]);
    let input = sine_input(4);

    let mut real = LinearReservoir::<f64>::with_params(params.clone(), linear.clone()).unwrap();
    let mut noise = NoiseSource::new(0);
    integrate(&mut real, &mut noise, &input, &mask).unwrap();
    // 4 samples × 3 nodes × 2 steps
    assert_eq!(noise.normal_draws(), 24);

    let mut complex = ComplexLinearReservoir::with_params(params, linear).unwrap();
    let mut noise = NoiseSource::new(0);
    integrate(&mut complex, &mut noise, &input, &mask).unwrap();
    assert_eq!(noise.normal_draws(), 48);
}

// ═══════════════════════════════════════════════════════════
// 3. Readout on reservoir states
// ═══════════════════════════════════════════════════════════

fn collected_states() -> (StateMatrix, Vec<f64>) {
    let input = sine_input(200);
    let (_, states) = Pipeline::seeded(small_ikeda(1e-3), 5)
        .warm_up(&sine_input(20))
        .unwrap()
        .collect_training(&input)
        .unwrap();
    let target: Vec<f64> = input.iter().map(|u| 0.5 * u * u - 0.2 * u).collect();
    (states, target)
}

#[test]
fn test_ridge_zero_equals_linear_on_reservoir_states() {
    let (states, target) = collected_states();
    let lin = fit_linear(&states, &target).unwrap();
    let ridge = fit_ridge(&states, &target, 0.0).unwrap();

    let p_lin = predict(&states, &lin).unwrap();
    let p_ridge = predict(&states, &ridge).unwrap();
    let diff = nrmse(&p_lin, &p_ridge).unwrap();
    println!("  linear vs ridge(0) prediction gap = {:.3e}", diff);
    assert!(diff < 1e-5);
    assert_eq!(ridge.method(), FitMethod::Ridge { alpha: 0.0 });
}

#[test]
fn test_training_error_and_prediction_purity() {
    let (states, target) = collected_states();
    let w = fit_ridge(&states, &target, 1e-8).unwrap();
    let first = predict(&states, &w).unwrap();
    let second = predict(&states, &w).unwrap();
    assert_eq!(first, second);

    let err = nrmse(&first, &target).unwrap();
    let baseline = sample_std(&target);
    println!("  quadratic task NRMSE = {:.4} (target std {:.4})", err, baseline);
    assert!(err.is_finite());
    assert!(err < baseline, "readout no better than the mean: {} vs {}", err, baseline);
}

// ═══════════════════════════════════════════════════════════
// 4. Shape errors
// ═══════════════════════════════════════════════════════════

#[test]
fn test_shape_errors() {
    let (states, target) = collected_states();
    let short = &target[..target.len() - 1];

    assert!(matches!(fit_linear(&states, short), Err(RcError::Shape { .. })));
    assert!(matches!(fit_ridge(&states, short, 0.1), Err(RcError::Shape { .. })));

    let w = ReadoutWeights::new(vec![0.0; states.cols() - 1], FitMethod::Linear);
    assert!(matches!(predict(&states, &w), Err(RcError::Shape { .. })));

    assert!(matches!(nrmse(&[1.0, 2.0], &[1.0]), Err(RcError::Shape { .. })));

    let mut rc = small_ikeda(0.0);
    let wrong_mask = Mask::from_vec(vec![0.1; 11]);
    assert!(matches!(
        integrate(&mut rc, &mut NoiseSource::new(0), &[0.5], &wrong_mask),
        Err(RcError::Shape { expected: 12, actual: 11, .. })
    ));
}

// ═══════════════════════════════════════════════════════════
// 5. Mackey-Glass τ=17, full pipeline
// ═══════════════════════════════════════════════════════════

#[test]
fn test_mackey_glass_prediction() {
    println!("\n=== Mackey-Glass τ=17, 17-step prediction ===");
    let series = mackey_glass(2100, 42);
    let config = ExperimentConfig {
        reservoir: ReservoirKind::Ikeda,
        init_length: 200,
        train_length: 1500,
        test_length: 300,
        ..ExperimentConfig::default()
    };

    let report = run_experiment(&config, &series).unwrap();
    let normalized = normalize(&series).unwrap();
    let test_std = sample_std(&split_phases(&normalized, &config).unwrap().test_target);

    println!("  Training NRMSE = {:.4}", report.train_nrmse);
    println!("  Testing NRMSE  = {:.4}", report.test_nrmse);
    println!("  test target std = {:.4}", test_std);

    assert!(report.train_nrmse.is_finite());
    assert!(report.test_nrmse.is_finite());
    assert!(report.instabilities.is_empty());
    assert_eq!(report.weights.method(), FitMethod::Linear);
    assert_eq!(report.y_pred.len(), 300);
    assert!(
        report.test_nrmse < test_std,
        "test NRMSE {} not below target std {}",
        report.test_nrmse,
        test_std
    );
}

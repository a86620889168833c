//! Integration tests for the FIRE optimizer

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use relaxopt_core::{
    callback::{HistoryCallback, StopAfter},
    error::OptimizerError,
    optimizer::{Optimizer, TerminationReason},
    potential::{CountingPotential, FnPotential, Potential},
    potentials::{Harmonic, LennardJones},
    test_utils::{random_cluster, ConstantForce, NanAfter},
    types::DVector,
};
use relaxopt_optim::{Fire, FireConfig, StepNorm};

fn square() -> impl Potential<f64> {
    FnPotential::new(|x: &DVector<f64>| (x.dot(x), x * 2.0))
}

#[test]
fn test_zero_gradient_converges_immediately() {
    let flat = CountingPotential::new(FnPotential::new(|x: &DVector<f64>| {
        (0.0, DVector::zeros(x.len()))
    }));
    let x0 = DVector::from_vec(vec![0.0, 0.0]);
    let mut fire = Fire::with_defaults(x0.clone(), &flat).unwrap();

    let result = fire.run(1e-3, 100).unwrap();

    assert_eq!(result.termination_reason, TerminationReason::Converged);
    assert!(result.converged);
    assert_eq!(result.iterations, 0);
    assert_eq!(result.function_evaluations, 1);
    assert_eq!(result.point, x0);
    assert_eq!(result.energy, 0.0);
    assert_eq!(flat.counts(), (0, 1));
}

#[test]
fn test_budget_exhaustion() {
    let constant = CountingPotential::new(ConstantForce::new(DVector::from_vec(vec![1.0, -1.0])));
    let mut fire = Fire::with_defaults(DVector::zeros(2), &constant).unwrap();

    let result = fire.run(1e-3, 5).unwrap();

    assert_eq!(result.termination_reason, TerminationReason::MaxIterations);
    assert!(!result.converged);
    assert_eq!(result.iterations, 5);
    assert_eq!(result.function_evaluations, 5);
    assert_eq!(constant.counts().1, 5);
    assert_relative_eq!(result.rms_force, 1.0);
    assert_eq!(fire.total_steps(), 5);
}

#[test]
fn test_square_well_end_to_end() {
    let mut fire = Fire::with_defaults(DVector::from_vec(vec![10.0]), square()).unwrap();
    let result = fire.run(1e-3, 10_000).unwrap();

    assert!(result.converged);
    assert!(result.point[0].abs() < 1e-2);
    assert!(result.rms_force < 1e-3);
    assert!(result.iterations > 0);

    // Deterministic: an identical run takes identical steps
    let mut again = Fire::with_defaults(DVector::from_vec(vec![10.0]), square()).unwrap();
    let repeat = again.run(1e-3, 10_000).unwrap();
    assert_eq!(repeat.iterations, result.iterations);
    assert_eq!(repeat.point, result.point);
}

#[test]
fn test_harmonic_well_reaches_origin() {
    let origin = DVector::from_vec(vec![1.0, 2.0, -3.0, 0.5]);
    let well = Harmonic::new(origin.clone(), 3.0).unwrap();
    let mut fire = Fire::with_defaults(DVector::zeros(4), well).unwrap();

    let result = fire.run(1e-8, 10_000).unwrap();

    assert!(result.converged);
    assert_relative_eq!(result.point, origin, epsilon = 1e-7);
    assert!(result.energy < 1e-14);
}

#[test]
fn test_lennard_jones_dimer() {
    let lj = LennardJones::<f64>::default();
    let x0 = DVector::from_vec(vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.5]);
    let mut fire = Fire::new(x0, lj, FireConfig::new().with_max_move(0.1)).unwrap();

    let result = fire.run(1e-8, 10_000).unwrap();
    let p = &result.point;
    let r = ((p[3] - p[0]).powi(2) + (p[4] - p[1]).powi(2) + (p[5] - p[2]).powi(2)).sqrt();

    assert!(result.converged);
    assert_relative_eq!(r, lj.equilibrium_distance(), epsilon = 1e-6);
    assert_relative_eq!(result.energy, -1.0, epsilon = 1e-10);
}

#[test]
fn test_lennard_jones_cluster_relaxes() {
    let lj = LennardJones::<f64>::default();
    let x0 = random_cluster(8, 1.12, 0.1, 2012);
    let initial_energy = lj.energy(&x0).unwrap();

    let config = FireConfig::new().with_max_move(0.1);
    let mut fire = Fire::new(x0, lj, config).unwrap();
    let result = fire.run(1e-3, 20_000).unwrap();

    assert!(result.converged, "rms force {}", result.rms_force);
    assert!(result.energy < initial_energy);
    assert_relative_eq!(lj.energy(&result.point).unwrap(), result.energy, epsilon = 1e-6);
}

#[test]
fn test_non_finite_energy_aborts() {
    let mut fire = Fire::with_defaults(DVector::from_vec(vec![3.0, 4.0]), NanAfter::new(3)).unwrap();

    let err = fire.run(1e-6, 100).unwrap_err();
    match err {
        OptimizerError::NumericalError { iteration, .. } => assert_eq!(iteration, 3),
        other => panic!("expected NumericalError, got {other:?}"),
    }
}

#[test]
fn test_non_finite_gradient_aborts() {
    let broken = FnPotential::new(|x: &DVector<f64>| {
        let mut g = x * 2.0;
        g[0] = f64::INFINITY;
        (x.dot(x), g)
    });
    let mut fire = Fire::with_defaults(DVector::from_vec(vec![1.0, 1.0]), broken).unwrap();

    let err = fire.run(1e-6, 10).unwrap_err();
    assert!(matches!(err, OptimizerError::NumericalError { iteration: 0, .. }));
    assert_eq!(fire.total_steps(), 0);
}

#[test]
fn test_gradient_length_mismatch_aborts() {
    let short = FnPotential::new(|x: &DVector<f64>| (x.dot(x), DVector::zeros(x.len() - 1)));
    let mut fire = Fire::with_defaults(DVector::from_vec(vec![1.0, 1.0]), short).unwrap();

    let err = fire.run(1e-6, 10).unwrap_err();
    assert!(matches!(err, OptimizerError::InvalidInput { .. }));
}

#[test]
fn test_potential_error_propagates() {
    let lj = LennardJones::<f64>::default();
    let mut fire = Fire::with_defaults(DVector::from_vec(vec![0.0; 6]), lj).unwrap();

    let err = fire.run(1e-6, 10).unwrap_err();
    assert!(matches!(err, OptimizerError::Potential(_)));
}

#[test]
fn test_invalid_configurations_are_rejected() {
    let cases: Vec<(&str, FireConfig<f64>)> = vec![
        ("dt", FireConfig::new().with_dt(0.0)),
        ("dt", FireConfig::new().with_dt(2.0)),
        ("max_move", FireConfig::new().with_max_move(-0.5)),
        ("dt_max", FireConfig::new().with_dt_max(f64::INFINITY)),
        ("n_min", FireConfig::new().with_n_min(0)),
        ("f_inc", FireConfig::new().with_f_inc(1.0)),
        ("f_dec", FireConfig::new().with_f_dec(1.0)),
        ("f_dec", FireConfig::new().with_f_dec(0.0)),
        ("alpha_start", FireConfig::new().with_alpha_start(f64::NAN)),
        ("f_alpha", FireConfig::new().with_f_alpha(1.5)),
        ("alpha", FireConfig::new().with_alpha(0.2)),
    ];

    for (expected, config) in cases {
        let err = Fire::new(DVector::from_vec(vec![1.0]), square(), config).unwrap_err();
        match err {
            OptimizerError::InvalidConfiguration { parameter, .. } => {
                assert_eq!(parameter, expected)
            }
            other => panic!("expected InvalidConfiguration for {expected}, got {other:?}"),
        }
    }
}

#[test]
fn test_invalid_run_arguments_are_rejected() {
    let mut fire = Fire::with_defaults(DVector::from_vec(vec![1.0]), square()).unwrap();

    assert!(matches!(
        fire.run(0.0, 10),
        Err(OptimizerError::InvalidConfiguration { .. })
    ));
    assert!(matches!(
        fire.run(1e-3, 0),
        Err(OptimizerError::InvalidConfiguration { .. })
    ));
    assert_eq!(fire.total_steps(), 0);
}

#[test]
fn test_callback_can_stop_run() {
    let mut fire = Fire::with_defaults(DVector::from_vec(vec![10.0]), square()).unwrap();
    let mut stop = StopAfter::new(3);

    let result = fire.run_with_callback(1e-12, 1000, &mut stop).unwrap();

    assert_eq!(result.termination_reason, TerminationReason::UserTerminated);
    assert_eq!(result.iterations, 3);
    assert!(!result.converged);
}

#[test]
fn test_history_callback_records_descent() {
    let mut fire = Fire::with_defaults(DVector::from_vec(vec![10.0]), square()).unwrap();
    let mut history = HistoryCallback::new();

    let result = fire.run_with_callback(1e-3, 10_000, &mut history).unwrap();

    assert_eq!(history.energies.len(), result.iterations);
    assert_eq!(history.energies[0], 100.0);
    assert!(history.energies.last().copied().unwrap() < 1.0);
    assert!(history.step_sizes.iter().all(|dt| *dt > 0.0 && *dt <= 1.0));
}

#[test]
fn test_each_run_starts_from_rest() {
    let mut fire = Fire::with_defaults(DVector::from_vec(vec![10.0]), square()).unwrap();
    let first = fire.run(1e-3, 20).unwrap();
    assert_eq!(first.termination_reason, TerminationReason::MaxIterations);

    // A fresh optimizer started where the first run stopped behaves identically
    let mut fresh = Fire::with_defaults(first.point.clone(), square()).unwrap();
    let continued = fire.run(1e-3, 10_000).unwrap();
    let restarted = fresh.run(1e-3, 10_000).unwrap();

    assert_eq!(continued.iterations, restarted.iterations);
    assert_eq!(continued.point, restarted.point);
    assert_eq!(fire.total_steps(), first.iterations + continued.iterations);
}

#[test]
fn test_max_component_norm_converges() {
    let config = FireConfig::new().with_step_norm(StepNorm::MaxComponent);
    let mut fire = Fire::new(DVector::from_vec(vec![10.0, -6.0]), square(), config).unwrap();

    let result = fire.run(1e-6, 10_000).unwrap();
    assert!(result.converged);
    assert!(result.point.norm() < 1e-5);
}

fn relax_with<O: Optimizer<f64>>(optimizer: &mut O) -> f64 {
    optimizer.run(1e-6, 10_000).unwrap().energy
}

#[test]
fn test_optimizer_trait() {
    let mut fire = Fire::with_defaults(DVector::from_vec(vec![2.0, 2.0]), square()).unwrap();
    assert_eq!(Optimizer::name(&fire), "FIRE");

    let energy = relax_with(&mut fire);
    assert!(energy < 1e-10);
    assert!(Optimizer::position(&fire).norm() < 1e-5);
}

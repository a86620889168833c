//! Example: relaxing a small Lennard-Jones cluster with FIRE
//!
//! Run with `RUST_LOG=info cargo run --example lj_cluster` to see the
//! progress reported by the logging callback.

use relaxopt::prelude::*;
use relaxopt_core::test_utils::random_cluster;

fn main() -> OptimizerResult<()> {
    env_logger::init();

    let natoms = 13;
    let x0 = random_cluster(natoms, 1.12, 0.15, 42);
    let lj = LennardJones::<f64>::default();

    let initial_energy = lj.energy(&x0)?;
    println!("Lennard-Jones cluster with {natoms} atoms");
    println!("Initial energy: {initial_energy:.6}");

    let config = FireConfig::new().with_max_move(0.1).with_dt_max(0.5);
    let mut fire = Fire::new(x0, &lj, config)?;
    let mut logger = LoggingCallback::new(100);

    let result = fire.run_with_callback(1e-4, 20_000, &mut logger)?;

    println!("Termination: {:?}", result.termination_reason);
    println!("Steps:       {}", result.iterations);
    println!("Final energy: {:.6}", result.energy);
    println!("RMS force:    {:.3e}", result.rms_force);
    println!("Elapsed:      {:?}", result.duration);

    // Check the analytic gradient at the relaxed structure
    let (ok, error) = DerivativeChecker::check_gradient(&lj, &result.point, 1e-5)?;
    println!("Gradient check: {} (max error {error:.2e})", if ok { "passed" } else { "FAILED" });

    Ok(())
}

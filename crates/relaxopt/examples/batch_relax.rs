//! Example: relaxing many independent starting structures in parallel
//!
//! Each start gets its own FIRE instance; the potential is shared read-only.

use relaxopt::prelude::*;
use relaxopt_core::test_utils::random_cluster;

fn main() {
    env_logger::init();

    let lj = LennardJones::<f64>::default();
    let starts: Vec<DVector<f64>> = (0..32).map(|seed| random_cluster(7, 1.12, 0.2, seed)).collect();
    let config = FireConfig::new().with_max_move(0.1);

    let results = relax_batch(&starts, &lj, &config, 1e-4, 20_000);

    let mut energies = Vec::new();
    for (seed, result) in results.iter().enumerate() {
        match result {
            Ok(r) => {
                log::info!("start {seed}: {:?} at energy {:.6}", r.termination_reason, r.energy);
                energies.push(r.energy);
            }
            Err(e) => log::warn!("start {seed} failed: {e}"),
        }
    }

    energies.sort_by(f64::total_cmp);
    println!("Relaxed {} of {} structures", energies.len(), starts.len());
    if let Some(lowest) = energies.first() {
        println!("Lowest energy found: {lowest:.6}");
    }
}

//! Parallel relaxation of independent starting structures.
//!
//! Every start gets its own [`Fire`] instance, so runs share nothing but an
//! immutable reference to the potential.

use crate::fire::{Fire, FireConfig};
use rayon::prelude::*;
use relaxopt_core::{
    error::OptimizerResult,
    optimizer::OptimizationResult,
    potential::Potential,
    types::{DVector, Scalar},
};

/// Relaxes each of `starts` with FIRE, in parallel.
///
/// Results come back in the order of `starts`. A failing run does not
/// affect the others; its error sits in the corresponding slot.
pub fn relax_batch<T, P>(
    starts: &[DVector<T>],
    potential: &P,
    config: &FireConfig<T>,
    fmax: T,
    max_steps: usize,
) -> Vec<OptimizerResult<OptimizationResult<T>>>
where
    T: Scalar,
    P: Potential<T> + Sync,
{
    log::debug!("Relaxing {} structures in parallel", starts.len());

    starts
        .par_iter()
        .map(|x0| {
            let mut fire = Fire::new(x0.clone(), potential, config.clone())?;
            fire.run(fmax, max_steps)
        })
        .collect()
}

//! Optimizer interface and result types.
//!
//! Every relaxation run ends in an [`OptimizationResult`] carrying the final
//! coordinates, the last evaluated energy and why the run stopped.
//! Exhausting the step budget is a [`TerminationReason`], not an error: the
//! caller decides whether an unconverged structure is acceptable.

use crate::{
    error::OptimizerResult,
    types::{stable_norm, DVector, Scalar},
};
use num_traits::Float;
use std::fmt::Debug;
use std::time::Duration;

/// Result of a relaxation run.
#[derive(Debug, Clone)]
pub struct OptimizationResult<T>
where
    T: Scalar,
{
    /// Final coordinates
    pub point: DVector<T>,

    /// Energy at the last evaluated position
    pub energy: T,

    /// RMS force at the last evaluated position
    pub rms_force: T,

    /// Number of optimizer steps taken
    pub iterations: usize,

    /// Number of energy/gradient evaluations
    pub function_evaluations: usize,

    /// Wall-clock time of the run
    pub duration: Duration,

    /// Reason for termination
    pub termination_reason: TerminationReason,

    /// Whether the run converged (the success flag)
    pub converged: bool,
}

impl<T> OptimizationResult<T>
where
    T: Scalar,
{
    /// Creates a new optimization result.
    pub fn new(
        point: DVector<T>,
        energy: T,
        iterations: usize,
        duration: Duration,
        termination_reason: TerminationReason,
    ) -> Self {
        Self {
            point,
            energy,
            rms_force: T::zero(),
            iterations,
            function_evaluations: 0,
            duration,
            termination_reason,
            converged: termination_reason == TerminationReason::Converged,
        }
    }

    /// Sets the RMS force at the last evaluated position.
    pub fn with_rms_force(mut self, rms: T) -> Self {
        self.rms_force = rms;
        self
    }

    /// Sets the function evaluation count.
    pub fn with_function_evaluations(mut self, count: usize) -> Self {
        self.function_evaluations = count;
        self
    }
}

/// Reason for termination of a relaxation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerminationReason {
    /// RMS force dropped below the threshold
    Converged,
    /// Step budget exhausted before convergence
    MaxIterations,
    /// A callback asked the run to stop
    UserTerminated,
}

/// Root-mean-square of a force vector, `‖f‖₂ / √n`.
///
/// Returns zero for an empty vector.
pub fn rms_force<T: Scalar>(forces: &DVector<T>) -> T {
    if forces.is_empty() {
        return T::zero();
    }
    stable_norm(forces) / <T as Float>::sqrt(<T as Scalar>::from_usize(forces.len()))
}

/// Trait for local relaxation algorithms.
///
/// An optimizer owns its coordinates and its potential; `run` drives it to a
/// force-balanced point or until the step budget is spent.
pub trait Optimizer<T>: Debug
where
    T: Scalar,
{
    /// Returns the name of the optimizer.
    fn name(&self) -> &str;

    /// Current coordinates.
    fn position(&self) -> &DVector<T>;

    /// Relaxes until the RMS force drops below `fmax` or `max_steps`
    /// energy/gradient evaluations have been spent.
    fn run(&mut self, fmax: T, max_steps: usize) -> OptimizerResult<OptimizationResult<T>>;
}

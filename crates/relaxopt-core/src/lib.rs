//! Core traits and types for structural relaxation.
//!
//! This crate provides the building blocks shared by relaxation algorithms:
//! the potential energy oracle, result and termination types, callbacks and
//! a couple of reference potentials.
//!
//! # Modules
//!
//! - [`callback`]: Observers for relaxation runs
//! - [`error`]: Error types for potentials and optimizers
//! - [`optimizer`]: Optimizer trait, results and termination reasons
//! - [`potential`]: Potential oracle trait and adapters
//! - [`potentials`]: Reference potentials (harmonic, Lennard-Jones)
//! - [`types`]: Scalar trait and vector aliases

pub mod callback;
pub mod error;
pub mod optimizer;
pub mod potential;
pub mod potentials;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export commonly used items at the crate root
pub use error::{OptimizerError, OptimizerResult, PotentialError, PotentialResult};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use relaxopt_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::callback::{
        HistoryCallback, IterationInfo, LoggingCallback, NoOpCallback, OptimizationCallback,
        StopAfter,
    };
    pub use crate::error::{OptimizerError, OptimizerResult, PotentialError, PotentialResult};
    pub use crate::optimizer::{rms_force, OptimizationResult, Optimizer, TerminationReason};
    pub use crate::potential::{CountingPotential, DerivativeChecker, FnPotential, Potential};
    pub use crate::potentials::{Harmonic, LennardJones};
    pub use crate::types::{stable_norm, DVector, Scalar};
}

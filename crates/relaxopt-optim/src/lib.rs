//! RelaxOpt Optimization - FIRE structural relaxation.
//!
//! This crate provides the Fast Inertial Relaxation Engine, a damped
//! dynamics minimizer for particle systems, together with a helper for
//! relaxing many independent structures in parallel.
//!
//! # Examples
//!
//! ```rust
//! use relaxopt_core::{potentials::LennardJones, types::DVector};
//! use relaxopt_optim::{Fire, FireConfig};
//!
//! // Two Lennard-Jones particles slightly too far apart
//! let x0 = DVector::from_vec(vec![0.0, 0.0, 0.0, 1.4, 0.0, 0.0]);
//! let config = FireConfig::new().with_max_move(0.1);
//! let mut fire = Fire::new(x0, LennardJones::<f64>::default(), config).unwrap();
//!
//! let result = fire.run(1e-6, 10_000).unwrap();
//! assert!(result.converged);
//! assert!((result.energy + 1.0).abs() < 1e-8);
//! ```

pub mod fire;

#[cfg(feature = "parallel")]
pub mod batch;

// Re-export main optimizers for convenience
pub use fire::{Fire, FireConfig, StepNorm};

#[cfg(feature = "parallel")]
pub use batch::relax_batch;

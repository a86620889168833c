//! # RelaxOpt
//!
//! Structural relaxation with the Fast Inertial Relaxation Engine (FIRE).
//!
//! This crate re-exports the workspace crates under one roof:
//!
//! - [`core`]: the potential oracle trait, result types, callbacks and
//!   reference potentials
//! - [`optim`]: the FIRE optimizer and parallel batch relaxation
//!
//! ## Quick Start
//!
//! ```rust
//! use relaxopt::prelude::*;
//!
//! // Two Lennard-Jones particles, slightly stretched
//! let x0 = DVector::from_vec(vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.3]);
//! let config = FireConfig::new().with_max_move(0.1);
//! let mut fire = Fire::new(x0, LennardJones::<f64>::default(), config).unwrap();
//!
//! let result = fire.run(1e-6, 5_000).unwrap();
//! assert!(result.converged);
//! assert!((result.energy + 1.0).abs() < 1e-9);
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): [`relax_batch`](optim::relax_batch) via rayon
//! - `serde`: serialization of configurations and results

pub use relaxopt_core as core;
pub use relaxopt_optim as optim;

pub use nalgebra;

/// Prelude for convenient imports.
pub mod prelude {
    pub use relaxopt_core::prelude::*;
    pub use relaxopt_optim::{Fire, FireConfig, StepNorm};

    #[cfg(feature = "parallel")]
    pub use relaxopt_optim::relax_batch;
}

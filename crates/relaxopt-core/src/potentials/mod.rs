//! Reference potentials.
//!
//! Small analytic potentials used to exercise optimizers and as building
//! blocks for tests and demos.

pub mod harmonic;
pub mod lennard_jones;

pub use harmonic::Harmonic;
pub use lennard_jones::LennardJones;

//! Isotropic harmonic well around a fixed origin.

use crate::{
    error::{PotentialError, PotentialResult},
    potential::Potential,
    types::{DVector, Scalar},
};
use num_traits::Float;

/// Harmonic potential `E(x) = ½·k·‖x − origin‖²`.
///
/// The gradient is `k·(x − origin)`, so the unique minimum sits at `origin`.
#[derive(Debug, Clone)]
pub struct Harmonic<T: Scalar> {
    origin: DVector<T>,
    k: T,
}

impl<T: Scalar> Harmonic<T> {
    /// Creates a harmonic well centred on `origin` with stiffness `k`.
    pub fn new(origin: DVector<T>, k: T) -> PotentialResult<Self> {
        if !(k > T::zero() && <T as Float>::is_finite(k)) {
            return Err(PotentialError::invalid_parameter(format!(
                "spring constant must be positive and finite, got {k}"
            )));
        }
        Ok(Self { origin, k })
    }

    /// Returns the position of the minimum.
    pub fn origin(&self) -> &DVector<T> {
        &self.origin
    }

    /// Returns the spring constant.
    pub fn stiffness(&self) -> T {
        self.k
    }

    fn displacement(&self, coords: &DVector<T>) -> PotentialResult<DVector<T>> {
        if coords.len() != self.origin.len() {
            return Err(PotentialError::dimension_mismatch(
                self.origin.len(),
                coords.len(),
            ));
        }
        Ok(coords - &self.origin)
    }
}

impl<T: Scalar> Potential<T> for Harmonic<T> {
    fn energy(&self, coords: &DVector<T>) -> PotentialResult<T> {
        let dx = self.displacement(coords)?;
        Ok(<T as Scalar>::from_f64(0.5) * self.k * dx.norm_squared())
    }

    fn energy_gradient(&self, coords: &DVector<T>) -> PotentialResult<(T, DVector<T>)> {
        let dx = self.displacement(coords)?;
        let energy = <T as Scalar>::from_f64(0.5) * self.k * dx.norm_squared();
        Ok((energy, dx * self.k))
    }
}

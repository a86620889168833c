//! Lennard-Jones pair potential for clusters in three dimensions.

use crate::{
    error::{PotentialError, PotentialResult},
    potential::Potential,
    types::{DVector, Scalar},
};
use num_traits::Float;

/// Lennard-Jones cluster potential.
///
/// Coordinates are flat `[x0, y0, z0, x1, y1, z1, ...]`. The energy is
/// `Σ_{i<j} 4ε[(σ/r)^12 − (σ/r)^6]` with no cutoff and no periodic images.
#[derive(Debug, Clone, Copy)]
pub struct LennardJones<T: Scalar> {
    /// Energy constant of the Lennard-Jones potential
    pub epsilon: T,
    /// Distance constant of the Lennard-Jones potential
    pub sigma: T,
}

impl<T: Scalar> Default for LennardJones<T> {
    fn default() -> Self {
        Self {
            epsilon: T::one(),
            sigma: T::one(),
        }
    }
}

impl<T: Scalar> LennardJones<T> {
    /// Creates a Lennard-Jones potential with the given well depth and size.
    pub fn new(epsilon: T, sigma: T) -> PotentialResult<Self> {
        for (name, value) in [("epsilon", epsilon), ("sigma", sigma)] {
            if !(value > T::zero() && <T as Float>::is_finite(value)) {
                return Err(PotentialError::invalid_parameter(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(Self { epsilon, sigma })
    }

    /// Pair separation at the bottom of the well, `2^(1/6)·σ`.
    pub fn equilibrium_distance(&self) -> T {
        let two = <T as Scalar>::from_f64(2.0);
        self.sigma * <T as Float>::powf(two, <T as Scalar>::from_f64(1.0 / 6.0))
    }

    // vij
    fn pair_energy(&self, r2: T) -> T {
        let s2 = self.sigma * self.sigma / r2;
        let s6 = s2 * s2 * s2;
        <T as Scalar>::from_f64(4.0) * self.epsilon * (s6 * s6 - s6)
    }

    // dvij/dr divided by r
    fn pair_gradient_over_r(&self, r2: T) -> T {
        let s2 = self.sigma * self.sigma / r2;
        let s6 = s2 * s2 * s2;
        let two = <T as Scalar>::from_f64(2.0);
        <T as Scalar>::from_f64(24.0) * self.epsilon * (s6 - two * s6 * s6) / r2
    }

    fn atom_count(coords: &DVector<T>) -> PotentialResult<usize> {
        if coords.len() % 3 != 0 {
            return Err(PotentialError::dimension_mismatch(
                "a multiple of 3",
                coords.len(),
            ));
        }
        Ok(coords.len() / 3)
    }

    fn separation(coords: &DVector<T>, i: usize, j: usize) -> PotentialResult<([T; 3], T)> {
        let mut d = [T::zero(); 3];
        for (k, dk) in d.iter_mut().enumerate() {
            *dk = coords[3 * i + k] - coords[3 * j + k];
        }
        let r2 = d[0] * d[0] + d[1] * d[1] + d[2] * d[2];
        if r2 <= T::zero() {
            return Err(PotentialError::numerical_error(format!(
                "particles {i} and {j} coincide"
            )));
        }
        Ok((d, r2))
    }
}

impl<T: Scalar> Potential<T> for LennardJones<T> {
    fn energy(&self, coords: &DVector<T>) -> PotentialResult<T> {
        let natoms = Self::atom_count(coords)?;
        let mut energy = T::zero();
        for i in 0..natoms {
            for j in 0..i {
                let (_, r2) = Self::separation(coords, i, j)?;
                energy += self.pair_energy(r2);
            }
        }
        Ok(energy)
    }

    fn energy_gradient(&self, coords: &DVector<T>) -> PotentialResult<(T, DVector<T>)> {
        let natoms = Self::atom_count(coords)?;
        let mut energy = T::zero();
        let mut gradient = DVector::zeros(coords.len());

        for i in 0..natoms {
            for j in 0..i {
                let (d, r2) = Self::separation(coords, i, j)?;
                energy += self.pair_energy(r2);
                let g = self.pair_gradient_over_r(r2);
                for (k, dk) in d.iter().enumerate() {
                    gradient[3 * i + k] += g * *dk;
                    gradient[3 * j + k] -= g * *dk;
                }
            }
        }

        Ok((energy, gradient))
    }
}

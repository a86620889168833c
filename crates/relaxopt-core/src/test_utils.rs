//! Test utilities for exercising optimizers.
//!
//! Synthetic potentials with hand-picked pathologies, plus a seeded
//! generator for small Lennard-Jones starting structures.

use crate::{
    error::{PotentialError, PotentialResult},
    potential::Potential,
    types::{DVector, Scalar},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Linear potential `E(x) = g·x` whose force never decays.
#[derive(Debug, Clone)]
pub struct ConstantForce<T: Scalar> {
    gradient: DVector<T>,
}

impl<T: Scalar> ConstantForce<T> {
    /// Creates a potential with constant gradient `gradient`.
    pub fn new(gradient: DVector<T>) -> Self {
        Self { gradient }
    }
}

impl<T: Scalar> Potential<T> for ConstantForce<T> {
    fn energy(&self, coords: &DVector<T>) -> PotentialResult<T> {
        if coords.len() != self.gradient.len() {
            return Err(PotentialError::dimension_mismatch(
                self.gradient.len(),
                coords.len(),
            ));
        }
        Ok(self.gradient.dot(coords))
    }

    fn energy_gradient(&self, coords: &DVector<T>) -> PotentialResult<(T, DVector<T>)> {
        Ok((self.energy(coords)?, self.gradient.clone()))
    }
}

/// Potential whose gradient flips sign on every evaluation.
///
/// Deliberately impure: successive forces are anti-parallel, so every step
/// after the first sees non-positive power.
#[derive(Debug)]
pub struct AlternatingForce<T: Scalar> {
    gradient: DVector<T>,
    calls: AtomicUsize,
}

impl<T: Scalar> AlternatingForce<T> {
    /// Creates a potential alternating between `gradient` and `-gradient`.
    pub fn new(gradient: DVector<T>) -> Self {
        Self {
            gradient,
            calls: AtomicUsize::new(0),
        }
    }
}

impl<T: Scalar> Potential<T> for AlternatingForce<T> {
    fn energy(&self, coords: &DVector<T>) -> PotentialResult<T> {
        Ok(self.gradient.dot(coords))
    }

    fn energy_gradient(&self, coords: &DVector<T>) -> PotentialResult<(T, DVector<T>)> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        let gradient = if call % 2 == 0 {
            self.gradient.clone()
        } else {
            -&self.gradient
        };
        Ok((self.gradient.dot(coords), gradient))
    }
}

/// Potential returning a NaN energy once `healthy_calls` evaluations are used up.
#[derive(Debug)]
pub struct NanAfter {
    healthy_calls: usize,
    calls: AtomicUsize,
}

impl NanAfter {
    /// Creates a parabola `‖x‖²` that turns into NaN after `healthy_calls` evaluations.
    pub fn new(healthy_calls: usize) -> Self {
        Self {
            healthy_calls,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Potential<f64> for NanAfter {
    fn energy(&self, coords: &DVector<f64>) -> PotentialResult<f64> {
        Ok(coords.norm_squared())
    }

    fn energy_gradient(&self, coords: &DVector<f64>) -> PotentialResult<(f64, DVector<f64>)> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        if call < self.healthy_calls {
            Ok((coords.norm_squared(), coords * 2.0))
        } else {
            Ok((f64::NAN, coords * 2.0))
        }
    }
}

/// Generates a perturbed simple-cubic cluster of `natoms` particles.
///
/// Particles sit on a cubic grid with the given `spacing`, each coordinate
/// shifted by a uniform random amount in `[-amplitude, amplitude]`. The same
/// seed always yields the same structure.
pub fn random_cluster(natoms: usize, spacing: f64, amplitude: f64, seed: u64) -> DVector<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let side = (1..).find(|s: &usize| s * s * s >= natoms).unwrap_or(1);
    let mut coords = DVector::zeros(3 * natoms);

    for atom in 0..natoms {
        let cell = [atom % side, (atom / side) % side, atom / (side * side)];
        for (k, c) in cell.iter().enumerate() {
            let jitter = if amplitude > 0.0 {
                rng.gen_range(-amplitude..=amplitude)
            } else {
                0.0
            };
            coords[3 * atom + k] = spacing * (*c as f64) + jitter;
        }
    }

    coords
}

//! Potential energy oracle interface.
//!
//! A potential maps a flat coordinate vector to an energy and its gradient.
//! Optimizers treat it as a black box: one `energy_gradient` call per
//! iteration, nothing else. Whether the implementation uses neighbor lists,
//! cell lists or threads internally is invisible at this boundary.

use crate::{
    error::{PotentialError, PotentialResult},
    types::{DVector, Scalar},
};
use num_traits::Float;
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for potential energy surfaces.
///
/// Implementations must be pure: the same coordinates always give the same
/// energy and gradient.
pub trait Potential<T>: Debug
where
    T: Scalar,
{
    /// Evaluates the energy at `coords`.
    fn energy(&self, coords: &DVector<T>) -> PotentialResult<T>;

    /// Evaluates the energy and its gradient at `coords`.
    ///
    /// # Default Implementation
    ///
    /// Uses central finite differences for the gradient if not overridden.
    fn energy_gradient(&self, coords: &DVector<T>) -> PotentialResult<(T, DVector<T>)> {
        let energy = self.energy(coords)?;
        let gradient = self.gradient_fd(coords)?;
        Ok((energy, gradient))
    }

    /// Computes only the gradient at `coords`.
    fn gradient(&self, coords: &DVector<T>) -> PotentialResult<DVector<T>> {
        self.energy_gradient(coords).map(|(_, grad)| grad)
    }

    /// Computes the gradient with central finite differences.
    fn gradient_fd(&self, coords: &DVector<T>) -> PotentialResult<DVector<T>> {
        let n = coords.len();
        let h = <T as Float>::sqrt(T::EPSILON);
        let mut gradient = DVector::zeros(n);
        let mut probe = coords.clone();

        for i in 0..n {
            let original = probe[i];

            probe[i] = original + h;
            let e_plus = self.energy(&probe)?;
            probe[i] = original - h;
            let e_minus = self.energy(&probe)?;
            probe[i] = original;

            gradient[i] = (e_plus - e_minus) / (h + h);
        }

        Ok(gradient)
    }
}

impl<T, P> Potential<T> for &P
where
    T: Scalar,
    P: Potential<T> + ?Sized,
{
    fn energy(&self, coords: &DVector<T>) -> PotentialResult<T> {
        (**self).energy(coords)
    }

    fn energy_gradient(&self, coords: &DVector<T>) -> PotentialResult<(T, DVector<T>)> {
        (**self).energy_gradient(coords)
    }

    fn gradient(&self, coords: &DVector<T>) -> PotentialResult<DVector<T>> {
        (**self).gradient(coords)
    }
}

/// Adapter turning a closure `coords -> (energy, gradient)` into a [`Potential`].
///
/// # Examples
///
/// ```rust
/// use relaxopt_core::potential::{FnPotential, Potential};
/// use relaxopt_core::types::DVector;
///
/// let parabola = FnPotential::new(|x: &DVector<f64>| (x.dot(x), x * 2.0));
/// let (e, g) = parabola.energy_gradient(&DVector::from_vec(vec![3.0])).unwrap();
/// assert_eq!(e, 9.0);
/// assert_eq!(g[0], 6.0);
/// ```
pub struct FnPotential<F> {
    func: F,
}

impl<F> FnPotential<F> {
    /// Wraps `func`.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Debug for FnPotential<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnPotential").finish_non_exhaustive()
    }
}

impl<T, F> Potential<T> for FnPotential<F>
where
    T: Scalar,
    F: Fn(&DVector<T>) -> (T, DVector<T>),
{
    fn energy(&self, coords: &DVector<T>) -> PotentialResult<T> {
        Ok((self.func)(coords).0)
    }

    fn energy_gradient(&self, coords: &DVector<T>) -> PotentialResult<(T, DVector<T>)> {
        Ok((self.func)(coords))
    }
}

/// Wrapper to count potential evaluations for testing and debugging.
///
/// Counters are atomic so a single wrapped potential can be shared by
/// relaxations running on several threads.
#[derive(Debug)]
pub struct CountingPotential<P> {
    /// The underlying potential
    pub inner: P,
    energy_count: AtomicUsize,
    gradient_count: AtomicUsize,
}

impl<P> CountingPotential<P> {
    /// Creates a new counting wrapper around a potential.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            energy_count: AtomicUsize::new(0),
            gradient_count: AtomicUsize::new(0),
        }
    }

    /// Resets all counters to zero.
    pub fn reset_counts(&self) {
        self.energy_count.store(0, Ordering::Relaxed);
        self.gradient_count.store(0, Ordering::Relaxed);
    }

    /// Returns `(energy-only calls, energy+gradient calls)`.
    pub fn counts(&self) -> (usize, usize) {
        (
            self.energy_count.load(Ordering::Relaxed),
            self.gradient_count.load(Ordering::Relaxed),
        )
    }
}

impl<T, P> Potential<T> for CountingPotential<P>
where
    T: Scalar,
    P: Potential<T>,
{
    fn energy(&self, coords: &DVector<T>) -> PotentialResult<T> {
        self.energy_count.fetch_add(1, Ordering::Relaxed);
        self.inner.energy(coords)
    }

    fn energy_gradient(&self, coords: &DVector<T>) -> PotentialResult<(T, DVector<T>)> {
        self.gradient_count.fetch_add(1, Ordering::Relaxed);
        self.inner.energy_gradient(coords)
    }

    fn gradient(&self, coords: &DVector<T>) -> PotentialResult<DVector<T>> {
        self.gradient_count.fetch_add(1, Ordering::Relaxed);
        self.inner.gradient(coords)
    }
}

/// Utilities for checking analytic gradients.
pub struct DerivativeChecker;

impl DerivativeChecker {
    /// Checks if the analytic gradient matches finite differences.
    ///
    /// Returns `(passes, max_error)` where `max_error` is the largest
    /// component-wise deviation.
    pub fn check_gradient<T, P>(
        potential: &P,
        coords: &DVector<T>,
        tol: T,
    ) -> PotentialResult<(bool, T)>
    where
        T: Scalar,
        P: Potential<T> + ?Sized,
    {
        let analytic = potential.gradient(coords)?;
        let numeric = potential.gradient_fd(coords)?;
        if analytic.len() != numeric.len() {
            return Err(PotentialError::dimension_mismatch(
                numeric.len(),
                analytic.len(),
            ));
        }

        let max_error = (&analytic - &numeric)
            .iter()
            .map(|x| <T as Float>::abs(*x))
            .fold(T::zero(), |a, b| <T as Float>::max(a, b));

        Ok((max_error < tol, max_error))
    }
}

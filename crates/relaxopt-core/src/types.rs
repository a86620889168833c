//! Type definitions and aliases for structural relaxation.
//!
//! This module provides the scalar trait shared by every optimizer and
//! potential, plus the vector alias used for coordinates and forces.

use nalgebra::{Dyn, OVector, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Trait for scalar types used in relaxation (f32 or f64).
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Machine epsilon for this scalar type.
    const EPSILON: Self;

    /// Convert from f64 (for constants).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn from_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("Failed to convert from f64")
    }

    /// Convert from usize (for dimension counts).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn from_usize(v: usize) -> Self {
        <Self as FromPrimitive>::from_usize(v).expect("Failed to convert from usize")
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
}

/// Type alias for a dynamically-sized vector (coordinates, gradients, forces).
pub type DVector<T> = OVector<T, Dyn>;

/// Returns true if every component of `v` is finite.
pub fn all_finite<T: Scalar>(v: &DVector<T>) -> bool {
    v.iter().all(|x| <T as Float>::is_finite(*x))
}

/// Largest absolute component of `v`, zero for an empty vector.
pub fn max_abs<T: Scalar>(v: &DVector<T>) -> T {
    v.iter()
        .fold(T::zero(), |m, x| <T as Float>::max(m, <T as Float>::abs(*x)))
}

/// Euclidean norm computed on `v / max|v_i|`, so that it only overflows
/// when the norm itself exceeds the largest finite value.
pub fn stable_norm<T: Scalar>(v: &DVector<T>) -> T {
    let scale = max_abs(v);
    if scale == T::zero() || !<T as Float>::is_finite(scale) {
        return scale;
    }
    let sum = v.iter().fold(T::zero(), |acc, x| {
        let r = *x / scale;
        acc + r * r
    });
    scale * <T as Float>::sqrt(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scalar_conversions() {
        let val_f64 = 3.14159;
        let val_f32 = <f32 as Scalar>::from_f64(val_f64);
        assert_relative_eq!(f64::from(val_f32), val_f64, epsilon = 1e-6);
        assert_eq!(<f64 as Scalar>::from_usize(4), 4.0);
    }

    #[test]
    fn test_stable_norm_matches_norm() {
        let v = DVector::from_vec(vec![3.0, -4.0, 0.0]);
        assert_relative_eq!(stable_norm(&v), 5.0, epsilon = 1e-15);
        assert_eq!(max_abs(&v), 4.0);
        assert_eq!(stable_norm(&DVector::<f64>::zeros(3)), 0.0);
        assert_eq!(stable_norm(&DVector::<f64>::zeros(0)), 0.0);
    }

    #[test]
    fn test_stable_norm_survives_huge_components() {
        let v = DVector::<f64>::from_vec(vec![3e200, 4e200]);
        assert!(v.norm().is_infinite());
        assert_relative_eq!(stable_norm(&v), 5e200, max_relative = 1e-14);

        let tiny = DVector::from_vec(vec![3e-200, 4e-200]);
        assert_relative_eq!(stable_norm(&tiny), 5e-200, max_relative = 1e-14);
    }

    #[test]
    fn test_all_finite() {
        assert!(all_finite(&DVector::from_vec(vec![1.0, -2.0, 0.0])));
        assert!(!all_finite(&DVector::from_vec(vec![1.0, f64::NAN])));
        assert!(!all_finite(&DVector::from_vec(vec![f64::INFINITY])));
    }
}

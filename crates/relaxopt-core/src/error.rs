//! Error types for potential evaluation and relaxation.
//!
//! Two layers mirror the two sides of the oracle contract: [`PotentialError`]
//! is raised by energy/gradient evaluations, [`OptimizerError`] by the
//! optimizer itself. Potential failures convert into optimizer errors with `?`.

use thiserror::Error;

/// Errors that can occur while evaluating a potential.
#[derive(Debug, Clone, Error)]
pub enum PotentialError {
    /// Coordinate vector has the wrong shape for this potential.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Evaluation hit a singularity or produced a non-finite value.
    #[error("Numerical instability detected: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },

    /// A potential parameter is out of range.
    #[error("Invalid potential parameter: {reason}")]
    InvalidParameter {
        /// Description of why the parameter is invalid
        reason: String,
    },

    /// The oracle reported an explicit failure.
    #[error("Potential evaluation failed: {reason}")]
    EvaluationFailed {
        /// Description of the failure
        reason: String,
    },
}

impl PotentialError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter<S: Into<String>>(reason: S) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Create an EvaluationFailed error.
    pub fn evaluation_failed<S: Into<String>>(reason: S) -> Self {
        Self::EvaluationFailed {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during relaxation.
#[derive(Debug, Clone, Error)]
pub enum OptimizerError {
    /// Input vectors have inconsistent lengths or are empty.
    ///
    /// Raised before any state is touched, so the optimizer is left exactly
    /// as it was.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the offending input
        reason: String,
    },

    /// The potential returned a non-finite energy or gradient, or a step
    /// produced a non-finite velocity.
    ///
    /// Re-evaluating at the same point would give the same answer, so the
    /// run is aborted instead of retried.
    #[error("Numerical error at iteration {iteration}: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
        /// Iteration at which the bad value was observed
        iteration: usize,
    },

    /// Invalid optimizer configuration.
    ///
    /// Parameters are never clamped into range; out-of-range values are
    /// rejected here instead.
    #[error("Invalid optimizer configuration: {reason} ({parameter} = {value})")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// Propagated potential error.
    #[error("Potential evaluation failed: {0}")]
    Potential(#[from] PotentialError),
}

impl OptimizerError {
    /// Create an InvalidInput error.
    pub fn invalid_input<S: Into<String>>(reason: S) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error describing a length mismatch.
    pub fn dimension_mismatch(what: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidInput {
            reason: format!("{what} has length {actual}, expected {expected}"),
        }
    }

    /// Create a NumericalError observed at `iteration`.
    pub fn numerical_error<S: Into<String>>(reason: S, iteration: usize) -> Self {
        Self::NumericalError {
            reason: reason.into(),
            iteration,
        }
    }

    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
    }
}

/// Result type alias for potential evaluations.
pub type PotentialResult<T> = std::result::Result<T, PotentialError>;

/// Result type alias for optimizer operations.
pub type OptimizerResult<T> = std::result::Result<T, OptimizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_potential_error_creation() {
        let err = PotentialError::dimension_mismatch("multiple of 3", 7);
        assert!(matches!(err, PotentialError::DimensionMismatch { .. }));
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected multiple of 3, got 7"
        );

        let err = PotentialError::numerical_error("particles 0 and 1 coincide");
        assert_eq!(
            err.to_string(),
            "Numerical instability detected: particles 0 and 1 coincide"
        );
    }

    #[test]
    fn test_optimizer_error_context() {
        let err = OptimizerError::numerical_error("energy is NaN", 12);
        if let OptimizerError::NumericalError { reason, iteration } = err {
            assert_eq!(reason, "energy is NaN");
            assert_eq!(iteration, 12);
        } else {
            panic!("Expected NumericalError variant");
        }

        let err = OptimizerError::invalid_configuration("must lie in (0, 1)", "fdec", "1.5");
        assert!(err.to_string().contains("fdec = 1.5"));

        let err = OptimizerError::dimension_mismatch("force", 4, 3);
        assert_eq!(err.to_string(), "Invalid input: force has length 3, expected 4");
    }

    #[test]
    fn test_potential_error_propagation() {
        let potential_err = PotentialError::evaluation_failed("neighbor list overflow");
        let optimizer_err: OptimizerError = potential_err.into();

        assert!(matches!(optimizer_err, OptimizerError::Potential(_)));
        assert!(optimizer_err.to_string().contains("neighbor list overflow"));
    }

    #[test]
    fn test_error_display() {
        let errors = vec![
            OptimizerError::invalid_input("empty coordinates"),
            OptimizerError::numerical_error("gradient is infinite", 0),
            OptimizerError::invalid_configuration("must be positive", "dt", "-0.1"),
            OptimizerError::Potential(PotentialError::invalid_parameter("sigma <= 0")),
        ];

        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}

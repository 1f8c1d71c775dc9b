// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for curvature analysis and derivation validation.
//!
//! Every failure is structural (wrong input), never transient: callers either
//! stop or report the derivation as inconclusive. Variants carry the observed
//! and expected values so a failure can be diagnosed without re-running.

use std::fmt;

/// Errors arising from the curvature analyzer, the symbolic layer, or the validator.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeSpaceError {
    /// The ambient Hessian at the critical point lacks the two-value
    /// (diagonal / off-diagonal) structure of a symmetric point.
    AsymmetricHessian {
        /// `"diagonal"` or `"off-diagonal"`
        entry: &'static str,
        /// Row of the offending entry
        row: usize,
        /// Column of the offending entry
        col: usize,
        /// Reference value (first entry of the same kind)
        expected: f64,
        /// Value found at `(row, col)`
        observed: f64,
    },

    /// A second derivative is undefined at the critical point.
    SingularFunctional {
        /// First differentiation variable
        row_var: String,
        /// Second differentiation variable
        col_var: String,
        /// Underlying evaluation failure
        detail: String,
    },

    /// The constraint cannot be used to eliminate a variable.
    DegenerateConstraint {
        /// Index of the variable the gauge eliminates
        variable: usize,
        /// Coefficient of that variable
        coefficient: f64,
        /// What is wrong with the gauge
        detail: String,
    },

    /// The reference value is zero, so relative error is undefined.
    UndefinedReference {
        /// Prediction label
        label: String,
    },

    /// The tolerance is negative or NaN.
    InvalidTolerance {
        /// Prediction label
        label: String,
        /// Offending tolerance
        tolerance: f64,
    },

    /// A variable name appears twice in a functional's variable list.
    DuplicateVariable {
        /// Repeated name
        name: String,
    },

    /// Fewer than two variables were supplied.
    TooFewVariables {
        /// Number of variables found
        found: usize,
    },

    /// The critical point is missing a variable or is not fully symmetric and positive.
    InvalidCriticalPoint {
        /// Offending variable name
        variable: String,
        /// What is wrong with it
        detail: String,
    },

    /// The constraint does not hold at the critical point.
    ConstraintNotSatisfied {
        /// `Σ cᵢ xᵢ − rhs` at the critical point
        residual: f64,
    },

    /// The smallest eigenvalue vanishes, so the eigenvalue ratio is undefined.
    DegenerateSpectrum {
        /// Smallest eigenvalue (by absolute value)
        min_eigenvalue: f64,
    },

    /// A validator input is NaN or infinite.
    NonFiniteValue {
        /// Which input (e.g. `"predicted"`)
        label: String,
        /// The offending value
        value: f64,
    },

    /// `summarize` was given no verdicts.
    EmptyReport,

    /// Symbolic evaluation met a variable with no bound value.
    UnboundVariable {
        /// Variable name
        name: String,
    },

    /// Symbolic evaluation left the real domain (division by zero, `ln` of a
    /// non-positive number, fractional power of a negative number).
    Domain(String),
}

impl fmt::Display for ShapeSpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AsymmetricHessian {
                entry,
                row,
                col,
                expected,
                observed,
            } => write!(
                f,
                "Hessian is not symmetric at the critical point: {entry} entry ({row},{col}) = {observed:e}, expected {expected:e}"
            ),
            Self::SingularFunctional {
                row_var,
                col_var,
                detail,
            } => write!(
                f,
                "second derivative d²/d{row_var}d{col_var} is undefined at the critical point: {detail}"
            ),
            Self::DegenerateConstraint {
                variable,
                coefficient,
                detail,
            } => write!(
                f,
                "constraint cannot eliminate variable {variable} (coefficient {coefficient:e}): {detail}"
            ),
            Self::UndefinedReference { label } => {
                write!(f, "{label}: reference value is zero, relative error is undefined")
            }
            Self::InvalidTolerance { label, tolerance } => {
                write!(f, "{label}: tolerance must be a non-negative fraction, got {tolerance}")
            }
            Self::DuplicateVariable { name } => {
                write!(f, "variable `{name}` is listed more than once")
            }
            Self::TooFewVariables { found } => {
                write!(f, "curvature analysis needs at least 2 variables, got {found}")
            }
            Self::InvalidCriticalPoint { variable, detail } => {
                write!(f, "invalid critical point at {variable}: {detail}")
            }
            Self::ConstraintNotSatisfied { residual } => {
                write!(f, "constraint does not hold at the critical point (residual {residual:e})")
            }
            Self::DegenerateSpectrum { min_eigenvalue } => write!(
                f,
                "smallest eigenvalue {min_eigenvalue:e} is zero, eigenvalue ratio is undefined"
            ),
            Self::NonFiniteValue { label, value } => {
                write!(f, "{label} must be finite, got {value}")
            }
            Self::EmptyReport => write!(f, "cannot summarize an empty validation report"),
            Self::UnboundVariable { name } => write!(f, "no value bound for variable `{name}`"),
            Self::Domain(msg) => write!(f, "outside the real domain: {msg}"),
        }
    }
}

impl std::error::Error for ShapeSpaceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_undefined_reference() {
        let err = ShapeSpaceError::UndefinedReference {
            label: "Koide Q".into(),
        };
        assert_eq!(
            err.to_string(),
            "Koide Q: reference value is zero, relative error is undefined"
        );
    }

    #[test]
    fn display_asymmetric_hessian_carries_values() {
        let err = ShapeSpaceError::AsymmetricHessian {
            entry: "diagonal",
            row: 2,
            col: 2,
            expected: 1.0,
            observed: 2.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("diagonal"));
        assert!(msg.contains("(2,2)"));
        assert!(msg.contains("2.5e0"));
    }

    #[test]
    fn display_degenerate_constraint() {
        let err = ShapeSpaceError::DegenerateConstraint {
            variable: 1,
            coefficient: 0.0,
            detail: "zero coefficient".into(),
        };
        assert!(err.to_string().contains("variable 1"));
    }

    #[test]
    fn error_trait_works() {
        let err = ShapeSpaceError::EmptyReport;
        let dyn_err: &dyn std::error::Error = &err;
        assert_eq!(
            dyn_err.to_string(),
            "cannot summarize an empty validation report"
        );
    }

    #[test]
    fn invalid_tolerance_reports_value() {
        let err = ShapeSpaceError::InvalidTolerance {
            label: "alpha".into(),
            tolerance: -0.5,
        };
        assert!(err.to_string().contains("-0.5"));
    }
}

// SPDX-License-Identifier: AGPL-3.0-only

//! Constrained critical-point curvature analysis.
//!
//! Given a functional F(x₁ … x_N) and a fully symmetric point, the analyzer
//!
//!   1. differentiates F twice symbolically and evaluates the N × N Hessian
//!      at the point, verifying it has exactly one diagonal value `d` and one
//!      off-diagonal value `o`;
//!   2. projects it onto the tangent space of a linear gauge constraint
//!      (`Jᵀ H J`, size N−1);
//!   3. diagonalizes the reduced form (`nalgebra::SymmetricEigen`, sorted ascending);
//!   4. reports λ_max / λ_min.
//!
//! With the fixed-sum gauge the reduced form is `(d − o)·(I + 11ᵀ)`, whose
//! eigenvalues are `d − o` (multiplicity N−2) and `N·(d − o)`, so the ratio
//! is N for every N ≥ 3 and independent of the scale of the point.
//!
//! # Provenance
//!
//! - Barbour (2003) "Scale-invariant gravity: particle dynamics", shape space
//!   of N bodies modulo translation, rotation and scale.
//! - Hall & Reginatto (2002) "Quantum mechanics from a Heisenberg-type equality".

mod functional;
mod spectrum;


pub use functional::{CriticalPoint, Functional, LinearConstraint};
pub use spectrum::{AmbientHessian, EigenLevel, Eigenspectrum, ReducedQuadraticForm};

use serde::Serialize;
use tracing::debug;

use self::functional::check_variables;
use crate::error::ShapeSpaceError;
use crate::symbolic::Symbolic;
use crate::tolerances;

/// Everything the analyzer derives from one functional at one critical point.
#[derive(Debug, Clone)]
pub struct CurvatureAnalysis {
    variables: Vec<String>,
    free_variables: Vec<String>,
    critical_value: f64,
    ambient: AmbientHessian,
    reduced: ReducedQuadraticForm,
    spectrum: Eigenspectrum,
    ratio: f64,
}

impl CurvatureAnalysis {
    /// Ambient dimension N.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.variables.len()
    }

    /// Ambient variables, in order.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// The N−1 coordinates left free by the gauge.
    #[must_use]
    pub fn free_variables(&self) -> &[String] {
        &self.free_variables
    }

    /// F at the critical point (`3√3` for the triangle complexity at unit sides).
    #[must_use]
    pub const fn critical_value(&self) -> f64 {
        self.critical_value
    }

    /// Verified two-value ambient Hessian.
    #[must_use]
    pub const fn ambient(&self) -> &AmbientHessian {
        &self.ambient
    }

    /// Hessian on the constraint's tangent space.
    #[must_use]
    pub const fn reduced(&self) -> &ReducedQuadraticForm {
        &self.reduced
    }

    /// Sorted eigenvalues with multiplicities.
    #[must_use]
    pub const fn spectrum(&self) -> &Eigenspectrum {
        &self.spectrum
    }

    /// λ_max / λ_min
    #[must_use]
    pub const fn ratio(&self) -> f64 {
        self.ratio
    }

    /// λ_min / λ_max, the correlation floor J_min.
    #[must_use]
    pub fn correlation_floor(&self) -> f64 {
        self.ratio.recip()
    }

    /// λ_max divided by the pattern scale `d − o`.
    ///
    /// Equals N for every N ≥ 2, including N = 2 where the tangent space is
    /// one-dimensional and `ratio()` is trivially 1. `None` when the reduced
    /// form is not of the `s·(I + 11ᵀ)` shape (non fixed-sum gauge).
    #[must_use]
    pub fn stiff_ratio(&self) -> Option<f64> {
        self.reduced
            .pattern_scale()
            .map(|s| self.spectrum.max() / s)
    }

    /// Serializable digest for reports.
    #[must_use]
    pub fn summary(&self) -> CurvatureSummary {
        CurvatureSummary {
            dimension: self.dimension(),
            critical_value: self.critical_value,
            diagonal: self.ambient.diagonal(),
            off_diagonal: self.ambient.off_diagonal(),
            pattern_scale: self.reduced.pattern_scale(),
            eigenvalues: self.spectrum.eigenvalues().to_vec(),
            levels: self.spectrum.levels().to_vec(),
            ratio: self.ratio,
            stiff_ratio: self.stiff_ratio(),
        }
    }
}

/// Machine-readable digest of a [`CurvatureAnalysis`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurvatureSummary {
    /// Ambient dimension N
    pub dimension: usize,
    /// F at the critical point
    pub critical_value: f64,
    /// Ambient diagonal value `d`
    pub diagonal: f64,
    /// Ambient off-diagonal value `o`
    pub off_diagonal: f64,
    /// `s` in `s·(I + 11ᵀ)`, when the reduced form has that shape
    pub pattern_scale: Option<f64>,
    /// Eigenvalues, ascending
    pub eigenvalues: Vec<f64>,
    /// Distinct levels with multiplicities
    pub levels: Vec<EigenLevel>,
    /// λ_max / λ_min
    pub ratio: f64,
    /// λ_max / s
    pub stiff_ratio: Option<f64>,
}

/// Reduce the Hessian of `functional` at `critical_point` to the tangent space
/// of `constraint` and diagonalize it.
///
/// Derivatives are exact (symbolic), so the only numeric error is round-off
/// in evaluation and in the eigensolver. Nothing is returned unless every
/// step succeeds.
///
/// # Errors
///
/// - `TooFewVariables` / `DuplicateVariable` for a malformed variable list
/// - `InvalidCriticalPoint` if the point is not fully symmetric and positive
/// - `DegenerateConstraint` if the gauge cannot eliminate its variable
/// - `ConstraintNotSatisfied` if the constraint fails at the point
/// - `SingularFunctional` if F or a second derivative is undefined there
/// - `AsymmetricHessian` if the ambient Hessian lacks the two-value structure
/// - `DegenerateSpectrum` if λ_min vanishes
pub fn reduce_and_diagonalize<E, S>(
    functional: &E,
    variables: &[S],
    critical_point: &CriticalPoint,
    constraint: &LinearConstraint,
) -> Result<CurvatureAnalysis, ShapeSpaceError>
where
    E: Symbolic,
    S: AsRef<str>,
{
    check_variables(variables)?;
    let names: Vec<&str> = variables.iter().map(AsRef::as_ref).collect();
    let n = names.len();

    let value = critical_point.symmetric_value(&names)?;
    let jacobian = constraint.gauge_jacobian(n)?;
    let residual = constraint.residual(&vec![value; n]);
    if residual.abs() > tolerances::CONSTRAINT_RESIDUAL_REL * constraint.rhs().abs().max(1.0) {
        return Err(ShapeSpaceError::ConstraintNotSatisfied { residual });
    }

    let at = critical_point.bindings();
    let critical_value =
        functional
            .eval(at)
            .map_err(|e| ShapeSpaceError::SingularFunctional {
                row_var: names[0].to_string(),
                col_var: names[0].to_string(),
                detail: format!("functional itself: {e}"),
            })?;

    let ambient = AmbientHessian::evaluate(functional, &names, at)?;
    debug!(
        n,
        value,
        d = ambient.diagonal(),
        o = ambient.off_diagonal(),
        "ambient Hessian verified"
    );

    let reduced = ReducedQuadraticForm::project(&ambient, &jacobian);
    debug!(reduced = %reduced.matrix(), "reduced quadratic form");

    let spectrum = Eigenspectrum::of(&reduced)?;
    let ratio = spectrum.ratio()?;
    debug!(eigenvalues = ?spectrum.eigenvalues(), ratio, "eigenspectrum");

    let free_variables = constraint
        .free_indices(n)
        .into_iter()
        .map(|i| names[i].to_string())
        .collect();

    Ok(CurvatureAnalysis {
        variables: names.iter().map(|s| (*s).to_string()).collect(),
        free_variables,
        critical_value,
        ambient,
        reduced,
        spectrum,
        ratio,
    })
}

/// Analyze the N-variable symmetric complexity at `x₁ = … = x_N = scale`
/// under `Σ xᵢ = N·scale`.
///
/// # Errors
///
/// Any error of [`reduce_and_diagonalize`]; `TooFewVariables` for n < 2.
pub fn analyze_symmetric_complexity(
    n: usize,
    scale: f64,
) -> Result<CurvatureAnalysis, ShapeSpaceError> {
    let functional = Functional::symmetric_complexity(n)?;
    let point = functional.symmetric_point(scale)?;
    let constraint = functional.fixed_sum_constraint(scale);
    functional.analyze(&point, &constraint)
}

// SPDX-License-Identifier: AGPL-3.0-only

//! Functionals, critical points, and the gauge-fixing constraint.

use std::collections::BTreeSet;

use nalgebra::DMatrix;

use crate::error::ShapeSpaceError;
use crate::symbolic::{Bindings, Expr, Symbolic};
use crate::tolerances;

/// Reject fewer than two or repeated variable names.
pub(crate) fn check_variables<S: AsRef<str>>(variables: &[S]) -> Result<(), ShapeSpaceError> {
    if variables.len() < 2 {
        return Err(ShapeSpaceError::TooFewVariables {
            found: variables.len(),
        });
    }
    let mut seen = BTreeSet::new();
    for name in variables {
        if !seen.insert(name.as_ref()) {
            return Err(ShapeSpaceError::DuplicateVariable {
                name: name.as_ref().to_string(),
            });
        }
    }
    Ok(())
}

/// A scalar functional together with its ordered variable list.
#[derive(Debug, Clone)]
pub struct Functional<E = Expr> {
    expr: E,
    variables: Vec<String>,
}

impl<E: Symbolic> Functional<E> {
    /// Bundle an expression with the variables it is analyzed over.
    ///
    /// # Errors
    ///
    /// `TooFewVariables` for N < 2, `DuplicateVariable` for repeated names.
    pub fn new<S: Into<String>>(
        expr: E,
        variables: impl IntoIterator<Item = S>,
    ) -> Result<Self, ShapeSpaceError> {
        let variables: Vec<String> = variables.into_iter().map(Into::into).collect();
        check_variables(&variables)?;
        Ok(Self { expr, variables })
    }

    /// The expression.
    pub fn expr(&self) -> &E {
        &self.expr
    }

    /// Variables, in analysis order.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Number of ambient variables N.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.variables.len()
    }

    /// The fully symmetric point with every variable equal to `value`.
    ///
    /// # Errors
    ///
    /// `InvalidCriticalPoint` if `value` is not finite and positive.
    pub fn symmetric_point(&self, value: f64) -> Result<CriticalPoint, ShapeSpaceError> {
        CriticalPoint::symmetric(&self.variables, value)
    }

    /// `Σ xᵢ = N·value`, eliminating the last variable.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fixed_sum_constraint(&self, value: f64) -> LinearConstraint {
        let n = self.dimension();
        LinearConstraint::fixed_sum(n, n as f64 * value)
    }

    /// Run the curvature analysis of this functional.
    ///
    /// # Errors
    ///
    /// See [`super::reduce_and_diagonalize`].
    pub fn analyze(
        &self,
        critical_point: &CriticalPoint,
        constraint: &LinearConstraint,
    ) -> Result<super::CurvatureAnalysis, ShapeSpaceError> {
        super::reduce_and_diagonalize(&self.expr, &self.variables, critical_point, constraint)
    }
}

impl Functional<Expr> {
    /// Scale-invariant complexity `sqrt(Σ xᵢ²) · Σ 1/xᵢ` over `x1 … xn`.
    ///
    /// For n = 3 this is the triangle measure `√(a²+b²+c²)·(1/a+1/b+1/c)`
    /// whose minimum sits at the equilateral configuration.
    ///
    /// # Errors
    ///
    /// `TooFewVariables` for n < 2.
    pub fn symmetric_complexity(n: usize) -> Result<Self, ShapeSpaceError> {
        let names: Vec<String> = (1..=n).map(|i| format!("x{i}")).collect();
        let moment = Expr::sum(names.iter().map(|v| Expr::var(v.as_str()).powi(2))).sqrt();
        let inverse = Expr::sum(names.iter().map(|v| Expr::var(v.as_str()).recip()));
        Self::new(moment * inverse, names)
    }
}

/// A point at which every variable takes the same strictly positive value.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalPoint {
    coords: Bindings,
}

impl CriticalPoint {
    /// Every variable in `variables` set to `value`.
    ///
    /// # Errors
    ///
    /// `InvalidCriticalPoint` if `value` is not finite and positive.
    pub fn symmetric<S: AsRef<str>>(variables: &[S], value: f64) -> Result<Self, ShapeSpaceError> {
        if !(value.is_finite() && value > 0.0) {
            return Err(ShapeSpaceError::InvalidCriticalPoint {
                variable: variables
                    .first()
                    .map_or_else(String::new, |v| v.as_ref().to_string()),
                detail: format!("coordinate {value} is not strictly positive"),
            });
        }
        Ok(Self {
            coords: variables
                .iter()
                .map(|v| (v.as_ref().to_string(), value))
                .collect(),
        })
    }

    /// Wrap an explicit binding; symmetry is checked when the point is used.
    #[must_use]
    pub const fn from_bindings(coords: Bindings) -> Self {
        Self { coords }
    }

    /// Coordinate of `variable`, if bound.
    #[must_use]
    pub fn value(&self, variable: &str) -> Option<f64> {
        self.coords.get(variable).copied()
    }

    /// Underlying variable → value map.
    #[must_use]
    pub const fn bindings(&self) -> &Bindings {
        &self.coords
    }

    /// The common coordinate value over `variables`.
    ///
    /// # Errors
    ///
    /// `InvalidCriticalPoint` if a variable is unbound, non-positive, or
    /// differs from the first coordinate.
    pub fn symmetric_value<S: AsRef<str>>(&self, variables: &[S]) -> Result<f64, ShapeSpaceError> {
        let mut common: Option<f64> = None;
        for name in variables {
            let name = name.as_ref();
            let invalid = |detail: String| ShapeSpaceError::InvalidCriticalPoint {
                variable: name.to_string(),
                detail,
            };
            let v = self
                .value(name)
                .ok_or_else(|| invalid("no coordinate bound".into()))?;
            if !(v.is_finite() && v > 0.0) {
                return Err(invalid(format!("coordinate {v} is not strictly positive")));
            }
            match common {
                None => common = Some(v),
                Some(c) if (v - c).abs() > tolerances::CRITICAL_POINT_SYMMETRY_REL * c => {
                    return Err(invalid(format!(
                        "coordinate {v} differs from {c}; the point is not fully symmetric"
                    )));
                }
                Some(_) => {}
            }
        }
        common.ok_or(ShapeSpaceError::TooFewVariables { found: 0 })
    }
}

/// A linear constraint `Σ cᵢ xᵢ = rhs` that eliminates one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    coefficients: Vec<f64>,
    rhs: f64,
    eliminate: usize,
}

impl LinearConstraint {
    /// General gauge: `Σ coefficients[i]·xᵢ = rhs`, solved for variable `eliminate`.
    #[must_use]
    pub const fn new(coefficients: Vec<f64>, rhs: f64, eliminate: usize) -> Self {
        Self {
            coefficients,
            rhs,
            eliminate,
        }
    }

    /// `x₁ + … + xₙ = total`, eliminating the last variable.
    #[must_use]
    pub fn fixed_sum(n: usize, total: f64) -> Self {
        Self::new(vec![1.0; n], total, n.saturating_sub(1))
    }

    /// Coefficients `cᵢ`.
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Right-hand side.
    #[must_use]
    pub const fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Index of the dependent variable.
    #[must_use]
    pub const fn eliminated(&self) -> usize {
        self.eliminate
    }

    /// `Σ cᵢ xᵢ − rhs`
    #[must_use]
    pub fn residual(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(c, x)| c * x)
            .sum::<f64>()
            - self.rhs
    }

    /// Indices of the N−1 free variables, in order.
    #[must_use]
    pub fn free_indices(&self, n: usize) -> Vec<usize> {
        (0..n).filter(|&i| i != self.eliminate).collect()
    }

    /// Check that the gauge can eliminate its variable among `n` variables.
    ///
    /// # Errors
    ///
    /// `DegenerateConstraint` on a shape mismatch, an out-of-range eliminated
    /// index, a non-finite coefficient, or an eliminated coefficient that is
    /// (numerically) zero.
    pub fn check(&self, n: usize) -> Result<(), ShapeSpaceError> {
        let degenerate = |detail: String| ShapeSpaceError::DegenerateConstraint {
            variable: self.eliminate,
            coefficient: self.coefficients.get(self.eliminate).copied().unwrap_or(f64::NAN),
            detail,
        };
        if self.coefficients.len() != n {
            return Err(degenerate(format!(
                "{} coefficients for {n} variables",
                self.coefficients.len()
            )));
        }
        if self.eliminate >= n {
            return Err(degenerate(format!("index out of range for {n} variables")));
        }
        if !self.rhs.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(degenerate("non-finite coefficient or right-hand side".into()));
        }
        if self.coefficients[self.eliminate].abs() < tolerances::GAUGE_COEFFICIENT_MIN {
            return Err(degenerate("eliminated variable has zero coefficient".into()));
        }
        Ok(())
    }

    /// Chain-rule Jacobian `∂x/∂ξ` of the gauge map, shape N × (N−1).
    ///
    /// Free coordinate `ξₘ` moves its own variable by one unit and the
    /// eliminated variable by `−cᵢ/cₖ`. The map is affine, so its second
    /// derivatives vanish and the reduced Hessian is exactly `Jᵀ H J`.
    ///
    /// # Errors
    ///
    /// See [`Self::check`].
    pub fn gauge_jacobian(&self, n: usize) -> Result<DMatrix<f64>, ShapeSpaceError> {
        self.check(n)?;
        let k = self.eliminate;
        let ck = self.coefficients[k];
        let mut jacobian = DMatrix::zeros(n, n - 1);
        for (m, i) in self.free_indices(n).into_iter().enumerate() {
            jacobian[(i, m)] = 1.0;
            jacobian[(k, m)] = -self.coefficients[i] / ck;
        }
        Ok(jacobian)
    }
}

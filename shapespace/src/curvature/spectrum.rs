// SPDX-License-Identifier: AGPL-3.0-only

//! Ambient Hessian, reduced quadratic form, and its eigenspectrum.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use serde::Serialize;

use crate::error::ShapeSpaceError;
use crate::symbolic::{Bindings, Symbolic};
use crate::tolerances;

/// N × N matrix of second partials at the critical point.
///
/// At a fully symmetric point it has one diagonal value `d` and one
/// off-diagonal value `o`; [`AmbientHessian::evaluate`] verifies this.
#[derive(Debug, Clone)]
pub struct AmbientHessian {
    matrix: DMatrix<f64>,
    diagonal: f64,
    off_diagonal: f64,
}

impl AmbientHessian {
    /// Differentiate `functional` twice symbolically and evaluate at `at`.
    ///
    /// First derivatives are simplified once and reused for every row.
    ///
    /// # Errors
    ///
    /// `SingularFunctional` if a second derivative cannot be evaluated at the
    /// point; `AsymmetricHessian` if entries of the same kind disagree.
    pub fn evaluate<E: Symbolic>(
        functional: &E,
        variables: &[&str],
        at: &Bindings,
    ) -> Result<Self, ShapeSpaceError> {
        let n = variables.len();
        let gradient: Vec<E> = variables
            .iter()
            .map(|v| functional.diff(v).simplify())
            .collect();

        let mut matrix = DMatrix::zeros(n, n);
        for i in 0..n {
            for j in i..n {
                let second = gradient[i].diff(variables[j]).simplify();
                let value =
                    second
                        .eval(at)
                        .map_err(|e| ShapeSpaceError::SingularFunctional {
                            row_var: variables[i].to_string(),
                            col_var: variables[j].to_string(),
                            detail: e.to_string(),
                        })?;
                matrix[(i, j)] = value;
                matrix[(j, i)] = value;
            }
        }
        Self::from_matrix(matrix)
    }

    /// Wrap an already-evaluated symmetric matrix, verifying the two-value structure.
    ///
    /// # Errors
    ///
    /// `AsymmetricHessian` on the first entry that differs from its kind's
    /// reference by more than `HESSIAN_SYMMETRY_REL` × the largest |entry|.
    pub fn from_matrix(matrix: DMatrix<f64>) -> Result<Self, ShapeSpaceError> {
        let n = matrix.nrows();
        if n < 2 || matrix.ncols() != n {
            return Err(ShapeSpaceError::TooFewVariables { found: n });
        }
        let scale = matrix.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let tol = tolerances::HESSIAN_SYMMETRY_REL * scale;
        let diagonal = matrix[(0, 0)];
        let off_diagonal = matrix[(0, 1)];

        for i in 0..n {
            let observed = matrix[(i, i)];
            if (observed - diagonal).abs() > tol {
                return Err(ShapeSpaceError::AsymmetricHessian {
                    entry: "diagonal",
                    row: i,
                    col: i,
                    expected: diagonal,
                    observed,
                });
            }
            for j in 0..n {
                if i == j {
                    continue;
                }
                let observed = matrix[(i, j)];
                if (observed - off_diagonal).abs() > tol {
                    return Err(ShapeSpaceError::AsymmetricHessian {
                        entry: "off-diagonal",
                        row: i,
                        col: j,
                        expected: off_diagonal,
                        observed,
                    });
                }
            }
        }
        Ok(Self {
            matrix,
            diagonal,
            off_diagonal,
        })
    }

    /// The full N × N matrix.
    #[must_use]
    pub const fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Common diagonal value `d = ∂²F/∂xᵢ²`.
    #[must_use]
    pub const fn diagonal(&self) -> f64 {
        self.diagonal
    }

    /// Common off-diagonal value `o = ∂²F/∂xᵢ∂xⱼ`.
    #[must_use]
    pub const fn off_diagonal(&self) -> f64 {
        self.off_diagonal
    }
}

/// The Hessian restricted to the constraint's tangent space, size (N−1).
#[derive(Debug, Clone)]
pub struct ReducedQuadraticForm {
    matrix: DMatrix<f64>,
}

impl ReducedQuadraticForm {
    /// `Jᵀ H J`, symmetrized to remove round-off asymmetry.
    #[must_use]
    pub fn project(ambient: &AmbientHessian, jacobian: &DMatrix<f64>) -> Self {
        let m = jacobian.transpose() * &ambient.matrix * jacobian;
        let matrix = (&m + m.transpose()) * 0.5;
        Self { matrix }
    }

    /// The reduced matrix.
    #[must_use]
    pub const fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Size N−1.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.matrix.nrows()
    }

    /// `s` such that the form equals `s·(I + 11ᵀ)`, if it does.
    ///
    /// This is the shape the fixed-sum gauge produces from a symmetric
    /// ambient Hessian, with `s = d − o`. For N = 3 the pattern is `[[2,1],[1,2]]`.
    #[must_use]
    pub fn pattern_scale(&self) -> Option<f64> {
        let n = self.dimension();
        if n == 0 {
            return None;
        }
        let s = self.matrix[(0, 0)] / 2.0;
        let scale = self.matrix.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let tol = tolerances::PATTERN_MATCH_REL * scale;
        for i in 0..n {
            for j in 0..n {
                let pattern = if i == j { 2.0 } else { 1.0 };
                if (self.matrix[(i, j)] - s * pattern).abs() > tol {
                    return None;
                }
            }
        }
        Some(s)
    }
}

/// One distinct eigenvalue and how many times it occurs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EigenLevel {
    /// Mean of the clustered eigenvalues
    pub value: f64,
    /// Number of eigenvalues in the cluster
    pub multiplicity: usize,
}

/// Eigenvalues (ascending) and eigenvectors of a reduced quadratic form.
#[derive(Debug, Clone)]
pub struct Eigenspectrum {
    eigenvalues: Vec<f64>,
    eigenvectors: DMatrix<f64>,
    levels: Vec<EigenLevel>,
}

impl Eigenspectrum {
    /// Diagonalize a reduced form.
    ///
    /// `SymmetricEigen` returns eigenvalues in no particular order; they are
    /// sorted ascending here and the eigenvector columns permuted to match.
    ///
    /// # Errors
    ///
    /// `Domain` if the decomposition produced a non-finite eigenvalue.
    pub fn of(form: &ReducedQuadraticForm) -> Result<Self, ShapeSpaceError> {
        let eigen = SymmetricEigen::new(form.matrix.clone());
        let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

        let eigenvalues: Vec<f64> = order.iter().map(|&k| eigen.eigenvalues[k]).collect();
        if let Some(bad) = eigenvalues.iter().find(|v| !v.is_finite()) {
            return Err(ShapeSpaceError::Domain(format!("eigenvalue {bad}")));
        }
        let columns: Vec<DVector<f64>> = order
            .iter()
            .map(|&k| eigen.eigenvectors.column(k).into_owned())
            .collect();
        let eigenvectors = DMatrix::from_columns(&columns);
        let levels = cluster(&eigenvalues);
        Ok(Self {
            eigenvalues,
            eigenvectors,
            levels,
        })
    }

    /// Eigenvalues, ascending.
    #[must_use]
    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    /// Unit eigenvector for the `k`-th eigenvalue (ascending order).
    #[must_use]
    pub fn eigenvector(&self, k: usize) -> Option<DVector<f64>> {
        (k < self.eigenvectors.ncols()).then(|| self.eigenvectors.column(k).into_owned())
    }

    /// Distinct levels with multiplicities, ascending.
    #[must_use]
    pub fn levels(&self) -> &[EigenLevel] {
        &self.levels
    }

    /// Smallest eigenvalue.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.eigenvalues.first().copied().unwrap_or(f64::NAN)
    }

    /// Largest eigenvalue.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.eigenvalues.last().copied().unwrap_or(f64::NAN)
    }

    /// Whether every eigenvalue is strictly positive (a genuine minimum).
    #[must_use]
    pub fn is_positive_definite(&self) -> bool {
        self.eigenvalues.first().is_some_and(|&v| v > 0.0)
    }

    /// `λ_max / λ_min`
    ///
    /// # Errors
    ///
    /// `DegenerateSpectrum` when λ_min vanishes relative to the largest |λ|.
    pub fn ratio(&self) -> Result<f64, ShapeSpaceError> {
        let min = self.min();
        let scale = self.eigenvalues.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        if self.eigenvalues.is_empty() || min.abs() <= tolerances::EIGENVALUE_ZERO_REL * scale {
            return Err(ShapeSpaceError::DegenerateSpectrum {
                min_eigenvalue: min,
            });
        }
        Ok(self.max() / min)
    }
}

/// Group sorted eigenvalues that agree within `EIGENVALUE_CLUSTER_REL`.
fn cluster(sorted: &[f64]) -> Vec<EigenLevel> {
    let scale = sorted.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let tol = tolerances::EIGENVALUE_CLUSTER_REL * scale;
    let mut levels: Vec<EigenLevel> = Vec::new();
    let mut first_in_level = f64::NAN;
    for &v in sorted {
        let joins = !levels.is_empty() && (v - first_in_level).abs() <= tol;
        match levels.last_mut() {
            Some(level) if joins => {
                #[allow(clippy::cast_precision_loss)]
                let k = level.multiplicity as f64;
                level.value = (level.value * k + v) / (k + 1.0);
                level.multiplicity += 1;
            }
            _ => {
                first_in_level = v;
                levels.push(EigenLevel {
                    value: v,
                    multiplicity: 1,
                });
            }
        }
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambient_accepts_two_value_matrix() {
        let h = DMatrix::from_row_slice(3, 3, &[5.0, 2.0, 2.0, 2.0, 5.0, 2.0, 2.0, 2.0, 5.0]);
        let a = AmbientHessian::from_matrix(h).expect("symmetric");
        assert!((a.diagonal() - 5.0).abs() < tolerances::EXACT_F64);
        assert!((a.off_diagonal() - 2.0).abs() < tolerances::EXACT_F64);
    }

    #[test]
    fn ambient_rejects_unequal_diagonal() {
        let h = DMatrix::from_row_slice(3, 3, &[5.0, 2.0, 2.0, 2.0, 5.0, 2.0, 2.0, 2.0, 6.0]);
        let err = AmbientHessian::from_matrix(h).unwrap_err();
        assert!(matches!(
            err,
            ShapeSpaceError::AsymmetricHessian {
                entry: "diagonal",
                row: 2,
                col: 2,
                ..
            }
        ));
    }

    #[test]
    fn ambient_rejects_unequal_off_diagonal() {
        let h = DMatrix::from_row_slice(3, 3, &[5.0, 2.0, 1.0, 2.0, 5.0, 2.0, 1.0, 2.0, 5.0]);
        let err = AmbientHessian::from_matrix(h).unwrap_err();
        assert!(matches!(
            err,
            ShapeSpaceError::AsymmetricHessian {
                entry: "off-diagonal",
                row: 0,
                col: 2,
                ..
            }
        ));
    }

    #[test]
    fn pattern_scale_detects_two_one_pattern() {
        let form = ReducedQuadraticForm {
            matrix: DMatrix::from_row_slice(2, 2, &[6.0, 3.0, 3.0, 6.0]),
        };
        let s = form.pattern_scale().expect("pattern");
        assert!((s - 3.0).abs() < tolerances::EXACT_F64);

        let other = ReducedQuadraticForm {
            matrix: DMatrix::from_row_slice(2, 2, &[6.0, 1.0, 1.0, 6.0]),
        };
        assert!(other.pattern_scale().is_none());
    }

    #[test]
    fn spectrum_sorted_with_multiplicities() {
        // I + 11ᵀ in 3 dimensions: eigenvalues 1, 1, 4
        let form = ReducedQuadraticForm {
            matrix: DMatrix::from_row_slice(3, 3, &[2.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 2.0]),
        };
        let spec = Eigenspectrum::of(&form).expect("eigen");
        let ev = spec.eigenvalues();
        assert!(ev.windows(2).all(|w| w[0] <= w[1]));
        assert!((ev[0] - 1.0).abs() < tolerances::EXACT_F64);
        assert!((ev[2] - 4.0).abs() < tolerances::EXACT_F64);
        assert_eq!(spec.levels().len(), 2);
        assert_eq!(spec.levels()[0].multiplicity, 2);
        assert_eq!(spec.levels()[1].multiplicity, 1);
        assert!((spec.ratio().expect("ratio") - 4.0).abs() < tolerances::EIGENVALUE_RATIO_ABS);
        assert!(spec.is_positive_definite());
    }

    #[test]
    fn eigenvectors_follow_sorted_order() {
        let form = ReducedQuadraticForm {
            matrix: DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 2.0]),
        };
        let spec = Eigenspectrum::of(&form).expect("eigen");
        // λ = 3 ↔ (1, 1)/√2
        let v = spec.eigenvector(1).expect("top vector");
        assert!((v[0].abs() - v[1].abs()).abs() < tolerances::EXACT_F64);
        assert!((v[0] * v[1]) > 0.0);
        assert!(spec.eigenvector(2).is_none());
    }

    #[test]
    fn zero_eigenvalue_makes_ratio_undefined() {
        let form = ReducedQuadraticForm {
            matrix: DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]),
        };
        let spec = Eigenspectrum::of(&form).expect("eigen");
        assert!(matches!(
            spec.ratio(),
            Err(ShapeSpaceError::DegenerateSpectrum { .. })
        ));
    }

    #[test]
    fn cluster_averages_near_equal_values() {
        let levels = cluster(&[1.0, 1.0 + 1e-12, 3.0]);
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].multiplicity, 2);
        assert!((levels[0].value - (1.0 + 5e-13)).abs() < 1e-15);
    }
}

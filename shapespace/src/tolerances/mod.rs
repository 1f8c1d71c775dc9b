// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized validation tolerances with justification.
//!
//! Every threshold used by the analyzer, the validator binaries, and the
//! derivation catalog is defined here with its rationale. No ad-hoc magic
//! numbers.
//!
//! # Tolerance categories
//!
//! | Category | Basis | Example |
//! |----------|-------|---------|
//! | Machine precision | IEEE 754 f64 | 1e-10 for exact arithmetic |
//! | Structural checks | symmetry of the critical point | 1e-9 Hessian symmetry |
//! | Derivations | preregistered bound | 0.01% for Koide Q |

/// Machine precision and curvature-analysis thresholds.
pub mod core;
/// Per-derivation acceptance bounds.
pub mod derivations;

pub use self::core::{
    CONSTRAINT_RESIDUAL_REL, CRITICAL_POINT_SYMMETRY_REL, EIGENVALUE_CLUSTER_REL,
    EIGENVALUE_RATIO_ABS, EIGENVALUE_ZERO_REL, EXACT_F64, GAUGE_COEFFICIENT_MIN,
    HESSIAN_SYMMETRY_REL, ITERATIVE_F64, PATTERN_MATCH_REL,
};

pub use derivations::{
    ALPHA_INVERSE_REL, KOIDE_Q_REL, KOIDE_THETA_REL, LEPTON_MASS_RECONSTRUCTION_REL,
    PROVEN_IDENTITY, TSIRELSON_REL, WEINBERG_ANGLE_REL,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::assertions_on_constants)] // constants sanity check
    fn tolerance_ordering() {
        assert!(EXACT_F64 < ITERATIVE_F64);
        assert!(GAUGE_COEFFICIENT_MIN < EXACT_F64);
        assert!(EIGENVALUE_ZERO_REL < EIGENVALUE_CLUSTER_REL);
        assert!(PROVEN_IDENTITY <= TSIRELSON_REL.max(EXACT_F64));
    }

    #[test]
    #[allow(clippy::assertions_on_constants)]
    fn tier_bounds_widen_with_uncertainty() {
        assert!(PROVEN_IDENTITY < KOIDE_Q_REL);
        assert!(KOIDE_Q_REL < WEINBERG_ANGLE_REL);
        assert!(ALPHA_INVERSE_REL < WEINBERG_ANGLE_REL);
    }

    #[test]
    fn all_tolerances_positive_and_finite() {
        for tol in [
            EXACT_F64,
            ITERATIVE_F64,
            HESSIAN_SYMMETRY_REL,
            CRITICAL_POINT_SYMMETRY_REL,
            CONSTRAINT_RESIDUAL_REL,
            EIGENVALUE_CLUSTER_REL,
            EIGENVALUE_RATIO_ABS,
            KOIDE_Q_REL,
            KOIDE_THETA_REL,
            TSIRELSON_REL,
            ALPHA_INVERSE_REL,
            WEINBERG_ANGLE_REL,
            LEPTON_MASS_RECONSTRUCTION_REL,
        ] {
            assert!(tol > 0.0 && tol.is_finite(), "bad tolerance {tol}");
        }
    }
}

// SPDX-License-Identifier: AGPL-3.0-only

//! Machine-precision and curvature-analysis tolerances.

// ═══════════════════════════════════════════════════════════════════
// Machine-precision tolerances (IEEE 754 f64)
// ═══════════════════════════════════════════════════════════════════

/// Tolerance for operations that should be exact in f64 arithmetic.
///
/// f64 has ~15.9 significant digits; 1e-10 allows 5 digits of accumulated
/// rounding in compositions of exact operations.
pub const EXACT_F64: f64 = 1e-10;

/// Tolerance for f64 operations with moderate accumulation.
///
/// Used when comparing eigenvalues returned by the symmetric eigensolver
/// against their closed forms.
pub const ITERATIVE_F64: f64 = 1e-8;

// ═══════════════════════════════════════════════════════════════════
// Curvature analyzer
// ═══════════════════════════════════════════════════════════════════

/// Relative agreement required between Hessian entries of the same kind.
///
/// Entries come from the same symbolic derivative evaluated at permuted
/// (but numerically identical) coordinates, so they differ only by the
/// evaluation order of the simplified tree. Scaled by the largest |entry|.
pub const HESSIAN_SYMMETRY_REL: f64 = 1e-9;

/// Relative agreement required between the coordinates of a critical point.
pub const CRITICAL_POINT_SYMMETRY_REL: f64 = 1e-12;

/// Allowed constraint residual at the critical point, relative to max(1, |rhs|).
pub const CONSTRAINT_RESIDUAL_REL: f64 = EXACT_F64;

/// Smallest usable |coefficient| of the eliminated variable.
///
/// Dividing by anything smaller amplifies round-off past `EXACT_F64`.
pub const GAUGE_COEFFICIENT_MIN: f64 = 1e-12;

/// Eigenvalues closer than this (relative to the largest |λ|) are one level.
pub const EIGENVALUE_CLUSTER_REL: f64 = 1e-9;

/// |λ_min| below this (relative to the largest |λ|) makes the ratio undefined.
pub const EIGENVALUE_ZERO_REL: f64 = 1e-12;

/// Absolute tolerance on the eigenvalue ratio λ_max/λ_min = N.
pub const EIGENVALUE_RATIO_ABS: f64 = EXACT_F64;

/// Relative agreement between the reduced form and `s·(I + 11ᵀ)`.
pub const PATTERN_MATCH_REL: f64 = EXACT_F64;

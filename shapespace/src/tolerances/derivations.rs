// SPDX-License-Identifier: AGPL-3.0-only

//! Acceptance tolerances for the derivation catalog.
//!
//! Proven identities are held to machine precision. Derived and speculative
//! predictions use the bound the prediction was preregistered with, never a
//! bound fitted to the observed error.

use super::core::EXACT_F64;

/// Identities that are exact by construction (2/N! = 1/N, 4·2π² = 8π², ...).
pub const PROVEN_IDENTITY: f64 = EXACT_F64;

/// Koide Q = 2·J_min against lepton masses.
///
/// Preregistered at 0.01%. Lepton mass uncertainty (τ: ±0.12 MeV) gives
/// ~7e-6 relative uncertainty on Q, well inside the bound.
pub const KOIDE_Q_REL: f64 = 1e-4;

/// Koide angle θ = 2·J_min² against the best-fit angle.
///
/// Preregistered at 0.01%, same bound as Q.
pub const KOIDE_THETA_REL: f64 = 1e-4;

/// Tsirelson bound 4·√(N·J_min/2) = 2√2.
///
/// Closed form on both sides; only sqrt round-off separates them.
pub const TSIRELSON_REL: f64 = 1e-12;

/// Inverse fine-structure constant √N·(8π² + 1/(2π)).
///
/// CODATA 2018 uncertainty is 1.5e-10 relative; the geometric formula is
/// accepted at 5e-5 (0.005%).
pub const ALPHA_INVERSE_REL: f64 = 5e-5;

/// Weak mixing angle sin²θ_W = J_min·ln 2 at the Z pole.
///
/// Scheme dependence of sin²θ_W (on-shell vs MS-bar) is ~3e-3 absolute;
/// 0.1% relative is the speculative-tier bound.
pub const WEINBERG_ANGLE_REL: f64 = 1e-3;

/// Charged-lepton masses reconstructed from θ = 2·J_min² with one fitted scale.
pub const LEPTON_MASS_RECONSTRUCTION_REL: f64 = 1e-3;

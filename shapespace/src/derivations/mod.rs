// SPDX-License-Identifier: AGPL-3.0-only

//! Closed-form predictions fed by the curvature analysis.
//!
//! The analyzer supplies two numbers: the dimension N and the eigenvalue
//! ratio, whose inverse is the correlation floor `J_min`. Everything below is
//! straight substitution into fixed formulas; the catalog pairs each formula
//! with its reference value, tolerance and tier.
//!
//! | Prediction | Formula | Tier |
//! |------------|---------|------|
//! | eigenvalue ratio | λ_max / λ_min = N | proven |
//! | selection | unique n with 2n = n! | proven |
//! | ħ | 2 / N! = J_min | proven |
//! | 8π² | dim(ℍ)·Vol(S³) | proven |
//! | Hall–Reginatto | (1/2) / 4 = 1/8 | proven |
//! | Koide Q | 2·J_min | derived |
//! | Koide θ | 2·J_min² | derived |
//! | Tsirelson | 4·√(N·J_min/2) | derived |
//! | α⁻¹ | √N·(8π² + 1/2π) | derived |
//! | sin²θ_W | J_min·ln 2 | speculative |
//! | lepton masses | Koide reconstruction at θ = 2·J_min² | speculative |

mod koide;

#[cfg(test)]
mod tests;

pub use koide::{koide_factors, koide_q, reconstruct_masses};

use std::f64::consts::{LN_2, PI, SQRT_2};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::curvature::CurvatureAnalysis;
use crate::error::ShapeSpaceError;
use crate::provenance;
use crate::tolerances;
use crate::validation::{PredictionRecord, Tier, ValidationReport};

/// Largest n searched by [`selection_dimension`]; n! stays exact in `u64`.
pub const SELECTION_SEARCH_MAX: u64 = 20;

/// Geometric inputs to every formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Invariants {
    /// Dimension N
    pub n: usize,
    /// Eigenvalue ratio (N for the symmetric complexity)
    pub ratio: f64,
    /// Correlation floor `1 / ratio`
    pub j_min: f64,
}

impl Invariants {
    /// Take N and the ratio from an analysis.
    ///
    /// Uses the stiff ratio λ_max/s when the reduced form has the fixed-sum
    /// pattern, so that N = 2 (one-dimensional tangent space) still yields
    /// `J_min = 1/2`. For N ≥ 3 the two ratios coincide.
    #[must_use]
    pub fn from_analysis(analysis: &CurvatureAnalysis) -> Self {
        let ratio = analysis.stiff_ratio().unwrap_or_else(|| analysis.ratio());
        Self {
            n: analysis.dimension(),
            ratio,
            j_min: ratio.recip(),
        }
    }

    /// Closed-form invariants, ratio exactly N.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn exact(n: usize) -> Self {
        let ratio = n as f64;
        Self {
            n,
            ratio,
            j_min: ratio.recip(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn n_f64(&self) -> f64 {
        self.n as f64
    }
}

/// `n!` in `u64`, `None` on overflow.
#[must_use]
pub fn factorial(n: u64) -> Option<u64> {
    (1..=n).try_fold(1_u64, u64::checked_mul)
}

/// The unique n in `1..=SELECTION_SEARCH_MAX` with `2n = n!`, if exactly one exists.
#[must_use]
pub fn selection_dimension() -> Option<u64> {
    let mut hits = (1..=SELECTION_SEARCH_MAX).filter(|&n| factorial(n) == Some(2 * n));
    let first = hits.next()?;
    hits.next().is_none().then_some(first)
}

/// `2 / N!`
///
/// N! is accumulated in f64, so the result stays finite for every N. Past
/// N = 170 the product saturates to infinity and ħ becomes 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn hbar(inv: &Invariants) -> f64 {
    let n_factorial: f64 = (1..=inv.n).map(|k| k as f64).product();
    2.0 / n_factorial
}

/// `dim(ℍ) · Vol(S³) = 4 · 2π²`
#[must_use]
pub fn eight_pi_squared() -> f64 {
    4.0 * (2.0 * PI * PI)
}

/// Hall–Reginatto ratio `T / I_F`: the uncertainty bound ½ over the Fisher
/// normalization 4.
#[must_use]
pub fn hall_reginatto_ratio() -> f64 {
    0.5 / 4.0
}

/// `Q = 2·J_min`
#[must_use]
pub fn koide_q_predicted(inv: &Invariants) -> f64 {
    2.0 * inv.j_min
}

/// `θ = 2·J_min²`
#[must_use]
pub fn koide_theta_predicted(inv: &Invariants) -> f64 {
    2.0 * inv.j_min * inv.j_min
}

/// `4·√(N·J_min/2)`
#[must_use]
pub fn tsirelson_bound(inv: &Invariants) -> f64 {
    4.0 * (inv.n_f64() * inv.j_min / 2.0).sqrt()
}

/// `√N·(8π² + 1/(2π))`
#[must_use]
pub fn alpha_inverse(inv: &Invariants) -> f64 {
    inv.n_f64().sqrt() * (eight_pi_squared() + 1.0 / (2.0 * PI))
}

/// `J_min·ln 2`
#[must_use]
pub fn weinberg_angle(inv: &Invariants) -> f64 {
    inv.j_min * LN_2
}

/// Every prediction derived from `inv`, in report order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn catalog(inv: &Invariants) -> Vec<PredictionRecord> {
    let n = inv.n_f64();
    let masses = provenance::LEPTON_MASSES.map(|r| r.value);
    let theta = koide_theta_predicted(inv);
    let (reconstructed, m0) = reconstruct_masses(theta, &masses);
    debug!(theta, m0, "Koide scale fitted");

    let mut records = vec![
        PredictionRecord::new(
            "Hessian eigenvalue ratio",
            inv.ratio,
            n,
            // validate() is relative; the ratio bound is absolute
            tolerances::EIGENVALUE_RATIO_ABS / n,
            Tier::Proven,
        ),
        PredictionRecord::new(
            "selection 2N = N!",
            selection_dimension().map_or(0.0, |d| d as f64),
            n,
            tolerances::PROVEN_IDENTITY,
            Tier::Proven,
        ),
        PredictionRecord::new(
            "ħ = 2/N! = J_min",
            hbar(inv),
            inv.j_min,
            tolerances::PROVEN_IDENTITY,
            Tier::Proven,
        ),
        PredictionRecord::new(
            "8π² = dim(ℍ)·Vol(S³)",
            eight_pi_squared(),
            8.0 * PI * PI,
            tolerances::PROVEN_IDENTITY,
            Tier::Proven,
        ),
        PredictionRecord::new(
            "Hall–Reginatto T/I_F",
            hall_reginatto_ratio(),
            1.0 / 8.0,
            tolerances::PROVEN_IDENTITY,
            Tier::Proven,
        ),
        PredictionRecord::new(
            "Koide Q = 2·J_min",
            koide_q_predicted(inv),
            koide_q(&masses),
            tolerances::KOIDE_Q_REL,
            Tier::Derived,
        ),
        PredictionRecord::new(
            "Koide θ = 2·J_min²",
            theta,
            provenance::KOIDE_THETA.value,
            tolerances::KOIDE_THETA_REL,
            Tier::Derived,
        ),
        PredictionRecord::new(
            "Tsirelson bound 4·√(N·J_min/2)",
            tsirelson_bound(inv),
            2.0 * SQRT_2,
            tolerances::TSIRELSON_REL,
            Tier::Derived,
        ),
        PredictionRecord::new(
            "α⁻¹ = √N·(8π² + 1/2π)",
            alpha_inverse(inv),
            provenance::ALPHA_INVERSE.value,
            tolerances::ALPHA_INVERSE_REL,
            Tier::Derived,
        ),
        PredictionRecord::new(
            "sin²θ_W = J_min·ln 2",
            weinberg_angle(inv),
            provenance::SIN2_THETA_W.value,
            tolerances::WEINBERG_ANGLE_REL,
            Tier::Speculative,
        ),
    ];
    records.extend(
        provenance::LEPTON_MASSES
            .iter()
            .zip(reconstructed)
            .map(|(reference, predicted)| {
                PredictionRecord::new(
                    format!("{} (Koide, θ = 2·J_min²)", reference.label),
                    predicted,
                    reference.value,
                    tolerances::LEPTON_MASS_RECONSTRUCTION_REL,
                    Tier::Speculative,
                )
            }),
    );
    records
}

/// Validate every record on the rayon pool and collect, in input order, into
/// one report.
///
/// `threads` sizes a dedicated pool; `None` uses the global pool. A pool that
/// cannot be built falls back to the global one.
///
/// # Errors
///
/// The first validator error among the records (in input order); no partial
/// report is returned.
pub fn run_catalog(
    name: &str,
    records: &[PredictionRecord],
    threads: Option<usize>,
) -> Result<ValidationReport, ShapeSpaceError> {
    let validate_all = || {
        records
            .par_iter()
            .map(PredictionRecord::validate)
            .collect::<Vec<_>>()
    };
    let results = match threads.map(|n| rayon::ThreadPoolBuilder::new().num_threads(n).build()) {
        Some(Ok(pool)) => pool.install(validate_all),
        Some(Err(e)) => {
            warn!(error = %e, "could not build rayon pool, using the global pool");
            validate_all()
        }
        None => validate_all(),
    };

    let mut report = ValidationReport::new(name);
    for verdict in results {
        report.push(verdict?);
    }
    Ok(report)
}

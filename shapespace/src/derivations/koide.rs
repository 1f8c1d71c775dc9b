// SPDX-License-Identifier: AGPL-3.0-only

//! Koide relations for the charged leptons.
//!
//! Parametrization: `√mₖ = M₀ (1 + √2 cos(θ + 2πk/3))`, k = 0, 1, 2.
//! For any θ this satisfies `Q = Σm / (Σ√m)² = 2/3` exactly; θ fixes the
//! mass ratios and M₀ the overall scale.

use std::f64::consts::{PI, SQRT_2};

/// `Σm / (Σ√m)²`
#[must_use]
pub fn koide_q(masses: &[f64; 3]) -> f64 {
    let sum: f64 = masses.iter().sum();
    let root_sum: f64 = masses.iter().map(|m| m.sqrt()).sum();
    sum / (root_sum * root_sum)
}

/// The three factors `1 + √2 cos(θ + 2πk/3)`, sorted ascending.
#[must_use]
pub fn koide_factors(theta: f64) -> [f64; 3] {
    let mut g = [0.0, 1.0, 2.0].map(|k: f64| SQRT_2.mul_add((theta + 2.0 * PI * k / 3.0).cos(), 1.0));
    g.sort_by(f64::total_cmp);
    g
}

/// Reconstruct three masses (ascending) from θ, fitting only the scale M₀.
///
/// M₀ is the least-squares fit of `M₀·gₖ` to `√mₖ` with the smallest factor
/// paired with the lightest mass: `M₀ = Σ gₖ√mₖ / Σ gₖ²`.
#[must_use]
pub fn reconstruct_masses(theta: f64, measured: &[f64; 3]) -> ([f64; 3], f64) {
    let g = koide_factors(theta);
    let mut sorted = *measured;
    sorted.sort_by(f64::total_cmp);
    let roots = sorted.map(f64::sqrt);
    let num: f64 = g.iter().zip(&roots).map(|(gk, sk)| gk * sk).sum();
    let den: f64 = g.iter().map(|gk| gk * gk).sum();
    let m0 = num / den;
    (g.map(|gk| (m0 * gk).powi(2)), m0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provenance::LEPTON_MASSES;
    use crate::tolerances;

    fn leptons() -> [f64; 3] {
        LEPTON_MASSES.map(|r| r.value)
    }

    #[test]
    fn measured_q_is_near_two_thirds() {
        let q = koide_q(&leptons());
        assert!((q - 2.0 / 3.0).abs() / q < tolerances::KOIDE_Q_REL, "Q = {q}");
    }

    #[test]
    fn parametrization_gives_exact_two_thirds() {
        for theta in [0.0, 0.1, 2.0 / 9.0, 0.25] {
            let masses = koide_factors(theta).map(|g| (3.0 * g).powi(2));
            assert!((koide_q(&masses) - 2.0 / 3.0).abs() < tolerances::EXACT_F64);
        }
    }

    #[test]
    fn factors_are_sorted() {
        let g = koide_factors(2.0 / 9.0);
        assert!(g[0] < g[1] && g[1] < g[2]);
        assert!(g[0] > 0.0);
    }

    #[test]
    fn reconstruction_at_two_ninths_matches_pdg() {
        let measured = leptons();
        let (predicted, m0) = reconstruct_masses(2.0 / 9.0, &measured);
        assert!((m0 - 17.7155).abs() < 1e-2, "M0 = {m0}");
        for (p, m) in predicted.iter().zip(&measured) {
            let rel = (p - m).abs() / m;
            assert!(rel < tolerances::LEPTON_MASS_RECONSTRUCTION_REL, "{p} vs {m}");
        }
    }

    #[test]
    fn reconstruction_ignores_input_order() {
        let measured = leptons();
        let shuffled = [measured[2], measured[0], measured[1]];
        let (a, _) = reconstruct_masses(2.0 / 9.0, &measured);
        let (b, _) = reconstruct_masses(2.0 / 9.0, &shuffled);
        assert_eq!(a, b);
    }
}

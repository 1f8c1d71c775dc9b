// SPDX-License-Identifier: AGPL-3.0-only

//! Provenance metadata for every measured reference value.
//!
//! Each prediction in [`crate::derivations`] is compared against one of the
//! constants below. Values are copied verbatim from the cited tables; none is
//! adjusted to improve agreement.
//!
//! ## Data Sources
//!
//! | Dataset / Publication | DOI | Notes |
//! |----------------------|-----|-------|
//! | CODATA 2018 | [10.1103/RevModPhys.93.025010](https://doi.org/10.1103/RevModPhys.93.025010) | fine-structure constant |
//! | PDG Review of Particle Physics 2022 | [10.1093/ptep/ptac097](https://doi.org/10.1093/ptep/ptac097) | lepton masses, sin²θ_W(M_Z) MS-bar |
//! | Koide (1983) | [10.1016/0370-2693(83)90901-6](https://doi.org/10.1016/0370-2693(83)90901-6) | mass formula and phase θ |

use serde::Serialize;

/// A measured constant with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceValue {
    /// Human-readable label
    pub label: &'static str,
    /// Central value
    pub value: f64,
    /// One-sigma uncertainty, when the source quotes one
    pub sigma: Option<f64>,
    /// Unit (empty for dimensionless)
    pub unit: &'static str,
    /// Table or paper the value is taken from
    pub source: &'static str,
    /// Edition or publication year
    pub edition: &'static str,
}

impl ReferenceValue {
    /// Whether `value` lies within `n_sigma` quoted uncertainties.
    ///
    /// `None` when the source quotes no uncertainty.
    #[must_use]
    pub fn within_sigma(&self, value: f64, n_sigma: f64) -> Option<bool> {
        self.sigma
            .map(|s| (value - self.value).abs() <= n_sigma * s)
    }
}

// ═══════════════════════════════════════════════════════════════════
// Electroweak
// ═══════════════════════════════════════════════════════════════════

/// Inverse fine-structure constant α⁻¹ at zero momentum transfer.
pub const ALPHA_INVERSE: ReferenceValue = ReferenceValue {
    label: "inverse fine-structure constant",
    value: 137.035_999_084,
    sigma: Some(0.000_000_021),
    unit: "",
    source: "CODATA recommended values",
    edition: "2018",
};

/// Weak mixing angle sin²θ_W (MS-bar, at M_Z).
pub const SIN2_THETA_W: ReferenceValue = ReferenceValue {
    label: "weak mixing angle sin²θ_W(M_Z)",
    value: 0.231_22,
    sigma: Some(0.000_04),
    unit: "",
    source: "PDG Review of Particle Physics, electroweak model",
    edition: "2022",
};

// ═══════════════════════════════════════════════════════════════════
// Charged leptons
// ═══════════════════════════════════════════════════════════════════

/// Electron mass.
pub const ELECTRON_MASS: ReferenceValue = ReferenceValue {
    label: "electron mass",
    value: 0.510_998_95,
    sigma: Some(0.000_000_15),
    unit: "MeV",
    source: "PDG Review of Particle Physics, lepton summary table",
    edition: "2022",
};

/// Muon mass.
pub const MUON_MASS: ReferenceValue = ReferenceValue {
    label: "muon mass",
    value: 105.658_375_5,
    sigma: Some(0.000_002_3),
    unit: "MeV",
    source: "PDG Review of Particle Physics, lepton summary table",
    edition: "2022",
};

/// Tau mass.
pub const TAU_MASS: ReferenceValue = ReferenceValue {
    label: "tau mass",
    value: 1776.86,
    sigma: Some(0.12),
    unit: "MeV",
    source: "PDG Review of Particle Physics, lepton summary table",
    edition: "2022",
};

/// Charged lepton masses, lightest first.
pub const LEPTON_MASSES: [ReferenceValue; 3] = [ELECTRON_MASS, MUON_MASS, TAU_MASS];

/// Phase θ of the Koide parametrization `√mₖ = √M₀ (1 + √2 cos(θ + 2πk/3))`
/// fitted to the charged lepton masses.
pub const KOIDE_THETA: ReferenceValue = ReferenceValue {
    label: "Koide phase θ",
    value: 0.222_228,
    sigma: None,
    unit: "rad",
    source: "Koide, Phys. Lett. B 120, 161 (fit to PDG masses)",
    edition: "1983",
};

/// Every reference value, in the order the derivation report uses them.
pub const ALL_REFERENCES: [ReferenceValue; 6] = [
    ALPHA_INVERSE,
    SIN2_THETA_W,
    ELECTRON_MASS,
    MUON_MASS,
    TAU_MASS,
    KOIDE_THETA,
];

/// Print the provenance table for the reference values in use.
pub fn print_references() {
    println!("  Reference values:");
    for r in &ALL_REFERENCES {
        let sigma = r.sigma.map_or_else(|| "n/q".to_string(), |s| format!("{s:.1e}"));
        println!(
            "    {:<34} {:>16.9} ± {:<8} {:<4} {} ({})",
            r.label, r.value, sigma, r.unit, r.source, r.edition
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_positive_and_finite() {
        for r in &ALL_REFERENCES {
            assert!(r.value.is_finite() && r.value > 0.0, "{}", r.label);
            if let Some(s) = r.sigma {
                assert!(s > 0.0 && s < r.value, "{}", r.label);
            }
        }
    }

    #[test]
    fn lepton_masses_ascending() {
        assert!(LEPTON_MASSES.windows(2).all(|w| w[0].value < w[1].value));
        assert!(LEPTON_MASSES.iter().all(|m| m.unit == "MeV"));
    }

    #[test]
    fn every_reference_has_a_source() {
        for r in &ALL_REFERENCES {
            assert!(!r.source.is_empty(), "{}", r.label);
            assert!(!r.edition.is_empty(), "{}", r.label);
        }
    }

    #[test]
    fn within_sigma_uses_quoted_uncertainty() {
        assert_eq!(TAU_MASS.within_sigma(1776.9, 1.0), Some(true));
        assert_eq!(TAU_MASS.within_sigma(1777.5, 2.0), Some(false));
        assert_eq!(KOIDE_THETA.within_sigma(0.2222, 1.0), None);
    }
}

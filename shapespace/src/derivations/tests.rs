// SPDX-License-Identifier: AGPL-3.0-only

use super::*;
use crate::curvature::analyze_symmetric_complexity;

#[test]
fn factorial_values_and_overflow() {
    assert_eq!(factorial(0), Some(1));
    assert_eq!(factorial(3), Some(6));
    assert_eq!(factorial(20), Some(2_432_902_008_176_640_000));
    assert_eq!(factorial(21), None);
}

#[test]
fn selection_picks_three() {
    assert_eq!(selection_dimension(), Some(3));
}

#[test]
fn invariants_from_triangle_analysis() {
    let analysis = analyze_symmetric_complexity(3, 1.0).expect("analysis");
    let inv = Invariants::from_analysis(&analysis);
    assert_eq!(inv.n, 3);
    assert!((inv.ratio - 3.0).abs() < tolerances::EIGENVALUE_RATIO_ABS);
    assert!((inv.j_min - 1.0 / 3.0).abs() < tolerances::EXACT_F64);
}

#[test]
fn two_variable_invariants_use_stiff_ratio() {
    let analysis = analyze_symmetric_complexity(2, 1.0).expect("analysis");
    let inv = Invariants::from_analysis(&analysis);
    assert!((inv.j_min - 0.5).abs() < tolerances::EXACT_F64);
}

#[test]
fn closed_forms_at_n_three() {
    let inv = Invariants::exact(3);
    assert!((hbar(&inv) - inv.j_min).abs() < tolerances::EXACT_F64);
    assert!((koide_q_predicted(&inv) - 2.0 / 3.0).abs() < tolerances::EXACT_F64);
    assert!((koide_theta_predicted(&inv) - 2.0 / 9.0).abs() < tolerances::EXACT_F64);
    assert!((tsirelson_bound(&inv) - 2.0 * SQRT_2).abs() < tolerances::EXACT_F64);
    assert!((hall_reginatto_ratio() - 0.125).abs() < f64::EPSILON);
    let alpha = alpha_inverse(&inv);
    assert!((alpha - 137.032_914_6).abs() < 1e-6, "α⁻¹ = {alpha}");
}

#[test]
fn hbar_only_matches_j_min_at_three() {
    for n in [2, 4, 5] {
        let inv = Invariants::exact(n);
        assert!((hbar(&inv) - inv.j_min).abs() > 1e-3, "N = {n}");
    }
}

#[test]
fn hbar_stays_finite_past_integer_factorials() {
    for n in [20, 21, 30, 170, 200] {
        let v = hbar(&Invariants::exact(n));
        assert!(v.is_finite() && v >= 0.0, "N = {n}: {v}");
    }
    let at_twenty = hbar(&Invariants::exact(20));
    #[allow(clippy::cast_precision_loss)]
    let exact = 2.0 / factorial(20).expect("20! fits in u64") as f64;
    assert!((at_twenty - exact).abs() <= tolerances::EXACT_F64 * exact);
}

#[test]
fn catalog_runs_to_verdicts_for_large_n() {
    let records = catalog(&Invariants::exact(21));
    let report = run_catalog("n21", &records, None).expect("every record is finite");
    assert_eq!(report.total_count(), records.len());
    assert!(report.failed_labels().iter().any(|l| l.starts_with("ħ")));
}

#[test]
fn ratio_record_bound_is_absolute() {
    let mut inv = Invariants::exact(8);
    inv.ratio = 8.0 + 5.0 * tolerances::EIGENVALUE_RATIO_ABS;
    let verdict = catalog(&inv)[0].validate().expect("valid");
    assert!(!verdict.passed, "{verdict}");
    inv.ratio = 8.0 + 0.5 * tolerances::EIGENVALUE_RATIO_ABS;
    let verdict = catalog(&inv)[0].validate().expect("valid");
    assert!(verdict.passed, "{verdict}");
}

#[test]
fn catalog_is_complete_and_ordered() {
    let records = catalog(&Invariants::exact(3));
    assert_eq!(records.len(), 13);
    assert_eq!(records[0].label, "Hessian eigenvalue ratio");
    let tiers: Vec<Tier> = records.iter().map(|r| r.tier).collect();
    assert!(tiers.windows(2).all(|w| w[0] <= w[1]), "{tiers:?}");
    assert_eq!(tiers.iter().filter(|t| **t == Tier::Proven).count(), 5);
    assert_eq!(tiers.iter().filter(|t| **t == Tier::Derived).count(), 4);
    assert_eq!(tiers.iter().filter(|t| **t == Tier::Speculative).count(), 4);
}

#[test]
fn catalog_passes_for_triangle() {
    let analysis = analyze_symmetric_complexity(3, 1.0).expect("analysis");
    let records = catalog(&Invariants::from_analysis(&analysis));
    let report = run_catalog("derivations", &records, None).expect("valid records");
    assert_eq!(report.total_count(), records.len());
    assert!(report.all_passed(), "{}", report.format_summary());
}

#[test]
fn catalog_fails_for_other_dimensions() {
    let records = catalog(&Invariants::exact(4));
    let report = run_catalog("n4", &records, None).expect("valid records");
    let failed = report.failed_labels();
    assert!(failed.iter().any(|l| l.starts_with("Koide Q")));
    assert!(failed.iter().any(|l| l.starts_with("selection")));
    // structural identities hold for every N
    assert!(!failed.iter().any(|l| l.starts_with("Hessian")));
    assert!(!failed.iter().any(|l| l.starts_with("8π²")));
}

#[test]
fn run_catalog_preserves_order_on_a_dedicated_pool() {
    let records = catalog(&Invariants::exact(3));
    let report = run_catalog("pooled", &records, Some(2)).expect("valid records");
    let labels: Vec<&str> = report.verdicts.iter().map(|v| v.label.as_str()).collect();
    let expected: Vec<&str> = records.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, expected);
}

#[test]
fn run_catalog_rejects_bad_records_wholesale() {
    let records = vec![
        PredictionRecord::new("fine", 1.0, 1.0, 0.0, Tier::Proven),
        PredictionRecord::new("zero reference", 1.0, 0.0, 0.1, Tier::Derived),
        PredictionRecord::new("negative tolerance", 1.0, 1.0, -1.0, Tier::Derived),
    ];
    let err = run_catalog("bad", &records, None).unwrap_err();
    assert_eq!(
        err,
        ShapeSpaceError::UndefinedReference {
            label: "zero reference".into()
        }
    );
}

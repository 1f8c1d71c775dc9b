// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests: functional → analyzer → ratio → validator → report.
//!
//! Exercises only the public API, the way the validation binaries use it.

use std::thread;

use shapespace::curvature::{
    analyze_symmetric_complexity, reduce_and_diagonalize, CriticalPoint, Functional,
    LinearConstraint,
};
use shapespace::derivations::{self, Invariants};
use shapespace::error::ShapeSpaceError;
use shapespace::symbolic::{Expr, Symbolic};
use shapespace::tolerances;
use shapespace::validation::{summarize, validate, PredictionRecord, Tier, ValidationReport};

#[test]
fn triangle_ratio_round_trips_through_validator() {
    let analysis = analyze_symmetric_complexity(3, 1.0).expect("analysis");
    let verdict = validate("ratio", analysis.ratio(), 3.0, 1e-9, Tier::Proven).expect("valid");
    assert!(verdict.passed, "{verdict}");
}

#[test]
fn hand_built_triangle_matches_builder() {
    // √(a² + b² + c²)·(1/a + 1/b + 1/c) written out by hand
    let (a, b, c) = (Expr::var("a"), Expr::var("b"), Expr::var("c"));
    let f = (a.clone().powi(2) + b.clone().powi(2) + c.clone().powi(2)).sqrt()
        * (a.recip() + b.recip() + c.recip());
    let vars = ["a", "b", "c"];
    let point = CriticalPoint::symmetric(&vars, 1.0).expect("point");
    let analysis = reduce_and_diagonalize(&f, &vars, &point, &LinearConstraint::fixed_sum(3, 3.0))
        .expect("analysis");

    let builder = analyze_symmetric_complexity(3, 1.0).expect("builder");
    assert!((analysis.ratio() - builder.ratio()).abs() < tolerances::EIGENVALUE_RATIO_ABS);
    let s = analysis.reduced().pattern_scale().expect("[[2,1],[1,2]] pattern");
    let ev = analysis.spectrum().eigenvalues();
    assert!((ev[0] - s).abs() < tolerances::ITERATIVE_F64);
    assert!((ev[1] - 3.0 * s).abs() < tolerances::ITERATIVE_F64);
}

#[test]
fn ratio_sweep_validates_for_every_n() {
    let mut report = ValidationReport::new("sweep");
    for n in 3..=8_usize {
        let analysis = analyze_symmetric_complexity(n, 1.5).expect("analysis");
        #[allow(clippy::cast_precision_loss)]
        let expected = n as f64;
        report
            .check(
                &format!("N={n}"),
                analysis.ratio(),
                expected,
                tolerances::EIGENVALUE_RATIO_ABS,
                Tier::Proven,
            )
            .expect("valid");
    }
    assert!(report.all_passed(), "{}", report.format_summary());
    let summary = report.summarize().expect("non-empty");
    assert_eq!(summary.by_tier[&Tier::Proven].passed, 6);
}

#[test]
fn analyzer_accepts_any_symbolic_backend() {
    // Wrapper forwarding to Expr, standing in for a different algebra engine
    #[derive(Clone)]
    struct Wrapped(Expr);

    impl std::fmt::Display for Wrapped {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            std::fmt::Display::fmt(&self.0, f)
        }
    }

    impl Symbolic for Wrapped {
        fn diff(&self, var: &str) -> Self {
            Self(self.0.diff(var))
        }
        fn eval(&self, at: &shapespace::symbolic::Bindings) -> Result<f64, ShapeSpaceError> {
            self.0.eval(at)
        }
        fn subs(&self, var: &str, value: f64) -> Self {
            Self(self.0.subs(var, value))
        }
        fn simplify(&self) -> Self {
            Self(self.0.simplify())
        }
    }

    let base = Functional::symmetric_complexity(4).expect("functional");
    let f = Functional::new(Wrapped(base.expr().clone()), base.variables().to_vec())
        .expect("wrapped");
    let point = f.symmetric_point(1.0).expect("point");
    let analysis = f.analyze(&point, &f.fixed_sum_constraint(1.0)).expect("analysis");
    assert!((analysis.ratio() - 4.0).abs() < tolerances::EIGENVALUE_RATIO_ABS);
}

#[test]
fn failed_analysis_surfaces_a_typed_error() {
    let f = Functional::symmetric_complexity(3).expect("functional");
    let point = f.symmetric_point(1.0).expect("point");
    let gauge = LinearConstraint::new(vec![1.0, 1.0, 0.0], 2.0, 2);
    let err = f.analyze(&point, &gauge).unwrap_err();
    assert!(matches!(err, ShapeSpaceError::DegenerateConstraint { .. }));
    assert!(err.to_string().contains("cannot eliminate"));
}

#[test]
fn per_thread_reports_merge_into_the_sequential_result() {
    let records = derivations::catalog(&Invariants::exact(3));
    let (left, right) = records.split_at(records.len() / 2);

    let handles: Vec<_> = [left.to_vec(), right.to_vec()]
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            thread::spawn(move || {
                let mut report = ValidationReport::new(&format!("worker {i}"));
                for r in &chunk {
                    report.record(r).expect("valid record");
                }
                report
            })
        })
        .collect();

    let mut merged = ValidationReport::new("merged");
    for h in handles {
        merged.merge(h.join().expect("worker thread"));
    }
    let sequential = derivations::run_catalog("sequential", &records, Some(1)).expect("run");
    assert_eq!(merged.verdicts, sequential.verdicts);
    assert_eq!(
        merged.summarize().expect("non-empty"),
        sequential.summarize().expect("non-empty")
    );
}

#[test]
fn full_catalog_passes_from_analyzer_output() {
    let analysis = analyze_symmetric_complexity(3, 1.0).expect("analysis");
    let records = derivations::catalog(&Invariants::from_analysis(&analysis));
    let report = derivations::run_catalog("catalog", &records, None).expect("run");
    assert!(report.all_passed(), "{}", report.format_summary());
    let summary = report.summarize().expect("non-empty");
    assert_eq!(summary.total, records.len());
    assert!((summary.pass_rate - 1.0).abs() < f64::EPSILON);
}

#[test]
fn mixed_report_summary_counts() {
    let records = [
        PredictionRecord::new("p1", 1.0, 1.0, 0.0, Tier::Proven),
        PredictionRecord::new("d1", 1.1, 1.0, 0.01, Tier::Derived),
        PredictionRecord::new("d2", 1.001, 1.0, 0.01, Tier::Derived),
        PredictionRecord::new("s1", 0.5, 1.0, 0.1, Tier::Speculative),
        PredictionRecord::new("s2", 0.95, 1.0, 0.1, Tier::Speculative),
    ];
    let verdicts: Vec<_> = records
        .iter()
        .map(|r| r.validate().expect("valid"))
        .collect();
    let summary = summarize(&verdicts).expect("non-empty");
    assert_eq!((summary.passed, summary.failed), (3, 2));
    assert!((summary.pass_rate - 0.6).abs() < tolerances::EXACT_F64);
    assert_eq!(summary.by_tier[&Tier::Derived].failed, 1);
    assert_eq!(summary.by_tier[&Tier::Speculative].failed, 1);
}

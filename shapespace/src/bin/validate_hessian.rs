// SPDX-License-Identifier: AGPL-3.0-only

//! Validate the constrained Hessian spectrum of the symmetric complexity
//!
//! F(x₁ … x_N) = √(Σ xᵢ²) · Σ 1/xᵢ at xᵢ = 1 under Σ xᵢ = N.
//!
//! Closed form: d − o = 3√N, reduced form (d − o)·(I + 11ᵀ), eigenvalues
//! 3√N (×(N−2)) and 3N√N, ratio N, critical value N^{3/2}.
//!
//! Checks: headline N from `SHAPESPACE_N`, sweep 2..=`SHAPESPACE_MAX_N`,
//! scale independence, and the analyzer's rejection of a non-symmetric
//! functional.

use std::process;

use shapespace::config::{self, RunConfig};
use shapespace::curvature::{analyze_symmetric_complexity, Functional};
use shapespace::error::ShapeSpaceError;
use shapespace::symbolic::Expr;
use shapespace::tolerances;
use shapespace::validation::{Tier, ValidationReport};

fn main() {
    config::init_tracing();
    let cfg = RunConfig::from_env();

    println!("═══════════════════════════════════════════════════════════");
    println!("  Shape-Space Hessian Validation");
    println!("  F = √(Σx²)·Σ1/x at the symmetric point, gauge Σx = N");
    println!("═══════════════════════════════════════════════════════════\n");

    match run(&cfg) {
        Ok(report) => {
            if cfg.json {
                match report.to_json() {
                    Ok(json) => println!("{json}"),
                    Err(e) => eprintln!("  JSON output failed: {e}"),
                }
            }
            report.finish();
        }
        Err(e) => {
            println!("  ✗ analysis failed: {e}");
            process::exit(1);
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn run(cfg: &RunConfig) -> Result<ValidationReport, ShapeSpaceError> {
    let mut report = ValidationReport::new("hessian");
    let n = cfg.n;
    let nf = n as f64;

    // ─── Headline dimension ───────────────────────────────────────
    println!("── N = {n} ──");
    let analysis = analyze_symmetric_complexity(n, 1.0)?;
    let ambient = analysis.ambient();
    println!("  F(1, …, 1)       = {:.12}", analysis.critical_value());
    println!("  d, o             = {:.12}, {:.12}", ambient.diagonal(), ambient.off_diagonal());
    println!("  reduced form     ={}", analysis.reduced().matrix());
    println!("  eigenvalues      = {:?}", analysis.spectrum().eigenvalues());
    for level in analysis.spectrum().levels() {
        println!("    λ = {:.12} (×{})", level.value, level.multiplicity);
    }
    println!("  λ_max / λ_min    = {:.12}", analysis.ratio());
    println!();

    let s_expected = 3.0 * nf.sqrt();
    report.check(
        &format!("critical value N^(3/2), N={n}"),
        analysis.critical_value(),
        nf.powf(1.5),
        tolerances::EXACT_F64,
        Tier::Proven,
    )?;
    report.check(
        &format!("d − o = 3√N, N={n}"),
        ambient.diagonal() - ambient.off_diagonal(),
        s_expected,
        tolerances::EXACT_F64,
        Tier::Proven,
    )?;
    let pattern = analysis.reduced().pattern_scale();
    report.check(
        &format!("reduced form s·(I + 11ᵀ), N={n}"),
        pattern.unwrap_or(0.0),
        s_expected,
        tolerances::PATTERN_MATCH_REL,
        Tier::Proven,
    )?;
    report.check(
        &format!("λ_max = N·(d − o), N={n}"),
        analysis.spectrum().max(),
        nf * s_expected,
        tolerances::ITERATIVE_F64,
        Tier::Proven,
    )?;

    // ─── Ratio sweep ──────────────────────────────────────────────
    println!("── Ratio sweep N = 2..={} ──", cfg.max_n);
    for k in 2..=cfg.max_n {
        let a = analyze_symmetric_complexity(k, 1.0)?;
        let kf = k as f64;
        let stiff = a.stiff_ratio().unwrap_or(0.0);
        println!("  N = {k:>2}: ratio = {:.12}, λ_max/s = {stiff:.12}", a.ratio());
        report.check(
            &format!("λ_max/(d − o) = N, N={k}"),
            stiff,
            kf,
            tolerances::EIGENVALUE_RATIO_ABS,
            Tier::Proven,
        )?;
        if k >= 3 {
            report.check(
                &format!("λ_max/λ_min = N, N={k}"),
                a.ratio(),
                kf,
                tolerances::EIGENVALUE_RATIO_ABS,
                Tier::Proven,
            )?;
        }
    }
    println!();

    // ─── Scale independence ───────────────────────────────────────
    println!("── Scale independence ──");
    for scale in [0.5, 2.0, 7.25] {
        let a = analyze_symmetric_complexity(n, scale)?;
        println!("  x = {scale:<5}: ratio = {:.12}", a.ratio());
        report.check(
            &format!("ratio at x = {scale}, N={n}"),
            a.ratio(),
            analysis.ratio(),
            tolerances::EIGENVALUE_RATIO_ABS,
            Tier::Proven,
        )?;
    }
    println!();

    // ─── Symmetry precondition ────────────────────────────────────
    println!("── Non-symmetric functional is rejected ──");
    let lopsided = Functional::new(
        Expr::var("a").powi(2) + Expr::constant(2.0) * Expr::var("b").powi(2),
        ["a", "b"],
    )?;
    let point = lopsided.symmetric_point(1.0)?;
    let rejected = matches!(
        lopsided.analyze(&point, &lopsided.fixed_sum_constraint(1.0)),
        Err(ShapeSpaceError::AsymmetricHessian { .. })
    );
    println!(
        "  {} a² + 2b² → AsymmetricHessian",
        if rejected { "✓" } else { "✗" }
    );
    report.check(
        "asymmetric Hessian rejected",
        f64::from(u8::from(rejected)),
        1.0,
        0.0,
        Tier::Proven,
    )?;

    Ok(report)
}

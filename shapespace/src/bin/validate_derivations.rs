// SPDX-License-Identifier: AGPL-3.0-only

//! Validate the derivation catalog against measured constants
//!
//! The curvature analysis for N = `SHAPESPACE_N` supplies the eigenvalue
//! ratio; every prediction in `derivations::catalog` is substituted from it
//! and checked against its reference within the tolerance in
//! `tolerances::derivations`.
//!
//! Reference: CODATA 2018, PDG 2022 (see `provenance`)

use std::process;

use shapespace::config::{self, RunConfig};
use shapespace::curvature::analyze_symmetric_complexity;
use shapespace::derivations::{self, Invariants};
use shapespace::error::ShapeSpaceError;
use shapespace::provenance;
use shapespace::validation::{Tier, ValidationReport};

fn main() {
    config::init_tracing();
    let cfg = RunConfig::from_env();

    println!("═══════════════════════════════════════════════════════════");
    println!("  Shape-Space Derivation Catalog");
    println!("  eigenvalue ratio → closed-form predictions → verdicts");
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
            println!("  ✗ derivation inconclusive: {e}");
            process::exit(1);
        }
    }
}

fn run(cfg: &RunConfig) -> Result<ValidationReport, ShapeSpaceError> {
    let analysis = analyze_symmetric_complexity(cfg.n, 1.0)?;
    let inv = Invariants::from_analysis(&analysis);

    println!("── Invariants ──");
    println!("  N                = {}", inv.n);
    println!("  λ_max / λ_min    = {:.12}", inv.ratio);
    println!("  J_min            = {:.12}", inv.j_min);
    println!();

    provenance::print_references();
    println!();

    let records = derivations::catalog(&inv);
    let report = derivations::run_catalog("derivations", &records, cfg.threads)?;

    for tier in Tier::ALL {
        println!("── {tier} ──");
        for verdict in report.verdicts.iter().filter(|v| v.tier == tier) {
            println!("{verdict}");
        }
    }

    Ok(report)
}

// SPDX-License-Identifier: AGPL-3.0-only

//! Meta-validator: runs every shapespace validation suite in sequence.
//!
//! Exit code is 0 only if ALL suites pass.
//!
//! # Validation suites (in order)
//!
//! | Binary | Domain |
//! |--------|--------|
//! | `validate_hessian` | constrained Hessian spectrum, ratio sweep |
//! | `validate_derivations` | prediction catalog vs. CODATA / PDG |
//!
//! Suites are run from the directory of this executable when built there,
//! otherwise through `cargo run --release`.

use std::path::PathBuf;
use std::process::{self, Command};
use std::time::Instant;

use shapespace::config;
use tracing::debug;

/// A validation suite to run.
struct Suite {
    name: &'static str,
    binary: &'static str,
}

const SUITES: &[Suite] = &[
    Suite {
        name: "Constrained Hessian",
        binary: "validate_hessian",
    },
    Suite {
        name: "Derivation Catalog",
        binary: "validate_derivations",
    },
];

/// Sibling executable next to this one, if it was built.
fn sibling(binary: &str) -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let path = exe
        .parent()?
        .join(format!("{binary}{}", std::env::consts::EXE_SUFFIX));
    path.is_file().then_some(path)
}

fn command_for(suite: &Suite) -> Command {
    if let Some(path) = sibling(suite.binary) {
        debug!(path = %path.display(), "running built suite");
        return Command::new(path);
    }
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--release", "--bin", suite.binary])
        .current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd
}

fn main() {
    config::init_tracing();

    println!("═══════════════════════════════════════════════════════════");
    println!("  shapespace Validation Suite");
    println!("  curvature analysis → derivation catalog");
    println!("═══════════════════════════════════════════════════════════\n");

    let t_total = Instant::now();
    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut failures: Vec<&str> = Vec::new();

    for suite in SUITES {
        let t_suite = Instant::now();
        print!("  RUN   {:<30} ", suite.name);

        match command_for(suite).output() {
            Ok(output) => {
                let elapsed = t_suite.elapsed().as_secs_f64();
                if output.status.success() {
                    println!("PASS  ({elapsed:.1}s)");
                    passed += 1;
                } else {
                    println!("FAIL  ({elapsed:.1}s)");
                    failed += 1;
                    failures.push(suite.name);
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    let lines: Vec<&str> = stdout.lines().collect();
                    for line in &lines[lines.len().saturating_sub(5)..] {
                        println!("        {line}");
                    }
                }
            }
            Err(e) => {
                println!("ERROR ({e})");
                failed += 1;
                failures.push(suite.name);
            }
        }
    }

    let total_time = t_total.elapsed().as_secs_f64();

    println!("\n═══════════════════════════════════════════════════════════");
    println!("  TOTAL: {passed} passed, {failed} failed ({total_time:.1}s)");

    if !failures.is_empty() {
        println!("  FAILURES: {}", failures.join(", "));
    }

    if failed == 0 {
        println!("  ALL VALIDATION SUITES PASSED");
        println!("═══════════════════════════════════════════════════════════");
        process::exit(0);
    }
    println!("  SOME VALIDATION SUITES FAILED");
    println!("═══════════════════════════════════════════════════════════");
    process::exit(1);
}

// SPDX-License-Identifier: AGPL-3.0-only

//! Derivation validator.
//!
//! Every derivation check follows the same pattern:
//!   - a closed-form prediction and a measured reference with provenance
//!   - an explicit relative tolerance from [`crate::tolerances`]
//!   - an epistemic tier (proven / derived / speculative)
//!   - exit code 0 (all verdicts pass) or 1 (any fails) from the binaries
//!
//! [`validate`] turns one prediction into a [`Verdict`]; [`ValidationReport`]
//! accumulates verdicts over one run and [`summarize`] partitions them by tier.

use std::collections::BTreeMap;
use std::fmt;
use std::process;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ShapeSpaceError;

/// Epistemic confidence of a derived numeric claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Follows from the geometry with no free choices
    Proven,
    /// Follows given a stated modelling step
    Derived,
    /// Numerically suggestive, not derived
    Speculative,
}

impl Tier {
    /// Every tier, in report order.
    pub const ALL: [Self; 3] = [Self::Proven, Self::Derived, Self::Speculative];

    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proven => "proven",
            Self::Derived => "derived",
            Self::Speculative => "speculative",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One prediction to be checked against a measured value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    /// Human-readable formula label
    pub label: String,
    /// Value produced by the formula
    pub predicted: f64,
    /// Measured (or exact) reference value
    pub reference: f64,
    /// Relative error bound, as a fraction
    pub tolerance: f64,
    /// Epistemic tier
    pub tier: Tier,
}

impl PredictionRecord {
    /// Bundle a prediction.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        predicted: f64,
        reference: f64,
        tolerance: f64,
        tier: Tier,
    ) -> Self {
        Self {
            label: label.into(),
            predicted,
            reference,
            tolerance,
            tier,
        }
    }

    /// Compare this prediction to its reference.
    ///
    /// # Errors
    ///
    /// See [`validate`].
    pub fn validate(&self) -> Result<Verdict, ShapeSpaceError> {
        validate(
            &self.label,
            self.predicted,
            self.reference,
            self.tolerance,
            self.tier,
        )
    }
}

/// Outcome of comparing a prediction to its reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// Formula label
    pub label: String,
    /// Whether `relative_error ≤ tolerance`
    pub passed: bool,
    /// Value produced by the formula
    pub predicted: f64,
    /// Reference value
    pub reference: f64,
    /// `|predicted − reference|`
    pub absolute_error: f64,
    /// `absolute_error / |reference|`
    pub relative_error: f64,
    /// Relative bound applied
    pub tolerance: f64,
    /// Epistemic tier
    pub tier: Tier,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = if self.passed { "✓" } else { "✗" };
        write!(
            f,
            "  {icon} {}: predicted={:.9e}, reference={:.9e}, rel_err={:.2e}, tol={:.2e} [{}]",
            self.label,
            self.predicted,
            self.reference,
            self.relative_error,
            self.tolerance,
            self.tier
        )
    }
}

/// Check `predicted` against `reference` within a relative `tolerance`.
///
/// Passes iff `|predicted − reference| / |reference| ≤ tolerance`; the bound
/// is inclusive so an exact match passes a zero tolerance.
///
/// # Errors
///
/// - `InvalidTolerance` if `tolerance` is negative or NaN
/// - `UndefinedReference` if `reference == 0`
/// - `NonFiniteValue` if `predicted` or `reference` is NaN or infinite
pub fn validate(
    label: &str,
    predicted: f64,
    reference: f64,
    tolerance: f64,
    tier: Tier,
) -> Result<Verdict, ShapeSpaceError> {
    if tolerance.is_nan() || tolerance < 0.0 {
        return Err(ShapeSpaceError::InvalidTolerance {
            label: label.to_string(),
            tolerance,
        });
    }
    if reference == 0.0 {
        return Err(ShapeSpaceError::UndefinedReference {
            label: label.to_string(),
        });
    }
    for (which, value) in [("reference", reference), ("predicted", predicted)] {
        if !value.is_finite() {
            return Err(ShapeSpaceError::NonFiniteValue {
                label: format!("{label}: {which}"),
                value,
            });
        }
    }

    let absolute_error = (predicted - reference).abs();
    let relative_error = absolute_error / reference.abs();
    let passed = relative_error <= tolerance;
    if passed {
        debug!(label, relative_error, tolerance, %tier, "prediction within tolerance");
    } else {
        warn!(label, predicted, reference, relative_error, tolerance, %tier, "prediction outside tolerance");
    }

    Ok(Verdict {
        label: label.to_string(),
        passed,
        predicted,
        reference,
        absolute_error,
        relative_error,
        tolerance,
        tier,
    })
}

/// Pass/fail counts for one tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    /// Verdicts that passed
    pub passed: usize,
    /// Verdicts that failed
    pub failed: usize,
}

impl TierCounts {
    /// `passed + failed`
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed
    }
}

/// Aggregate of a non-empty verdict sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    /// Number of verdicts
    pub total: usize,
    /// Passing verdicts
    pub passed: usize,
    /// Failing verdicts
    pub failed: usize,
    /// `passed / total`
    pub pass_rate: f64,
    /// Counts for every tier, including tiers with no verdicts
    pub by_tier: BTreeMap<Tier, TierCounts>,
}

/// Count passes and failures overall and per tier.
///
/// Does not depend on verdict order. Every tier in [`Tier::ALL`] appears in
/// `by_tier`, so two summaries of the same verdicts compare equal.
///
/// # Errors
///
/// `EmptyReport` if `verdicts` is empty.
pub fn summarize(verdicts: &[Verdict]) -> Result<ReportSummary, ShapeSpaceError> {
    if verdicts.is_empty() {
        return Err(ShapeSpaceError::EmptyReport);
    }
    let mut by_tier: BTreeMap<Tier, TierCounts> =
        Tier::ALL.iter().map(|&t| (t, TierCounts::default())).collect();
    for v in verdicts {
        let counts = by_tier.entry(v.tier).or_default();
        if v.passed {
            counts.passed += 1;
        } else {
            counts.failed += 1;
        }
    }
    let passed = by_tier.values().map(|c| c.passed).sum::<usize>();
    let total = verdicts.len();
    #[allow(clippy::cast_precision_loss)]
    let pass_rate = passed as f64 / total as f64;
    Ok(ReportSummary {
        total,
        passed,
        failed: total - passed,
        pass_rate,
        by_tier,
    })
}

/// Verdicts accumulated over one run.
///
/// Not shared between threads: concurrent callers build one report each and
/// [`merge`](Self::merge) them afterwards.
#[derive(Debug, Default, Clone, Serialize)]
#[must_use]
pub struct ValidationReport {
    /// Name of the run (binary or catalog)
    pub name: String,
    /// Verdicts in append order
    pub verdicts: Vec<Verdict>,
}

impl ValidationReport {
    /// Empty report for a named run.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            verdicts: Vec::new(),
        }
    }

    /// Validate `record` and append its verdict. Nothing is appended on error.
    ///
    /// Returns whether the prediction passed.
    ///
    /// # Errors
    ///
    /// See [`validate`].
    pub fn record(&mut self, record: &PredictionRecord) -> Result<bool, ShapeSpaceError> {
        let verdict = record.validate()?;
        let passed = verdict.passed;
        self.verdicts.push(verdict);
        Ok(passed)
    }

    /// Shorthand for [`record`](Self::record) without building a [`PredictionRecord`].
    ///
    /// # Errors
    ///
    /// See [`validate`].
    pub fn check(
        &mut self,
        label: &str,
        predicted: f64,
        reference: f64,
        tolerance: f64,
        tier: Tier,
    ) -> Result<bool, ShapeSpaceError> {
        let verdict = validate(label, predicted, reference, tolerance, tier)?;
        let passed = verdict.passed;
        self.verdicts.push(verdict);
        Ok(passed)
    }

    /// Append an already computed verdict.
    pub fn push(&mut self, verdict: Verdict) {
        self.verdicts.push(verdict);
    }

    /// Append every verdict of `other`, preserving its order.
    pub fn merge(&mut self, other: Self) {
        self.verdicts.extend(other.verdicts);
    }

    /// Number of verdicts that passed.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.passed).count()
    }

    /// Total number of verdicts.
    #[must_use]
    pub const fn total_count(&self) -> usize {
        self.verdicts.len()
    }

    /// Whether every verdict passed (vacuously true when empty).
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.verdicts.iter().all(|v| v.passed)
    }

    /// Labels of failing verdicts, in order.
    #[must_use]
    pub fn failed_labels(&self) -> Vec<&str> {
        self.verdicts
            .iter()
            .filter(|v| !v.passed)
            .map(|v| v.label.as_str())
            .collect()
    }

    /// See [`summarize`].
    ///
    /// # Errors
    ///
    /// `EmptyReport` if nothing has been recorded.
    pub fn summarize(&self) -> Result<ReportSummary, ShapeSpaceError> {
        summarize(&self.verdicts)
    }

    /// Human-readable summary, one line per verdict plus per-tier counts.
    #[must_use]
    pub fn format_summary(&self) -> String {
        use std::fmt::Write;
        let mut s = String::new();
        let _ = writeln!(
            s,
            "═══ {} validation: {}/{} predictions passed ═══",
            self.name,
            self.passed_count(),
            self.total_count()
        );
        for v in &self.verdicts {
            let _ = writeln!(s, "{v}");
        }
        if let Ok(summary) = self.summarize() {
            for (tier, counts) in &summary.by_tier {
                let _ = writeln!(
                    s,
                    "  {tier:<11} {}/{} passed",
                    counts.passed,
                    counts.total()
                );
            }
            let _ = writeln!(s, "  pass rate {:.1}%", summary.pass_rate * 100.0);
        }
        s
    }

    /// Verdicts and summary as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures; none occur for finite verdicts.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&JsonReport {
            name: &self.name,
            summary: self.summarize().ok(),
            verdicts: &self.verdicts,
        })
    }

    /// Print the summary and exit: 0 if every verdict passed, 1 otherwise.
    pub fn finish(&self) -> ! {
        println!();
        print!("{}", self.format_summary());
        if self.all_passed() {
            println!("ALL PREDICTIONS PASSED");
            process::exit(0);
        }
        println!("FAILED PREDICTIONS: {}", self.failed_labels().join(", "));
        process::exit(1);
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    name: &'a str,
    summary: Option<ReportSummary>,
    verdicts: &'a [Verdict],
}

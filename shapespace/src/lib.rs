// SPDX-License-Identifier: AGPL-3.0-only

//! shapespace — curvature invariants of symmetric configuration spaces
//!
//! Computes the constrained Hessian spectrum of a symmetric functional at
//! its fully symmetric critical point, and checks closed-form predictions
//! built on that spectrum against measured constants within declared
//! tolerances.
//!
//! ## Modules
//!   - `symbolic` — expression trees with exact differentiation, substitution
//!     and simplification
//!   - `curvature` — ambient Hessian, gauge reduction, eigenspectrum
//!   - `validation` — tiered prediction verdicts and run reports
//!   - `derivations` — the prediction catalog fed by the eigenvalue ratio
//!   - `provenance` — measured reference values and their sources
//!   - `tolerances` — every acceptance threshold, with justification
//!   - `config` — environment settings and logging setup for the binaries
//!
//! ## Validation binaries
//!   - `validate_hessian` — analyzer checks, ratio sweep over N
//!   - `validate_derivations` — full prediction catalog
//!   - `validate_all` — runs both, exit 0 only if both pass
//!
//! ```
//! use shapespace::curvature::analyze_symmetric_complexity;
//! use shapespace::validation::{validate, Tier};
//!
//! let analysis = analyze_symmetric_complexity(3, 1.0)?;
//! let verdict = validate("ratio", analysis.ratio(), 3.0, 1e-9, Tier::Proven)?;
//! assert!(verdict.passed);
//! # Ok::<(), shapespace::error::ShapeSpaceError>(())
//! ```

pub mod config;
pub mod curvature;
pub mod derivations;
pub mod error;
pub mod provenance;
pub mod symbolic;
pub mod tolerances;
pub mod validation;

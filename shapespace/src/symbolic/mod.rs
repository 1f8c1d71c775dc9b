// SPDX-License-Identifier: AGPL-3.0-only

//! Symbolic algebra over named positive real variables.
//!
//! The [`Symbolic`] trait collects what callers need from this layer. The
//! curvature analyzer uses partial differentiation, numeric evaluation under
//! a variable binding and simplification. Substitution is there for callers
//! that pin some variables to numbers before analysis.
//! Expressions themselves are built with [`Expr`] constructors and the usual
//! arithmetic operators.
//!
//! ```
//! use shapespace::symbolic::{Bindings, Expr, Symbolic};
//!
//! let x = Expr::var("x");
//! let f = x.clone() * x.clone() + x.recip();
//! let d2 = f.diff("x").diff("x").simplify();
//! let at_one = Bindings::from([("x".to_string(), 1.0)]);
//! assert!((d2.eval(&at_one).unwrap() - 4.0).abs() < 1e-12);
//! ```

mod expr;
mod simplify;


use std::collections::BTreeMap;
use std::fmt;

pub use expr::{Expr, Func};

use crate::error::ShapeSpaceError;

/// Numeric values for named variables.
pub type Bindings = BTreeMap<String, f64>;

/// The symbolic capability the analyzer is written against.
///
/// [`reduce_and_diagonalize`](crate::curvature::reduce_and_diagonalize) calls
/// `diff`, `eval` and `simplify`. Implementations must keep `simplify`
/// value-preserving: the simplified expression evaluates to the same number,
/// or the same domain error, at every point.
pub trait Symbolic: Clone + fmt::Display {
    /// Partial derivative with respect to `var`.
    #[must_use]
    fn diff(&self, var: &str) -> Self;

    /// Numeric value with every variable bound.
    ///
    /// # Errors
    ///
    /// Fails when a variable is unbound or the expression leaves the real domain.
    fn eval(&self, bindings: &Bindings) -> Result<f64, ShapeSpaceError>;

    /// Replace `var` by a numeric literal.
    #[must_use]
    fn subs(&self, var: &str, value: f64) -> Self;

    /// Algebraically simplified equivalent.
    #[must_use]
    fn simplify(&self) -> Self;
}

impl Symbolic for Expr {
    fn diff(&self, var: &str) -> Self {
        self.derivative(var)
    }

    fn eval(&self, bindings: &Bindings) -> Result<f64, ShapeSpaceError> {
        self.evaluate(bindings)
    }

    fn subs(&self, var: &str, value: f64) -> Self {
        self.substitute(var, value)
    }

    fn simplify(&self) -> Self {
        self.simplified()
    }
}

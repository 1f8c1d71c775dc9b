// SPDX-License-Identifier: AGPL-3.0-only

//! Expression tree over named positive real variables.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use super::Bindings;
use crate::error::ShapeSpaceError;

/// Elementary functions available in a functional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    /// Principal square root
    Sqrt,
    /// Natural exponential
    Exp,
    /// Natural logarithm
    Ln,
    /// Sine (radians)
    Sin,
    /// Cosine (radians)
    Cos,
}

impl Func {
    /// Name used when printing.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sqrt => "sqrt",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Sin => "sin",
            Self::Cos => "cos",
        }
    }

    /// Apply the function to a number, rejecting arguments outside the real domain.
    ///
    /// # Errors
    ///
    /// Returns `ShapeSpaceError::Domain` for `sqrt` of a negative or `ln` of a
    /// non-positive argument.
    pub fn apply(self, x: f64) -> Result<f64, ShapeSpaceError> {
        match self {
            Self::Sqrt if x < 0.0 => Err(ShapeSpaceError::Domain(format!("sqrt({x})"))),
            Self::Ln if x <= 0.0 => Err(ShapeSpaceError::Domain(format!("ln({x})"))),
            Self::Sqrt => Ok(x.sqrt()),
            Self::Exp => Ok(x.exp()),
            Self::Ln => Ok(x.ln()),
            Self::Sin => Ok(x.sin()),
            Self::Cos => Ok(x.cos()),
        }
    }
}

/// An immutable algebraic expression.
///
/// Sums and products are n-ary so that simplification can flatten and fold
/// them. Division and subtraction are sugar: `a / b` is `a · b⁻¹` and
/// `a − b` is `a + (−1)·b`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Const(f64),
    /// Named variable
    Var(String),
    /// n-ary sum
    Sum(Vec<Expr>),
    /// n-ary product
    Product(Vec<Expr>),
    /// Real power with a constant exponent
    Pow(Box<Expr>, f64),
    /// Elementary function applied to a sub-expression
    Call(Func, Box<Expr>),
}

impl Expr {
    /// Variable reference.
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    /// Numeric literal.
    #[must_use]
    pub const fn constant(value: f64) -> Self {
        Self::Const(value)
    }

    /// n-ary sum of `terms`.
    pub fn sum(terms: impl IntoIterator<Item = Self>) -> Self {
        Self::Sum(terms.into_iter().collect())
    }

    /// n-ary product of `factors`.
    pub fn product(factors: impl IntoIterator<Item = Self>) -> Self {
        Self::Product(factors.into_iter().collect())
    }

    /// `self^p` for a constant real exponent.
    #[must_use]
    pub fn powf(self, p: f64) -> Self {
        Self::Pow(Box::new(self), p)
    }

    /// `self^p` for an integer exponent.
    #[must_use]
    pub fn powi(self, p: i32) -> Self {
        self.powf(f64::from(p))
    }

    /// `1 / self`
    #[must_use]
    pub fn recip(self) -> Self {
        self.powf(-1.0)
    }

    /// `sqrt(self)`
    #[must_use]
    pub fn sqrt(self) -> Self {
        Self::Call(Func::Sqrt, Box::new(self))
    }

    /// `exp(self)`
    #[must_use]
    pub fn exp(self) -> Self {
        Self::Call(Func::Exp, Box::new(self))
    }

    /// `ln(self)`
    #[must_use]
    pub fn ln(self) -> Self {
        Self::Call(Func::Ln, Box::new(self))
    }

    /// `sin(self)`
    #[must_use]
    pub fn sin(self) -> Self {
        Self::Call(Func::Sin, Box::new(self))
    }

    /// `cos(self)`
    #[must_use]
    pub fn cos(self) -> Self {
        Self::Call(Func::Cos, Box::new(self))
    }

    /// Whether this is the literal zero.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Const(c) if *c == 0.0)
    }

    /// Names of all variables appearing in the expression, sorted and deduplicated.
    #[must_use]
    pub fn variables(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out.sort();
        out.dedup();
        out
    }

    fn collect_variables(&self, out: &mut Vec<String>) {
        match self {
            Self::Const(_) => {}
            Self::Var(name) => out.push(name.clone()),
            Self::Sum(items) | Self::Product(items) => {
                for item in items {
                    item.collect_variables(out);
                }
            }
            Self::Pow(base, _) => base.collect_variables(out),
            Self::Call(_, arg) => arg.collect_variables(out),
        }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + match self {
            Self::Const(_) | Self::Var(_) => 0,
            Self::Sum(items) | Self::Product(items) => items.iter().map(Self::node_count).sum(),
            Self::Pow(base, _) => base.node_count(),
            Self::Call(_, arg) => arg.node_count(),
        }
    }

    /// Partial derivative with respect to `var` (unsimplified).
    #[must_use]
    pub fn derivative(&self, var: &str) -> Self {
        match self {
            Self::Const(_) => Self::Const(0.0),
            Self::Var(name) => Self::Const(if name == var { 1.0 } else { 0.0 }),
            Self::Sum(terms) => Self::Sum(terms.iter().map(|t| t.derivative(var)).collect()),
            Self::Product(factors) => {
                // Leibniz: Σᵢ f₁ ⋯ fᵢ' ⋯ fₙ
                let mut terms = Vec::with_capacity(factors.len());
                for (i, factor) in factors.iter().enumerate() {
                    let d = factor.derivative(var);
                    if d.is_zero() {
                        continue;
                    }
                    let mut replaced = factors.clone();
                    replaced[i] = d;
                    terms.push(Self::Product(replaced));
                }
                Self::Sum(terms)
            }
            Self::Pow(base, p) => Self::Product(vec![
                Self::Const(*p),
                Self::Pow(base.clone(), p - 1.0),
                base.derivative(var),
            ]),
            Self::Call(func, arg) => {
                let outer = match func {
                    Func::Sqrt => Self::Product(vec![Self::Const(0.5), self.clone().recip()]),
                    Func::Exp => self.clone(),
                    Func::Ln => Self::Pow(arg.clone(), -1.0),
                    Func::Sin => Self::Call(Func::Cos, arg.clone()),
                    Func::Cos => {
                        Self::Product(vec![Self::Const(-1.0), Self::Call(Func::Sin, arg.clone())])
                    }
                };
                Self::Product(vec![outer, arg.derivative(var)])
            }
        }
    }

    /// Replace every occurrence of `var` with the literal `value`.
    #[must_use]
    pub fn substitute(&self, var: &str, value: f64) -> Self {
        match self {
            Self::Var(name) if name == var => Self::Const(value),
            Self::Const(_) | Self::Var(_) => self.clone(),
            Self::Sum(terms) => Self::Sum(terms.iter().map(|t| t.substitute(var, value)).collect()),
            Self::Product(factors) => {
                Self::Product(factors.iter().map(|f| f.substitute(var, value)).collect())
            }
            Self::Pow(base, p) => Self::Pow(Box::new(base.substitute(var, value)), *p),
            Self::Call(func, arg) => Self::Call(*func, Box::new(arg.substitute(var, value))),
        }
    }

    /// Evaluate with every variable bound to a number.
    ///
    /// # Errors
    ///
    /// `UnboundVariable` if a variable has no binding; `Domain` on division by
    /// zero, a fractional power of a negative number, `sqrt`/`ln` outside
    /// their domain, or any non-finite intermediate.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<f64, ShapeSpaceError> {
        let value = match self {
            Self::Const(c) => *c,
            Self::Var(name) => {
                *bindings
                    .get(name)
                    .ok_or_else(|| ShapeSpaceError::UnboundVariable { name: name.clone() })?
            }
            Self::Sum(terms) => terms
                .iter()
                .map(|t| t.evaluate(bindings))
                .sum::<Result<f64, _>>()?,
            Self::Product(factors) => factors
                .iter()
                .map(|f| f.evaluate(bindings))
                .product::<Result<f64, _>>()?,
            Self::Pow(base, p) => real_pow(base.evaluate(bindings)?, *p)?,
            Self::Call(func, arg) => func.apply(arg.evaluate(bindings)?)?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ShapeSpaceError::Domain(format!("non-finite intermediate {value}")))
        }
    }
}

/// `base^p` restricted to the reals.
///
/// Integer exponents go through `powi` so that `x^-1`, `x^2` etc. are exact
/// to the last ulp.
pub(crate) fn real_pow(base: f64, p: f64) -> Result<f64, ShapeSpaceError> {
    if base == 0.0 && p < 0.0 {
        return Err(ShapeSpaceError::Domain(format!("0^{p} (division by zero)")));
    }
    if p.fract() == 0.0 && p.abs() <= f64::from(i32::MAX) {
        #[allow(clippy::cast_possible_truncation)]
        return Ok(base.powi(p as i32));
    }
    if base < 0.0 {
        return Err(ShapeSpaceError::Domain(format!("({base})^{p}")));
    }
    Ok(base.powf(p))
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Const(value)
    }
}

impl Add for Expr {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::Sum(vec![self, rhs])
    }
}

impl Sub for Expr {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::Sum(vec![self, -rhs])
    }
}

impl Mul for Expr {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::Product(vec![self, rhs])
    }
}

impl Div for Expr {
    type Output = Self;
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, rhs: Self) -> Self {
        Self::Product(vec![self, rhs.recip()])
    }
}

impl Neg for Expr {
    type Output = Self;
    fn neg(self) -> Self {
        Self::Product(vec![Self::Const(-1.0), self])
    }
}

fn is_compound(expr: &Expr) -> bool {
    matches!(expr, Expr::Sum(_) | Expr::Product(_) | Expr::Pow(..))
        || matches!(expr, Expr::Const(c) if *c < 0.0)
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Expr], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        if is_compound(item) {
            write!(f, "({item})")?;
        } else {
            write!(f, "{item}")?;
        }
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(c) => write!(f, "{c}"),
            Self::Var(name) => f.write_str(name),
            Self::Sum(terms) if terms.is_empty() => f.write_str("0"),
            Self::Product(factors) if factors.is_empty() => f.write_str("1"),
            Self::Sum(terms) => write_joined(f, terms, " + "),
            Self::Product(factors) => write_joined(f, factors, "*"),
            Self::Pow(base, p) => {
                if is_compound(base) {
                    write!(f, "({base})^{p}")
                } else {
                    write!(f, "{base}^{p}")
                }
            }
            Self::Call(func, arg) => write!(f, "{}({arg})", func.name()),
        }
    }
}

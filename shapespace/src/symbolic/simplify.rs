// SPDX-License-Identifier: AGPL-3.0-only

//! Algebraic simplification.
//!
//! Bottom-up rewriting: children are simplified first, then the node is
//! normalized. Rules that only hold for positive reals (`(u^a)^b = u^(ab)`,
//! `sqrt(u) = u^0.5`, `exp(ln u) = u`) fire only when `u` is provably
//! positive. Otherwise they are restricted to integer exponents or left
//! alone, so a simplified expression evaluates to the same value, or the same
//! domain error, as the original.

use super::expr::{real_pow, Expr, Func};

impl Expr {
    /// Simplified copy of the expression.
    #[must_use]
    pub fn simplified(&self) -> Self {
        match self {
            Self::Const(_) | Self::Var(_) => self.clone(),
            Self::Sum(terms) => simplify_sum(terms.iter().map(Self::simplified)),
            Self::Product(factors) => simplify_product(factors.iter().map(Self::simplified)),
            Self::Pow(base, p) => simplify_pow(base.simplified(), *p),
            Self::Call(func, arg) => simplify_call(*func, arg.simplified()),
        }
    }
}

fn collapse(mut items: Vec<Expr>, empty: Expr, wrap: fn(Vec<Expr>) -> Expr) -> Expr {
    match items.len() {
        0 => empty,
        1 => items.remove(0),
        _ => wrap(items),
    }
}

fn simplify_sum(terms: impl Iterator<Item = Expr>) -> Expr {
    let mut constant = 0.0;
    let mut rest = Vec::new();
    let mut push = |term: Expr, constant: &mut f64| match term {
        Expr::Const(c) => *constant += c,
        other => rest.push(other),
    };
    for term in terms {
        match term {
            // children are already simplified, so one level of flattening suffices
            Expr::Sum(inner) => {
                for t in inner {
                    push(t, &mut constant);
                }
            }
            other => push(other, &mut constant),
        }
    }
    if constant != 0.0 {
        rest.push(Expr::Const(constant));
    }
    collapse(rest, Expr::Const(0.0), Expr::Sum)
}

/// Provably positive for every binding of the (positive) variables.
fn is_positive(expr: &Expr) -> bool {
    match expr {
        Expr::Const(c) => *c > 0.0,
        Expr::Var(_) | Expr::Call(Func::Exp, _) => true,
        Expr::Sum(items) | Expr::Product(items) => items.iter().all(is_positive),
        Expr::Pow(base, _) | Expr::Call(Func::Sqrt, base) => is_positive(base),
        Expr::Call(..) => false,
    }
}

#[allow(clippy::float_cmp)]
fn is_integer(p: f64) -> bool {
    p.fract() == 0.0
}

/// Split a factor into `(base, exponent)` so that like bases can be merged.
fn as_power(factor: Expr) -> (Expr, f64) {
    match factor {
        Expr::Pow(base, p) => (*base, p),
        Expr::Call(Func::Sqrt, arg) if is_positive(&arg) => (*arg, 0.5),
        other => (other, 1.0),
    }
}

/// `u^a · u^b = u^(a+b)` holds for positive `u` or integer `a`, `b`.
fn can_merge(base: &Expr, a: f64, b: f64) -> bool {
    is_positive(base) || (is_integer(a) && is_integer(b))
}

#[allow(clippy::float_cmp)]
fn simplify_product(factors: impl Iterator<Item = Expr>) -> Expr {
    let mut coeff = 1.0;
    let mut powers: Vec<(Expr, f64)> = Vec::new();
    let mut absorb = |factor: Expr, coeff: &mut f64| match factor {
        Expr::Const(c) => *coeff *= c,
        other => {
            let (base, p) = as_power(other);
            if let Some(slot) = powers
                .iter_mut()
                .find(|(b, q)| *b == base && can_merge(b, *q, p))
            {
                slot.1 += p;
            } else {
                powers.push((base, p));
            }
        }
    };
    for factor in factors {
        match factor {
            Expr::Product(inner) => {
                for f in inner {
                    absorb(f, &mut coeff);
                }
            }
            other => absorb(other, &mut coeff),
        }
    }
    if coeff == 0.0 {
        return Expr::Const(0.0);
    }

    let mut rest = Vec::with_capacity(powers.len() + 1);
    for (base, p) in powers {
        match simplify_pow(base, p) {
            Expr::Const(c) => coeff *= c,
            other => rest.push(other),
        }
    }
    if coeff != 1.0 {
        rest.insert(0, Expr::Const(coeff));
    }
    collapse(rest, Expr::Const(1.0), Expr::Product)
}

#[allow(clippy::float_cmp)]
fn simplify_pow(base: Expr, p: f64) -> Expr {
    if p == 0.0 {
        return Expr::Const(1.0);
    }
    if p == 1.0 {
        return base;
    }
    match base {
        Expr::Const(c) => match real_pow(c, p) {
            Ok(v) if v.is_finite() => Expr::Const(v),
            _ => Expr::Pow(Box::new(Expr::Const(c)), p),
        },
        Expr::Pow(inner, q) if can_fold(&inner, q, p) => simplify_pow(*inner, p * q),
        Expr::Call(Func::Sqrt, arg) if is_positive(&arg) => simplify_pow(*arg, 0.5 * p),
        other => Expr::Pow(Box::new(other), p),
    }
}

/// `(u^q)^p = u^(pq)` holds for positive `u` or integer `q`, `p`.
fn can_fold(base: &Expr, q: f64, p: f64) -> bool {
    is_positive(base) || (is_integer(q) && is_integer(p))
}

fn simplify_call(func: Func, arg: Expr) -> Expr {
    if let Expr::Const(c) = arg {
        return match func.apply(c) {
            Ok(v) if v.is_finite() => Expr::Const(v),
            _ => Expr::Call(func, Box::new(Expr::Const(c))),
        };
    }
    match (func, arg) {
        (Func::Ln, Expr::Call(Func::Exp, inner)) => *inner,
        // ln u is undefined for u ≤ 0, so the pair only cancels on positive u
        (Func::Exp, Expr::Call(Func::Ln, inner)) if is_positive(&inner) => *inner,
        (func, arg) => Expr::Call(func, Box::new(arg)),
    }
}

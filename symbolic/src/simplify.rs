//! Canonical simplification of trigonometric polynomials.
//!
//! Arithmetic already keeps every `Expr` expanded with like terms collected.
//! What arithmetic alone cannot see are trig identities, so simplification
//! adds two rewrites and repeats them until nothing changes:
//!
//! 1. `sin`/`cos` of a sum or of an integer multiple are expanded with the
//!    angle addition formulas, so every trig argument becomes a single
//!    monomial with unit coefficient.
//! 2. Even powers of `sin(x)` are rewritten through `sin²(x) = 1 - cos²(x)`.
//!
//! After both rewrites an expression is a polynomial in symbols, `cos(x)` and
//! at most the first power of `sin(x)`. When the trig arguments are
//! independent angles (joint coordinates, say) this is a normal form: two
//! expressions that agree as functions simplify to the same `Expr`.
//! Rational multiples such as `sin(x/2)` are left as they are.

use crate::expr::{Atom, Expr};
use num_traits::{One, Zero};
use tracing::trace;

const MAX_PASSES: usize = 8;

impl Expr {
    pub fn simplify(&self) -> Expr {
        let mut current = self.clone();
        for pass in 0..MAX_PASSES {
            let next = current.expand_trig().reduce_pythagorean();
            if next == current {
                trace!(pass, terms = next.len(), "simplify reached fixed point");
                return next;
            }
            current = next;
        }
        current
    }

    /// Expands trig functions of sums and integer multiples.
    pub fn expand_trig(&self) -> Expr {
        self.rebuild(&|atom| match atom {
            Atom::Symbol(s) => Expr::from(s),
            Atom::Cos(arg) => expand_cos(&arg.expand_trig()),
            Atom::Sin(arg) => expand_sin(&arg.expand_trig()),
        })
    }

    /// Rewrites `sin(x)^n` for `n >= 2` in terms of `cos(x)`.
    pub fn reduce_pythagorean(&self) -> Expr {
        self.rebuild(&|atom| match atom {
            Atom::Symbol(s) => Expr::from(s),
            Atom::Cos(arg) => arg.reduce_pythagorean().cos(),
            Atom::Sin(arg) => arg.reduce_pythagorean().sin(),
        })
        .reduce_sin_powers()
    }

    fn reduce_sin_powers(&self) -> Expr {
        let mut out = Expr::zero();
        for (monomial, coefficient) in self.terms() {
            let mut term = Expr::constant(*coefficient);
            for (atom, exponent) in monomial.iter() {
                let factor = match atom {
                    Atom::Sin(arg) if *exponent >= 2 => {
                        let cos_squared = arg.cos().pow(2);
                        let one_minus = Expr::one() - cos_squared;
                        Expr::atom(atom.clone()).pow(exponent % 2) * one_minus.pow(exponent / 2)
                    }
                    _ => Expr::atom(atom.clone()).pow(*exponent),
                };
                term = term * factor;
            }
            out += term;
        }
        out
    }
}

fn expand_sin(arg: &Expr) -> Expr {
    let Some((head, rest)) = arg.first_term() else {
        return Expr::zero();
    };
    if !rest.is_zero() {
        // sin(a + b) = sin(a)cos(b) + cos(a)sin(b)
        return expand_sin(&head) * expand_cos(&rest) + expand_cos(&head) * expand_sin(&rest);
    }
    match head.integer_multiple() {
        Some((k, base)) if k.abs() > 1 => {
            let n = k.abs();
            // sin(n x) = sin((n - 1)x)cos(x) + cos((n - 1)x)sin(x)
            let lower = Expr::integer(n - 1) * &base;
            let expanded =
                expand_sin(&lower) * base.cos() + expand_cos(&lower) * base.sin();
            if k < 0 { -expanded } else { expanded }
        }
        _ => head.sin(),
    }
}

fn expand_cos(arg: &Expr) -> Expr {
    let Some((head, rest)) = arg.first_term() else {
        return Expr::one();
    };
    if !rest.is_zero() {
        // cos(a + b) = cos(a)cos(b) - sin(a)sin(b)
        return expand_cos(&head) * expand_cos(&rest) - expand_sin(&head) * expand_sin(&rest);
    }
    match head.integer_multiple() {
        Some((k, base)) if k.abs() > 1 => {
            let n = k.abs();
            // cos(n x) = cos((n - 1)x)cos(x) - sin((n - 1)x)sin(x)
            let lower = Expr::integer(n - 1) * &base;
            expand_cos(&lower) * base.cos() - expand_sin(&lower) * base.sin()
        }
        _ => head.cos(),
    }
}

use crate::{SymbolicErrors, symbol::Symbol};
use num_rational::Rational64;
use num_traits::{One, Signed, Zero};
use std::collections::{BTreeMap, BTreeSet};

/// Irreducible factor of a monomial.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Atom {
    Symbol(Symbol),
    Cos(Expr),
    Sin(Expr),
}

impl Atom {
    /// True if `symbol` appears anywhere in the atom, including trig arguments.
    pub fn contains(&self, symbol: &Symbol) -> bool {
        match self {
            Atom::Symbol(s) => s == symbol,
            Atom::Cos(arg) | Atom::Sin(arg) => arg.contains(symbol),
        }
    }
}

/// Product of atoms raised to positive integer powers. The empty product is 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial(BTreeMap<Atom, u32>);

impl Monomial {
    pub fn one() -> Self {
        Self::default()
    }

    pub fn from_atom(atom: Atom) -> Self {
        let mut factors = BTreeMap::new();
        factors.insert(atom, 1);
        Self(factors)
    }

    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Atom, &u32)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn mul(&self, rhs: &Monomial) -> Monomial {
        let mut factors = self.0.clone();
        for (atom, exponent) in &rhs.0 {
            *factors.entry(atom.clone()).or_insert(0) += exponent;
        }
        Monomial(factors)
    }

    /// Total power of the given symbols, or `None` if one of them appears
    /// inside a trig argument.
    pub fn degree_in(&self, symbols: &BTreeSet<Symbol>) -> Option<u32> {
        let mut degree = 0;
        for (atom, exponent) in &self.0 {
            match atom {
                Atom::Symbol(s) => {
                    if symbols.contains(s) {
                        degree += exponent;
                    }
                }
                Atom::Cos(arg) | Atom::Sin(arg) => {
                    if symbols.iter().any(|s| arg.contains(s)) {
                        return None;
                    }
                }
            }
        }
        Some(degree)
    }
}

/// A symbolic expression kept in canonical expanded form: a sum of monomials
/// with exact rational coefficients. Zero coefficients are never stored, so
/// structural equality is algebraic equality of the expanded polynomials.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Expr {
    terms: BTreeMap<Monomial, Rational64>,
}

impl Expr {
    pub fn constant(value: Rational64) -> Self {
        let mut expr = Self::default();
        expr.add_term(Monomial::one(), value);
        expr
    }

    pub fn integer(value: i64) -> Self {
        Self::constant(Rational64::from_integer(value))
    }

    pub fn rational(numerator: i64, denominator: i64) -> Result<Self, SymbolicErrors> {
        if denominator == 0 {
            return Err(SymbolicErrors::ZeroDenominator);
        }
        Ok(Self::constant(Rational64::new(numerator, denominator)))
    }

    /// Converts a float into an exact rational constant.
    pub fn number(value: f64) -> Result<Self, SymbolicErrors> {
        if !value.is_finite() {
            return Err(SymbolicErrors::NonFiniteNumber(value));
        }
        if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            return Ok(Self::integer(value as i64));
        }
        match Rational64::approximate_float(value) {
            Some(r) => Ok(Self::constant(r)),
            None => Err(SymbolicErrors::NotRepresentable(value)),
        }
    }

    pub fn atom(atom: Atom) -> Self {
        let mut expr = Self::default();
        expr.add_term(Monomial::from_atom(atom), Rational64::one());
        expr
    }

    pub(crate) fn from_term(monomial: Monomial, coefficient: Rational64) -> Self {
        let mut expr = Self::default();
        expr.add_term(monomial, coefficient);
        expr
    }

    pub(crate) fn add_term(&mut self, monomial: Monomial, coefficient: Rational64) {
        if coefficient.is_zero() {
            return;
        }
        let entry = self.terms.entry(monomial).or_insert_with(Rational64::zero);
        *entry += coefficient;
        if entry.is_zero() {
            self.terms.retain(|_, c| !c.is_zero());
        }
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &Rational64)> {
        self.terms.iter()
    }

    /// Number of terms in the expanded sum.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn as_constant(&self) -> Option<Rational64> {
        match self.terms.len() {
            0 => Some(Rational64::zero()),
            1 => self
                .terms
                .iter()
                .next()
                .filter(|(m, _)| m.is_one())
                .map(|(_, c)| *c),
            _ => None,
        }
    }

    pub fn scale(&self, factor: Rational64) -> Expr {
        if factor.is_zero() {
            return Expr::zero();
        }
        Expr {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.clone(), *c * factor))
                .collect(),
        }
    }

    pub fn pow(&self, exponent: u32) -> Expr {
        let mut result = Expr::one();
        let mut base = self.clone();
        let mut n = exponent;
        while n > 0 {
            if n & 1 == 1 {
                result = &result * &base;
            }
            n >>= 1;
            if n > 0 {
                base = &base * &base;
            }
        }
        result
    }

    /// Splits off the sign so that `sin` and `cos` only ever see one of
    /// `x` and `-x`: the argument whose first term has a positive coefficient.
    fn sign_normalized(&self) -> (Expr, bool) {
        match self.terms.values().next() {
            Some(c) if c.is_negative() => (-self, true),
            _ => (self.clone(), false),
        }
    }

    pub fn sin(&self) -> Expr {
        if self.is_zero() {
            return Expr::zero();
        }
        let (arg, negated) = self.sign_normalized();
        let sin = Expr::atom(Atom::Sin(arg));
        if negated { -sin } else { sin }
    }

    pub fn cos(&self) -> Expr {
        if self.is_zero() {
            return Expr::one();
        }
        let (arg, _) = self.sign_normalized();
        Expr::atom(Atom::Cos(arg))
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.terms
            .keys()
            .any(|m| m.iter().any(|(atom, _)| atom.contains(symbol)))
    }

    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, symbols: &mut BTreeSet<Symbol>) {
        for monomial in self.terms.keys() {
            for (atom, _) in monomial.iter() {
                match atom {
                    Atom::Symbol(s) => {
                        symbols.insert(s.clone());
                    }
                    Atom::Cos(arg) | Atom::Sin(arg) => arg.collect_symbols(symbols),
                }
            }
        }
    }

    /// Rebuilds the expression with every atom replaced by `f(atom)`.
    pub(crate) fn rebuild(&self, f: &dyn Fn(&Atom) -> Expr) -> Expr {
        let mut out = Expr::zero();
        for (monomial, coefficient) in &self.terms {
            let mut term = Expr::constant(*coefficient);
            for (atom, exponent) in monomial.iter() {
                term = &term * &f(atom).pow(*exponent);
            }
            out += term;
        }
        out
    }

    pub fn substitute(&self, symbol: &Symbol, value: &Expr) -> Expr {
        if !self.contains(symbol) {
            return self.clone();
        }
        self.rebuild(&|atom| match atom {
            Atom::Symbol(s) if s == symbol => value.clone(),
            Atom::Symbol(_) => Expr::atom(atom.clone()),
            Atom::Cos(arg) => arg.substitute(symbol, value).cos(),
            Atom::Sin(arg) => arg.substitute(symbol, value).sin(),
        })
    }

    /// Partial derivative with respect to `symbol`.
    pub fn diff(&self, symbol: &Symbol) -> Expr {
        let mut out = Expr::zero();
        for (monomial, coefficient) in &self.terms {
            for (atom, exponent) in monomial.iter() {
                if !atom.contains(symbol) {
                    continue;
                }
                let inner = match atom {
                    Atom::Symbol(_) => Expr::one(),
                    Atom::Cos(arg) => -(&arg.sin() * &arg.diff(symbol)),
                    Atom::Sin(arg) => &arg.cos() * &arg.diff(symbol),
                };
                // coefficient * exponent * atom^(exponent - 1) * rest
                let mut term = Expr::constant(*coefficient * Rational64::from(*exponent as i64));
                term = &term * &inner;
                for (other, other_exponent) in monomial.iter() {
                    let power = if other == atom {
                        other_exponent - 1
                    } else {
                        *other_exponent
                    };
                    if power > 0 {
                        term = &term * &Expr::atom(other.clone()).pow(power);
                    }
                }
                out += term;
            }
        }
        out
    }

    /// Smallest and largest total degree over the terms, counting only the
    /// given symbols. `None` if a symbol appears inside a trig function, since
    /// the expression is then not polynomial in them.
    pub fn degree_range(&self, symbols: &[Symbol]) -> Option<(u32, u32)> {
        let symbols: BTreeSet<Symbol> = symbols.iter().cloned().collect();
        let mut range: Option<(u32, u32)> = None;
        for monomial in self.terms.keys() {
            let degree = monomial.degree_in(&symbols)?;
            range = Some(match range {
                None => (degree, degree),
                Some((lo, hi)) => (lo.min(degree), hi.max(degree)),
            });
        }
        Some(range.unwrap_or((0, 0)))
    }

    /// True if every term has exactly `degree` total power in `symbols`.
    /// Zero is not considered homogeneous.
    pub fn is_homogeneous(&self, symbols: &[Symbol], degree: u32) -> bool {
        !self.is_zero() && self.degree_range(symbols) == Some((degree, degree))
    }

    /// Sign analysis from symbol domains. A sum whose terms all have positive
    /// coefficients and only positive symbols is positive; constants are
    /// decided exactly; anything else is undecided.
    pub fn is_positive(&self) -> Option<bool> {
        if let Some(c) = self.as_constant() {
            return Some(c.is_positive());
        }
        let positive_factors = |m: &Monomial| {
            m.iter().all(|(atom, _)| match atom {
                Atom::Symbol(s) => s.is_positive(),
                _ => false,
            })
        };
        if self
            .terms
            .iter()
            .all(|(m, c)| c.is_positive() && positive_factors(m))
        {
            return Some(true);
        }
        if self
            .terms
            .iter()
            .all(|(m, c)| c.is_negative() && positive_factors(m))
        {
            return Some(false);
        }
        None
    }

    pub(crate) fn first_term(&self) -> Option<(Expr, Expr)> {
        let (monomial, coefficient) = self.terms.iter().next()?;
        let head = Expr::from_term(monomial.clone(), *coefficient);
        let rest = self - &head;
        Some((head, rest))
    }

    /// For a single term `k * m` with integer `k`, returns `(k, m)`.
    pub(crate) fn integer_multiple(&self) -> Option<(i64, Expr)> {
        if self.terms.len() != 1 {
            return None;
        }
        let (monomial, coefficient) = self.terms.iter().next()?;
        if !coefficient.is_integer() || monomial.is_one() {
            return None;
        }
        Some((
            coefficient.to_integer(),
            Expr::from_term(monomial.clone(), Rational64::one()),
        ))
    }
}

impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Self {
        Expr::atom(Atom::Symbol(symbol))
    }
}

impl From<&Symbol> for Expr {
    fn from(symbol: &Symbol) -> Self {
        Expr::atom(Atom::Symbol(symbol.clone()))
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::integer(value)
    }
}

impl From<Rational64> for Expr {
    fn from(value: Rational64) -> Self {
        Expr::constant(value)
    }
}

impl Zero for Expr {
    fn zero() -> Self {
        Expr::default()
    }

    fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }
}

impl One for Expr {
    fn one() -> Self {
        Expr::constant(Rational64::one())
    }
}

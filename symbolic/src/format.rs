use crate::expr::{Atom, Expr, Monomial};
use crate::symbol::Symbol;
use num_rational::Rational64;
use num_traits::{One, Signed, Zero};
use std::fmt::{self, Display, Formatter};

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        for (i, (monomial, coefficient)) in self.terms().enumerate() {
            let sign = coefficient.is_negative();
            match (i, sign) {
                (0, true) => write!(f, "-")?,
                (0, false) => {}
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }
            write_text_term(f, monomial, &coefficient.abs())?;
        }
        Ok(())
    }
}

fn write_text_term(f: &mut Formatter<'_>, monomial: &Monomial, magnitude: &Rational64) -> fmt::Result {
    if monomial.is_one() {
        return write!(f, "{magnitude}");
    }
    let numer = *magnitude.numer();
    let denom = *magnitude.denom();
    if numer != 1 {
        write!(f, "{numer}*")?;
    }
    for (i, (atom, exponent)) in monomial.iter().enumerate() {
        if i > 0 {
            write!(f, "*")?;
        }
        write_text_atom(f, atom)?;
        if *exponent > 1 {
            write!(f, "^{exponent}")?;
        }
    }
    if denom != 1 {
        write!(f, "/{denom}")?;
    }
    Ok(())
}

fn write_text_atom(f: &mut Formatter<'_>, atom: &Atom) -> fmt::Result {
    match atom {
        Atom::Symbol(s) => write!(f, "{s}"),
        Atom::Cos(arg) => write!(f, "cos({arg})"),
        Atom::Sin(arg) => write!(f, "sin({arg})"),
    }
}

/// LaTeX name of a symbol: `I1` becomes `I_{1}`, `l_c1` becomes `l_{c1}`.
pub fn latex_symbol(symbol: &Symbol) -> String {
    let name = symbol.name();
    if let Some((base, sub)) = name.split_once('_') {
        if !base.is_empty() && !sub.is_empty() {
            return format!("{base}_{{{sub}}}");
        }
    }
    let digits = name
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if digits > 0 && digits < name.len() {
        let (base, sub) = name.split_at(name.len() - digits);
        format!("{base}_{{{sub}}}")
    } else {
        name.to_string()
    }
}

impl Expr {
    pub fn to_latex(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let mut out = String::new();
        for (i, (monomial, coefficient)) in self.terms().enumerate() {
            let sign = coefficient.is_negative();
            match (i, sign) {
                (0, true) => out.push('-'),
                (0, false) => {}
                (_, true) => out.push_str(" - "),
                (_, false) => out.push_str(" + "),
            }
            out.push_str(&latex_term(monomial, &coefficient.abs()));
        }
        out
    }
}

fn latex_term(monomial: &Monomial, magnitude: &Rational64) -> String {
    let numer = *magnitude.numer();
    let denom = *magnitude.denom();
    let coefficient = if denom != 1 {
        format!("\\frac{{{numer}}}{{{denom}}}")
    } else {
        numer.to_string()
    };
    if monomial.is_one() {
        return coefficient;
    }
    let mut parts = Vec::new();
    if !magnitude.is_one() {
        parts.push(coefficient);
    }
    for (atom, exponent) in monomial.iter() {
        parts.push(latex_atom(atom, *exponent));
    }
    parts.join(" ")
}

fn latex_atom(atom: &Atom, exponent: u32) -> String {
    let power = if exponent > 1 {
        format!("^{{{exponent}}}")
    } else {
        String::new()
    };
    match atom {
        Atom::Symbol(s) => format!("{}{power}", latex_symbol(s)),
        Atom::Cos(arg) => format!("\\cos{power}{{\\left({} \\right)}}", arg.to_latex()),
        Atom::Sin(arg) => format!("\\sin{power}{{\\left({} \\right)}}", arg.to_latex()),
    }
}

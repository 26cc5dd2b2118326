use crate::{
    SymbolicErrors,
    expr::{Atom, Expr},
    symbol::Symbol,
};
use std::collections::HashMap;

/// Numeric values for symbols, used to evaluate expressions.
#[derive(Debug, Clone, Default)]
pub struct Bindings(HashMap<Symbol, f64>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, symbol: &Symbol, value: f64) {
        self.0.insert(symbol.clone(), value);
    }

    pub fn with(mut self, symbol: &Symbol, value: f64) -> Self {
        self.bind(symbol, value);
        self
    }

    pub fn get(&self, symbol: &Symbol) -> Option<f64> {
        self.0.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Expr {
    pub fn evaluate(&self, bindings: &Bindings) -> Result<f64, SymbolicErrors> {
        let mut total = 0.0;
        for (monomial, coefficient) in self.terms() {
            let mut term = *coefficient.numer() as f64 / *coefficient.denom() as f64;
            for (atom, exponent) in monomial.iter() {
                let value = match atom {
                    Atom::Symbol(s) => bindings
                        .get(s)
                        .ok_or_else(|| SymbolicErrors::UnboundSymbol(s.name().to_string()))?,
                    Atom::Cos(arg) => arg.evaluate(bindings)?.cos(),
                    Atom::Sin(arg) => arg.evaluate(bindings)?.sin(),
                };
                term *= value.powi(*exponent as i32);
            }
            total += term;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_evaluate() {
        let xs = Symbol::real("x").unwrap();
        let ys = Symbol::positive("y").unwrap();
        let x = Expr::from(&xs);
        let y = Expr::from(&ys);
        let f = Expr::rational(1, 2).unwrap() * x.pow(2) * &y + x.cos();
        let bindings = Bindings::new().with(&xs, 0.3).with(&ys, 2.0);
        assert_abs_diff_eq!(
            f.evaluate(&bindings).unwrap(),
            0.5 * 0.09 * 2.0 + 0.3_f64.cos(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_unbound_symbol() {
        let xs = Symbol::real("x").unwrap();
        let f = Expr::from(&xs) + Expr::integer(1);
        assert_eq!(
            f.evaluate(&Bindings::new()),
            Err(SymbolicErrors::UnboundSymbol("x".to_string()))
        );
    }
}

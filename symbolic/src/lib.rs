pub mod evaluate;
pub mod expr;
pub mod format;
pub mod matrix;
mod ops;
pub mod simplify;
pub mod symbol;

pub use evaluate::Bindings;
pub use expr::{Atom, Expr, Monomial};
pub use symbol::{Domain, Symbol};

use sim_value::SimValue;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SymbolicErrors {
    #[error("symbol name cannot be empty")]
    EmptyName,
    #[error("invalid symbol name '{0}', names start with a letter and contain only letters, digits or '_'")]
    InvalidName(String),
    #[error("number {0} is not finite")]
    NonFiniteNumber(f64),
    #[error("number {0} cannot be represented as a 64 bit rational")]
    NotRepresentable(f64),
    #[error("no value bound for symbol '{0}'")]
    UnboundSymbol(String),
    #[error("denominator cannot be zero")]
    ZeroDenominator,
}

impl SimValue for Expr {
    /// # Panics
    ///
    /// Panics if `value` is not finite or does not fit a 64 bit rational.
    /// Engine code only passes small literal constants here.
    fn from_f64(value: f64) -> Self {
        match Expr::number(value) {
            Ok(expr) => expr,
            Err(e) => panic!("{e}"),
        }
    }

    fn sin(&self) -> Self {
        Expr::sin(self)
    }

    fn cos(&self) -> Self {
        Expr::cos(self)
    }

    fn is_positive(&self) -> Option<bool> {
        Expr::is_positive(self)
    }
}

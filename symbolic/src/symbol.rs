use crate::SymbolicErrors;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Assumption attached to a symbol when it is declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Domain {
    #[default]
    Real,
    Positive,
}

/// A named free variable. Two symbols are the same variable only if both the
/// name and the domain match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    name: Arc<str>,
    domain: Domain,
}

impl Symbol {
    pub fn new(name: &str, domain: Domain) -> Result<Self, SymbolicErrors> {
        let mut chars = name.chars();
        match chars.next() {
            None => return Err(SymbolicErrors::EmptyName),
            Some(first) if !first.is_alphabetic() => {
                return Err(SymbolicErrors::InvalidName(name.to_string()));
            }
            Some(_) => {}
        }
        if !chars.all(|c| c.is_alphanumeric() || c == '_') {
            return Err(SymbolicErrors::InvalidName(name.to_string()));
        }
        Ok(Self {
            name: Arc::from(name),
            domain,
        })
    }

    pub fn real(name: &str) -> Result<Self, SymbolicErrors> {
        Self::new(name, Domain::Real)
    }

    pub fn positive(name: &str) -> Result<Self, SymbolicErrors> {
        Self::new(name, Domain::Positive)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn is_positive(&self) -> bool {
        self.domain == Domain::Positive
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

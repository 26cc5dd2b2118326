use crate::{PendulumErrors, model::PendulumModel, parameters::PendulumParameters};
use serde::{Deserialize, Serialize};
use symbolic::{Expr, Symbol};
use tracing::debug;

/// Name stems for the state symbols: `q` and `v` give `q1, q2, v1, v2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatePrefixes {
    pub position: String,
    pub velocity: String,
}

impl Default for StatePrefixes {
    fn default() -> Self {
        Self {
            position: "q".to_string(),
            velocity: "v".to_string(),
        }
    }
}

/// The symbols standing in for the generalized positions and velocities.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSymbols {
    pub q: Vec<Symbol>,
    pub v: Vec<Symbol>,
}

impl StateSymbols {
    /// One-based real symbols `{position}1..` and `{velocity}1..`.
    pub fn new(prefixes: &StatePrefixes, nq: usize, nv: usize) -> Result<Self, PendulumErrors> {
        let declare = |stem: &str, n: usize| -> Result<Vec<Symbol>, PendulumErrors> {
            (1..=n)
                .map(|i| Symbol::real(&format!("{stem}{i}")).map_err(PendulumErrors::from))
                .collect()
        };
        let symbols = Self {
            q: declare(&prefixes.position, nq)?,
            v: declare(&prefixes.velocity, nv)?,
        };
        let all: Vec<&Symbol> = symbols.q.iter().chain(&symbols.v).collect();
        for (i, symbol) in all.iter().enumerate() {
            if all[..i].iter().any(|other| other.name() == symbol.name()) {
                return Err(PendulumErrors::NameCollision(symbol.name().to_string()));
            }
        }
        Ok(symbols)
    }

    pub fn all(&self) -> impl Iterator<Item = &Symbol> {
        self.q.iter().chain(&self.v)
    }
}

/// Overwrites every position and velocity of `model` with a fresh symbol.
///
/// Fails if the state does not match the tree or if a state symbol would
/// share its name with a parameter.
pub fn assign_symbolic_state(
    model: &mut PendulumModel<Expr>,
    parameters: &PendulumParameters<Symbol>,
    prefixes: &StatePrefixes,
) -> Result<StateSymbols, PendulumErrors> {
    let nq = model.system.nq();
    let nv = model.system.nv();
    model.state.check_len(nq, nv)?;

    let symbols = StateSymbols::new(prefixes, nq, nv)?;
    for symbol in symbols.all() {
        if parameters.values().iter().any(|p| p.name() == symbol.name()) {
            return Err(PendulumErrors::NameCollision(symbol.name().to_string()));
        }
    }

    for (i, symbol) in symbols.q.iter().enumerate() {
        model.state.set_q(i, Expr::from(symbol))?;
    }
    for (i, symbol) in symbols.v.iter().enumerate() {
        model.state.set_v(i, Expr::from(symbol))?;
    }
    debug!(nq, nv, "assigned symbolic state");
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use multibody::state::MultibodyState;

    fn symbolic_model() -> (PendulumModel<Expr>, PendulumParameters<Symbol>) {
        let symbols = PendulumParameters::declare(&PendulumParameters::default()).unwrap();
        let model = PendulumModel::build(&symbols.map(|s| Expr::from(s))).unwrap();
        (model, symbols)
    }

    #[test]
    fn test_assigns_one_based_symbols() {
        let (mut model, parameters) = symbolic_model();
        let symbols =
            assign_symbolic_state(&mut model, &parameters, &StatePrefixes::default()).unwrap();
        let names: Vec<&str> = symbols.all().map(|s| s.name()).collect();
        assert_eq!(names, ["q1", "q2", "v1", "v2"]);
        assert_eq!(model.state.q[1], Expr::from(&symbols.q[1]));
        assert_eq!(model.state.v[0], Expr::from(&symbols.v[0]));
    }

    #[test]
    fn test_collision_with_parameter() {
        let (mut model, parameters) = symbolic_model();
        let prefixes = StatePrefixes {
            position: "m".to_string(),
            velocity: "v".to_string(),
        };
        assert!(matches!(
            assign_symbolic_state(&mut model, &parameters, &prefixes),
            Err(PendulumErrors::NameCollision(name)) if name == "m1"
        ));
    }

    #[test]
    fn test_collision_between_positions_and_velocities() {
        let (mut model, parameters) = symbolic_model();
        let prefixes = StatePrefixes {
            position: "x".to_string(),
            velocity: "x".to_string(),
        };
        assert!(matches!(
            assign_symbolic_state(&mut model, &parameters, &prefixes),
            Err(PendulumErrors::NameCollision(_))
        ));
    }

    #[test]
    fn test_state_length_mismatch() {
        let (mut model, parameters) = symbolic_model();
        model.state = MultibodyState::zeros(3, 2);
        assert!(matches!(
            assign_symbolic_state(&mut model, &parameters, &StatePrefixes::default()),
            Err(PendulumErrors::Multibody(_))
        ));
    }
}

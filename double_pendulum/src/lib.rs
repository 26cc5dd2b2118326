//! Symbolic two-link pendulum.
//!
//! The pendulum is assembled as a kinematic tree in the `multibody` engine
//! with `symbolic::Expr` scalars, its state is replaced by fresh symbols and
//! the engine's own algorithms then produce closed-form mass matrix,
//! kinetic energy and potential energy. The same model built with `f64`
//! scalars is the numeric reference the verifier checks against.

pub mod config;
pub mod derivation;
pub mod model;
pub mod parameters;
pub mod render;
pub mod symbolic_state;
pub mod verify;

use config::ConfigErrors;
use mass_properties::MassPropertiesErrors;
use multibody::{
    MultibodyErrors, base::BaseErrors, body::BodyErrors, joint::JointErrors,
};
use symbolic::SymbolicErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PendulumErrors {
    #[error("{0}")]
    Base(#[from] BaseErrors),
    #[error("{0}")]
    Body(#[from] BodyErrors),
    #[error("{0}")]
    Config(#[from] ConfigErrors),
    #[error("{0}")]
    Joint(#[from] JointErrors),
    #[error("{0}")]
    MassProperties(#[from] MassPropertiesErrors),
    #[error("{0}")]
    Multibody(#[from] MultibodyErrors),
    #[error("symbol name '{0}' is used more than once")]
    NameCollision(String),
    #[error("expected {expected} values for '{name}', got {got}")]
    NumericStateLength {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("{0}")]
    Symbolic(#[from] SymbolicErrors),
}

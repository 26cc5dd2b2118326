use crate::{
    PendulumErrors,
    model::PendulumModel,
    parameters::PendulumParameters,
    symbolic_state::{StatePrefixes, StateSymbols, assign_symbolic_state},
};
use nalgebra::{DMatrix, DVector, Vector3};
use sim_value::half;
use symbolic::{
    Bindings, Expr, Symbol,
    matrix::{evaluate_matrix, simplify_matrix},
};
use tracing::debug;

/// Mass matrix, kinetic energy and potential energy as expressions in the
/// parameter and state symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    pub mass_matrix: DMatrix<Expr>,
    pub kinetic_energy: Expr,
    pub potential_energy: Expr,
}

/// A [`Derivation`] with every symbol bound to a number.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericDynamics {
    pub mass_matrix: DMatrix<f64>,
    pub kinetic_energy: f64,
    pub potential_energy: f64,
}

impl Derivation {
    pub fn simplify(&self) -> Self {
        Self {
            mass_matrix: simplify_matrix(&self.mass_matrix),
            kinetic_energy: self.kinetic_energy.simplify(),
            potential_energy: self.potential_energy.simplify(),
        }
    }

    pub fn evaluate(&self, bindings: &Bindings) -> Result<NumericDynamics, PendulumErrors> {
        Ok(NumericDynamics {
            mass_matrix: evaluate_matrix(&self.mass_matrix, bindings)?,
            kinetic_energy: self.kinetic_energy.evaluate(bindings)?,
            potential_energy: self.potential_energy.evaluate(bindings)?,
        })
    }
}

/// The engine's output as produced, and its canonical closed form.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicsReport {
    pub raw: Derivation,
    pub simplified: Derivation,
}

/// Manipulator form `M(q) q̈ + C(q, v) v + G(q) = τ`.
#[derive(Debug, Clone, PartialEq)]
pub struct EquationsOfMotion {
    pub mass_matrix: DMatrix<Expr>,
    /// `C(q, v) v`
    pub coriolis: DVector<Expr>,
    /// `G(q) = ∂V/∂q`
    pub gravity: DVector<Expr>,
}

impl EquationsOfMotion {
    /// `C v + G`, the joint torques needed to hold zero acceleration.
    pub fn bias(&self) -> DVector<Expr> {
        (&self.coriolis + &self.gravity).map(|e| e.simplify())
    }

    /// `τ` for given accelerations, simplified.
    pub fn torques(&self, qdd: &DVector<Expr>) -> DVector<Expr> {
        (&self.mass_matrix * qdd + self.bias()).map(|e| e.simplify())
    }
}

/// The pendulum built over `Expr` with a fully symbolic state.
#[derive(Debug, Clone)]
pub struct SymbolicPendulum {
    pub parameters: PendulumParameters<Symbol>,
    pub state: StateSymbols,
    pub model: PendulumModel<Expr>,
}

impl SymbolicPendulum {
    pub fn new(
        names: &PendulumParameters<String>,
        prefixes: &StatePrefixes,
    ) -> Result<Self, PendulumErrors> {
        let parameters = PendulumParameters::declare(names)?;
        let mut model = PendulumModel::build(&parameters.map(|s| Expr::from(s)))?;
        let state = assign_symbolic_state(&mut model, &parameters, prefixes)?;
        Ok(Self {
            parameters,
            state,
            model,
        })
    }

    pub fn derive(&self) -> Result<DynamicsReport, PendulumErrors> {
        let raw = Derivation {
            mass_matrix: self.model.mass_matrix()?,
            kinetic_energy: self.model.kinetic_energy()?,
            potential_energy: self.model.potential_energy()?,
        };
        let simplified = raw.simplify();
        debug!(
            raw_terms = raw.kinetic_energy.len() + raw.potential_energy.len(),
            simplified_terms = simplified.kinetic_energy.len() + simplified.potential_energy.len(),
            "derived pendulum dynamics"
        );
        Ok(DynamicsReport { raw, simplified })
    }

    /// Gravity and Coriolis terms from the energies of `derivation`.
    ///
    /// `G_i = ∂V/∂q_i` and `(C v)_i = Σ_jk Γ_ijk v_j v_k` with the
    /// Christoffel symbols of the first kind
    /// `Γ_ijk = ½ (∂M_ij/∂q_k + ∂M_ik/∂q_j - ∂M_jk/∂q_i)`.
    pub fn equations_of_motion(&self, derivation: &Derivation) -> EquationsOfMotion {
        let q = &self.state.q;
        let v = &self.state.v;
        let m = &derivation.mass_matrix;
        let n = q.len();

        let dm: Vec<DMatrix<Expr>> = q.iter().map(|qk| m.map(|e| e.diff(qk))).collect();

        let gravity = DVector::from_iterator(
            n,
            q.iter()
                .map(|qi| derivation.potential_energy.diff(qi).simplify()),
        );

        let mut coriolis = DVector::<Expr>::zeros(n);
        for i in 0..n {
            let mut sum = Expr::integer(0);
            for j in 0..n {
                for k in 0..n {
                    let christoffel = half::<Expr>()
                        * (&dm[k][(i, j)] + &dm[j][(i, k)] - &dm[i][(j, k)]);
                    sum += christoffel * Expr::from(&v[j]) * Expr::from(&v[k]);
                }
            }
            coriolis[i] = sum.simplify();
        }
        debug!(n, "derived equations of motion");

        EquationsOfMotion {
            mass_matrix: m.clone(),
            coriolis,
            gravity,
        }
    }

    pub fn elbow_position(&self) -> Result<Vector3<Expr>, PendulumErrors> {
        Ok(self.model.elbow_position()?.map(|e| e.simplify()))
    }

    pub fn tip_position(&self) -> Result<Vector3<Expr>, PendulumErrors> {
        Ok(self.model.tip_position()?.map(|e| e.simplify()))
    }

    /// Binds every parameter and state symbol.
    pub fn bindings(
        &self,
        values: &PendulumParameters<f64>,
        q: &[f64],
        v: &[f64],
    ) -> Result<Bindings, PendulumErrors> {
        let mut bindings = Bindings::new();
        self.parameters.bind(values, &mut bindings);
        for (name, symbols, numbers) in [("q", &self.state.q, q), ("v", &self.state.v, v)] {
            if symbols.len() != numbers.len() {
                return Err(PendulumErrors::NumericStateLength {
                    name: name.to_string(),
                    expected: symbols.len(),
                    got: numbers.len(),
                });
            }
            for (symbol, value) in symbols.iter().zip(numbers) {
                bindings.bind(symbol, *value);
            }
        }
        Ok(bindings)
    }
}

use crate::PendulumErrors;
use rand::{Rng, rngs::SmallRng};
use serde::{Deserialize, Serialize};
use symbolic::{Bindings, Domain, Symbol};

/// The nine physical parameters of the pendulum. The same record holds
/// names (`String`), declared symbols (`Symbol`), symbolic scalars (`Expr`)
/// or numbers (`f64`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendulumParameters<T> {
    /// mass of the upper link
    pub m1: T,
    /// mass of the lower link
    pub m2: T,
    /// moment of inertia of the upper link about its center of mass
    pub i1: T,
    /// moment of inertia of the lower link about its center of mass
    pub i2: T,
    /// length of the upper link, shoulder to elbow
    pub l1: T,
    /// length of the lower link, elbow to tip
    pub l2: T,
    /// shoulder to upper link center of mass
    pub lc1: T,
    /// elbow to lower link center of mass
    pub lc2: T,
    /// gravitational acceleration
    pub g: T,
}

impl<T> PendulumParameters<T> {
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> PendulumParameters<U> {
        PendulumParameters {
            m1: f(&self.m1),
            m2: f(&self.m2),
            i1: f(&self.i1),
            i2: f(&self.i2),
            l1: f(&self.l1),
            l2: f(&self.l2),
            lc1: f(&self.lc1),
            lc2: f(&self.lc2),
            g: f(&self.g),
        }
    }

    /// Fields in declaration order.
    pub fn values(&self) -> [&T; 9] {
        [
            &self.m1, &self.m2, &self.i1, &self.i2, &self.l1, &self.l2, &self.lc1, &self.lc2,
            &self.g,
        ]
    }
}

impl Default for PendulumParameters<String> {
    fn default() -> Self {
        Self {
            m1: "m1".to_string(),
            m2: "m2".to_string(),
            i1: "I1".to_string(),
            i2: "I2".to_string(),
            l1: "l1".to_string(),
            l2: "l2".to_string(),
            lc1: "lc1".to_string(),
            lc2: "lc2".to_string(),
            g: "g".to_string(),
        }
    }
}

impl Default for PendulumParameters<f64> {
    fn default() -> Self {
        Self {
            m1: 1.0,
            m2: 1.0,
            i1: 0.1,
            i2: 0.1,
            l1: 1.0,
            l2: 1.0,
            lc1: 0.5,
            lc2: 0.5,
            g: 9.81,
        }
    }
}

impl PendulumParameters<Symbol> {
    /// Declares one symbol per parameter. Masses and inertias are
    /// positive, the rest are real.
    pub fn declare(names: &PendulumParameters<String>) -> Result<Self, PendulumErrors> {
        let positive = |name: &str| Symbol::new(name, Domain::Positive);
        let real = |name: &str| Symbol::new(name, Domain::Real);
        let symbols = Self {
            m1: positive(&names.m1)?,
            m2: positive(&names.m2)?,
            i1: positive(&names.i1)?,
            i2: positive(&names.i2)?,
            l1: real(&names.l1)?,
            l2: real(&names.l2)?,
            lc1: real(&names.lc1)?,
            lc2: real(&names.lc2)?,
            g: real(&names.g)?,
        };
        let all = symbols.values();
        for (i, symbol) in all.iter().enumerate() {
            if all[..i].iter().any(|other| other.name() == symbol.name()) {
                return Err(PendulumErrors::NameCollision(symbol.name().to_string()));
            }
        }
        Ok(symbols)
    }

    pub fn bind(&self, values: &PendulumParameters<f64>, bindings: &mut Bindings) {
        for (symbol, value) in self.values().into_iter().zip(values.values()) {
            bindings.bind(symbol, *value);
        }
    }
}

impl PendulumParameters<f64> {
    /// Physically plausible random parameters: positive masses, inertias
    /// and lengths, centers of mass inside their links.
    pub fn sample(rng: &mut SmallRng) -> Self {
        let l1 = rng.random_range(0.2..2.0);
        let l2 = rng.random_range(0.2..2.0);
        Self {
            m1: rng.random_range(0.1..5.0),
            m2: rng.random_range(0.1..5.0),
            i1: rng.random_range(0.01..1.0),
            i2: rng.random_range(0.01..1.0),
            l1,
            l2,
            lc1: rng.random_range(0.05..l1),
            lc2: rng.random_range(0.05..l2),
            g: rng.random_range(1.0..20.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_declare_domains() {
        let symbols = PendulumParameters::declare(&PendulumParameters::default()).unwrap();
        assert!(symbols.m1.is_positive());
        assert!(symbols.i2.is_positive());
        assert!(!symbols.lc1.is_positive());
        assert!(!symbols.g.is_positive());
        assert_eq!(symbols.i1.name(), "I1");
    }

    #[test]
    fn test_declare_rejects_duplicates() {
        let mut names = PendulumParameters::<String>::default();
        names.l2 = "l1".to_string();
        assert!(matches!(
            PendulumParameters::declare(&names),
            Err(PendulumErrors::NameCollision(name)) if name == "l1"
        ));
    }

    #[test]
    fn test_declare_rejects_bad_name() {
        let mut names = PendulumParameters::<String>::default();
        names.g = String::new();
        assert!(matches!(
            PendulumParameters::declare(&names),
            Err(PendulumErrors::Symbolic(_))
        ));
    }

    #[test]
    fn test_sample_is_physical() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let p = PendulumParameters::sample(&mut rng);
            assert!(p.m1 > 0.0 && p.m2 > 0.0 && p.i1 > 0.0 && p.i2 > 0.0);
            assert!(p.lc1 < p.l1 && p.lc2 < p.l2);
        }
    }

    #[test]
    fn test_bind() {
        let symbols = PendulumParameters::declare(&PendulumParameters::default()).unwrap();
        let mut bindings = Bindings::new();
        symbols.bind(&PendulumParameters::default(), &mut bindings);
        assert_eq!(bindings.len(), 9);
        assert_eq!(bindings.get(&symbols.g), Some(9.81));
    }
}

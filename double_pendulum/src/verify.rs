//! Runtime checks of the derived dynamics.
//!
//! Structural properties (symmetry, homogeneity, independence, fixed point)
//! are decided on the expressions themselves. Numeric properties are checked
//! on random parameter and state samples against the same model built with
//! `f64` scalars.

use crate::{
    PendulumErrors,
    derivation::{DynamicsReport, EquationsOfMotion, SymbolicPendulum},
    model::PendulumModel,
    parameters::PendulumParameters,
};
use approx::relative_eq;
use nalgebra::DVector;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use sim_value::half;
use std::f64::consts::PI;
use symbolic::{Expr, matrix::is_symmetric};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerifyOptions {
    pub samples: usize,
    pub seed: u64,
    pub tolerance: f64,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            samples: 32,
            seed: 0,
            tolerance: 1e-9,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    fn new(name: &'static str, passed: bool, detail: String) -> Self {
        if passed {
            debug!(name, %detail, "check passed");
        } else {
            warn!(name, %detail, "check failed");
        }
        Self {
            name,
            passed,
            detail,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationReport {
    pub checks: Vec<CheckResult>,
}

impl VerificationReport {
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

/// Largest disagreement seen between symbolic and numeric values, and
/// whether every pair was within tolerance.
#[derive(Debug, Clone, Copy)]
struct Agreement {
    tolerance: f64,
    max_error: f64,
    passed: bool,
}

impl Agreement {
    fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            max_error: 0.0,
            passed: true,
        }
    }

    fn compare(&mut self, symbolic: f64, numeric: f64) {
        self.max_error = self.max_error.max((symbolic - numeric).abs());
        if !relative_eq!(
            symbolic,
            numeric,
            epsilon = self.tolerance,
            max_relative = self.tolerance
        ) {
            self.passed = false;
        }
    }

    fn detail(&self, samples: usize) -> String {
        format!("max error {:.3e} over {samples} samples", self.max_error)
    }
}

/// A random parameter set with a random state.
#[derive(Debug, Clone)]
pub struct Sample {
    pub parameters: PendulumParameters<f64>,
    pub q: [f64; 2],
    pub v: [f64; 2],
}

impl Sample {
    pub fn random(rng: &mut SmallRng) -> Self {
        Self {
            parameters: PendulumParameters::sample(rng),
            q: [rng.random_range(-PI..PI), rng.random_range(-PI..PI)],
            v: [rng.random_range(-3.0..3.0), rng.random_range(-3.0..3.0)],
        }
    }

    fn numeric_model(&self) -> Result<PendulumModel<f64>, PendulumErrors> {
        let mut model = PendulumModel::build(&self.parameters)?;
        model.set_state(self.q, self.v)?;
        Ok(model)
    }
}

pub fn verify(
    pendulum: &SymbolicPendulum,
    options: &VerifyOptions,
) -> Result<VerificationReport, PendulumErrors> {
    let report = pendulum.derive()?;
    let eom = pendulum.equations_of_motion(&report.simplified);

    let mut rng = SmallRng::seed_from_u64(options.seed);
    let samples: Vec<Sample> = (0..options.samples)
        .map(|_| Sample::random(&mut rng))
        .collect();
    debug!(samples = samples.len(), seed = options.seed, "verifying");

    let checks = vec![
        check_symmetry(&report, &samples, pendulum, options)?,
        check_numeric_agreement(&report, &samples, pendulum, options)?,
        check_kinetic_homogeneity(&report, pendulum),
        check_potential_independence(&report, pendulum),
        check_fixed_point(&report, pendulum)?,
        check_kinetic_quadratic_form(&report, pendulum),
        check_inverse_dynamics(&eom, &samples, pendulum, options)?,
    ];
    Ok(VerificationReport { checks })
}

fn check_symmetry(
    report: &DynamicsReport,
    samples: &[Sample],
    pendulum: &SymbolicPendulum,
    options: &VerifyOptions,
) -> Result<CheckResult, PendulumErrors> {
    let symbolic = is_symmetric(&report.simplified.mass_matrix);
    let mut agreement = Agreement::new(options.tolerance);
    for sample in samples {
        let bindings = pendulum.bindings(&sample.parameters, &sample.q, &sample.v)?;
        let m = report.raw.evaluate(&bindings)?.mass_matrix;
        for i in 0..m.nrows() {
            for j in 0..i {
                agreement.compare(m[(i, j)], m[(j, i)]);
            }
        }
    }
    Ok(CheckResult::new(
        "mass matrix symmetric",
        symbolic && agreement.passed,
        format!(
            "symbolic {}, raw {}",
            if symbolic { "symmetric" } else { "asymmetric" },
            agreement.detail(samples.len())
        ),
    ))
}

fn check_numeric_agreement(
    report: &DynamicsReport,
    samples: &[Sample],
    pendulum: &SymbolicPendulum,
    options: &VerifyOptions,
) -> Result<CheckResult, PendulumErrors> {
    let mut agreement = Agreement::new(options.tolerance);
    for sample in samples {
        let bindings = pendulum.bindings(&sample.parameters, &sample.q, &sample.v)?;
        let symbolic = report.simplified.evaluate(&bindings)?;
        let model = sample.numeric_model()?;
        let numeric_m = model.mass_matrix()?;
        for (s, n) in symbolic.mass_matrix.iter().zip(numeric_m.iter()) {
            agreement.compare(*s, *n);
        }
        agreement.compare(symbolic.kinetic_energy, model.kinetic_energy()?);
        agreement.compare(symbolic.potential_energy, model.potential_energy()?);
    }
    Ok(CheckResult::new(
        "symbolic matches numeric",
        agreement.passed,
        agreement.detail(samples.len()),
    ))
}

fn check_kinetic_homogeneity(report: &DynamicsReport, pendulum: &SymbolicPendulum) -> CheckResult {
    let ke = &report.simplified.kinetic_energy;
    let range = ke.degree_range(&pendulum.state.v);
    CheckResult::new(
        "kinetic energy quadratic in velocities",
        ke.is_homogeneous(&pendulum.state.v, 2),
        match range {
            Some((lo, hi)) => format!("velocity degree {lo}..={hi}"),
            None => "velocities appear inside trigonometric functions".to_string(),
        },
    )
}

fn check_potential_independence(
    report: &DynamicsReport,
    pendulum: &SymbolicPendulum,
) -> CheckResult {
    let mut free = report.raw.potential_energy.free_symbols();
    free.extend(report.simplified.potential_energy.free_symbols());
    let found: Vec<&str> = pendulum
        .state
        .v
        .iter()
        .filter(|v| free.contains(*v))
        .map(|v| v.name())
        .collect();
    CheckResult::new(
        "potential energy independent of velocities",
        found.is_empty(),
        if found.is_empty() {
            "no velocity symbols".to_string()
        } else {
            format!("contains {}", found.join(", "))
        },
    )
}

fn check_fixed_point(
    report: &DynamicsReport,
    pendulum: &SymbolicPendulum,
) -> Result<CheckResult, PendulumErrors> {
    let resimplified = report.simplified.simplify() == report.simplified;
    let rederived = pendulum.derive()?.simplified == report.simplified;
    Ok(CheckResult::new(
        "simplification stable",
        resimplified && rederived,
        format!("re-simplify {resimplified}, re-derive {rederived}"),
    ))
}

fn check_kinetic_quadratic_form(
    report: &DynamicsReport,
    pendulum: &SymbolicPendulum,
) -> CheckResult {
    let v = DVector::from_iterator(pendulum.state.v.len(), pendulum.state.v.iter().map(Expr::from));
    let m = &report.simplified.mass_matrix;
    let expected = (half::<Expr>() * v.dot(&(m * &v))).simplify();
    let residual = (&report.simplified.kinetic_energy - &expected).simplify();
    CheckResult::new(
        "kinetic energy equals half vᵀMv",
        residual == Expr::integer(0),
        format!("residual {residual}"),
    )
}

fn check_inverse_dynamics(
    eom: &EquationsOfMotion,
    samples: &[Sample],
    pendulum: &SymbolicPendulum,
    options: &VerifyOptions,
) -> Result<CheckResult, PendulumErrors> {
    let bias = eom.bias();
    let mut agreement = Agreement::new(options.tolerance);
    for sample in samples {
        let bindings = pendulum.bindings(&sample.parameters, &sample.q, &sample.v)?;
        let rnea = sample.numeric_model()?.bias_forces()?;
        for (symbolic, numeric) in bias.iter().zip(rnea.iter()) {
            agreement.compare(symbolic.evaluate(&bindings)?, *numeric);
        }
    }
    Ok(CheckResult::new(
        "C v + G matches inverse dynamics",
        agreement.passed,
        agreement.detail(samples.len()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic_state::StatePrefixes;

    fn pendulum() -> SymbolicPendulum {
        SymbolicPendulum::new(&PendulumParameters::default(), &StatePrefixes::default()).unwrap()
    }

    #[test]
    fn test_all_checks_pass() {
        let options = VerifyOptions {
            samples: 8,
            ..Default::default()
        };
        let report = verify(&pendulum(), &options).unwrap();
        assert_eq!(report.checks.len(), 7);
        for check in &report.checks {
            assert!(check.passed, "{}: {}", check.name, check.detail);
        }
        assert!(report.all_passed());
        assert_eq!(report.failures().count(), 0);
    }

    #[test]
    fn test_custom_names_pass() {
        let prefixes = StatePrefixes {
            position: "theta".to_string(),
            velocity: "omega".to_string(),
        };
        let pendulum = SymbolicPendulum::new(&PendulumParameters::default(), &prefixes).unwrap();
        let options = VerifyOptions {
            samples: 4,
            seed: 11,
            ..Default::default()
        };
        let report = verify(&pendulum, &options).unwrap();
        assert!(report.all_passed(), "{:?}", report.failures().collect::<Vec<_>>());
    }

    /// A derivation with a velocity in the potential energy, a linear
    /// velocity term in the kinetic energy and an asymmetric mass matrix.
    fn corrupted(pendulum: &SymbolicPendulum) -> DynamicsReport {
        let mut report = pendulum.derive().unwrap();
        let q1 = Expr::from(&pendulum.state.q[0]);
        let v1 = Expr::from(&pendulum.state.v[0]);
        for derivation in [&mut report.raw, &mut report.simplified] {
            derivation.potential_energy += v1.clone();
            derivation.kinetic_energy += v1.clone();
            derivation.mass_matrix[(0, 1)] += q1.clone();
        }
        report
    }

    #[test]
    fn test_corrupted_derivation_fails_every_check() {
        let pendulum = pendulum();
        let report = corrupted(&pendulum);
        let eom = pendulum.equations_of_motion(&report.simplified);
        let options = VerifyOptions {
            samples: 8,
            ..Default::default()
        };
        let mut rng = SmallRng::seed_from_u64(options.seed);
        let samples: Vec<Sample> = (0..options.samples)
            .map(|_| Sample::random(&mut rng))
            .collect();

        let report = VerificationReport {
            checks: vec![
                check_symmetry(&report, &samples, &pendulum, &options).unwrap(),
                check_numeric_agreement(&report, &samples, &pendulum, &options).unwrap(),
                check_kinetic_homogeneity(&report, &pendulum),
                check_potential_independence(&report, &pendulum),
                check_fixed_point(&report, &pendulum).unwrap(),
                check_kinetic_quadratic_form(&report, &pendulum),
                check_inverse_dynamics(&eom, &samples, &pendulum, &options).unwrap(),
            ],
        };
        for check in &report.checks {
            assert!(!check.passed, "{} passed: {}", check.name, check.detail);
        }
        assert!(!report.all_passed());
        assert_eq!(report.failures().count(), 7);
        assert_eq!(report.checks[3].detail, "contains v1");
    }

    #[test]
    fn test_samples_are_seeded() {
        let mut a = SmallRng::seed_from_u64(3);
        let mut b = SmallRng::seed_from_u64(3);
        let (sa, sb) = (Sample::random(&mut a), Sample::random(&mut b));
        assert_eq!(sa.parameters, sb.parameters);
        assert_eq!(sa.q, sb.q);
        assert_eq!(sa.v, sb.v);
    }

    #[test]
    fn test_agreement_flags_mismatch() {
        let mut agreement = Agreement::new(1e-9);
        agreement.compare(1.0, 1.0 + 1e-12);
        assert!(agreement.passed);
        agreement.compare(2.0, 2.1);
        assert!(!agreement.passed);
        assert!((agreement.max_error - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_failed_check_is_reported() {
        let report = VerificationReport {
            checks: vec![
                CheckResult::new("a", true, String::new()),
                CheckResult::new("b", false, "off".to_string()),
            ],
        };
        assert!(!report.all_passed());
        assert_eq!(report.failures().map(|c| c.name).collect::<Vec<_>>(), ["b"]);
    }
}

use crate::{PendulumErrors, parameters::PendulumParameters};
use mass_properties::{CenterOfMass, Inertia, MassProperties, MassPropertiesErrors};
use multibody::{
    joint::{JointErrors, revolute::Revolute},
    state::MultibodyState,
    system::{MultibodySystem, MultibodySystemBuilder},
};
use nalgebra::Vector3;
use sim_value::SimValue;
use tracing::debug;
use transforms::Transform;

pub const BASE: &str = "world";
pub const UPPER_LINK: &str = "upper_link";
pub const LOWER_LINK: &str = "lower_link";
pub const SHOULDER: &str = "shoulder";
pub const ELBOW: &str = "elbow";

/// A built two-link pendulum and its state.
///
/// Body frames sit at their hinges with zero angles hanging along `-z`.
/// Both joints rotate about `y` and gravity points along `-z`.
#[derive(Debug, Clone)]
pub struct PendulumModel<T: SimValue> {
    pub system: MultibodySystem<T>,
    pub state: MultibodyState<T>,
    elbow: Vector3<T>,
    tip: Vector3<T>,
}

fn link_mass_properties<T: SimValue>(
    mass: &T,
    inertia: &T,
    center_of_mass: &T,
) -> Result<MassProperties<T>, MassPropertiesErrors> {
    MassProperties::new(
        mass.clone(),
        CenterOfMass::new(T::zero(), T::zero(), -center_of_mass.clone()),
        Inertia::isotropic(inertia.clone())?,
    )
}

impl<T: SimValue> PendulumModel<T> {
    pub fn build(p: &PendulumParameters<T>) -> Result<Self, PendulumErrors> {
        let mut sys = MultibodySystemBuilder::new(BASE)?;
        sys.set_gravity_constant(T::zero(), T::zero(), -p.g.clone());

        let hinge = Revolute::new(Vector3::y()).map_err(JointErrors::from)?;
        let mut shoulder = sys.new_joint(SHOULDER, hinge.clone().into())?;
        let mut elbow = sys.new_joint(ELBOW, hinge.into())?;

        let mut upper_link = sys
            .new_body(UPPER_LINK)?
            .with_mass_properties(link_mass_properties(&p.m1, &p.i1, &p.lc1)?);
        let mut lower_link = sys
            .new_body(LOWER_LINK)?
            .with_mass_properties(link_mass_properties(&p.m2, &p.i2, &p.lc2)?);

        let elbow_offset = Vector3::new(T::zero(), T::zero(), -p.l1.clone());
        sys.base
            .connect_outer_joint(&mut shoulder, Transform::identity())?;
        upper_link.connect_inner_joint(&mut shoulder, Transform::identity())?;
        upper_link.connect_outer_joint(&mut elbow, Transform::from_translation(elbow_offset.clone()))?;
        lower_link.connect_inner_joint(&mut elbow, Transform::identity())?;

        sys.add_joint(shoulder);
        sys.add_joint(elbow);
        sys.add_body(upper_link);
        sys.add_body(lower_link);

        let system = sys.build()?;
        let state = system.create_state();
        debug!(nq = system.nq(), nv = system.nv(), "built pendulum model");
        Ok(Self {
            system,
            state,
            elbow: elbow_offset,
            tip: Vector3::new(T::zero(), T::zero(), -p.l2.clone()),
        })
    }

    /// Sets both joint angles and rates.
    pub fn set_state(&mut self, q: [T; 2], v: [T; 2]) -> Result<(), PendulumErrors> {
        for (i, (qi, vi)) in q.into_iter().zip(v).enumerate() {
            self.state.set_q(i, qi)?;
            self.state.set_v(i, vi)?;
        }
        Ok(())
    }

    pub fn mass_matrix(&self) -> Result<nalgebra::DMatrix<T>, PendulumErrors> {
        Ok(self.system.mass_matrix(&self.state)?)
    }

    pub fn kinetic_energy(&self) -> Result<T, PendulumErrors> {
        Ok(self.system.kinetic_energy(&self.state)?)
    }

    pub fn potential_energy(&self) -> Result<T, PendulumErrors> {
        Ok(self.system.potential_energy(&self.state)?)
    }

    /// Coriolis, centrifugal and gravity joint torques at zero acceleration.
    pub fn bias_forces(&self) -> Result<nalgebra::DVector<T>, PendulumErrors> {
        Ok(self.system.bias_forces(&self.state)?)
    }

    /// Joint torques that produce accelerations `qdd` from the current state.
    pub fn inverse_dynamics(&self, qdd: [T; 2]) -> Result<nalgebra::DVector<T>, PendulumErrors> {
        let qdd = nalgebra::DVector::from_iterator(2, qdd);
        Ok(self.system.inverse_dynamics(&self.state, &qdd)?)
    }

    /// Elbow hinge in world coordinates.
    pub fn elbow_position(&self) -> Result<Vector3<T>, PendulumErrors> {
        let upper = self.system.body_index(UPPER_LINK)?;
        Ok(self.system.point_in_base(&self.state, upper, &self.elbow)?)
    }

    /// End of the lower link in world coordinates.
    pub fn tip_position(&self) -> Result<Vector3<T>, PendulumErrors> {
        let lower = self.system.body_index(LOWER_LINK)?;
        Ok(self.system.point_in_base(&self.state, lower, &self.tip)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_tree_layout() {
        let model = PendulumModel::build(&PendulumParameters::<f64>::default()).unwrap();
        let sys = &model.system;
        assert_eq!(sys.base.name, BASE);
        assert_eq!(sys.joint_index(SHOULDER).unwrap(), 0);
        assert_eq!(sys.joint_index(ELBOW).unwrap(), 1);
        assert_eq!(sys.body_index(UPPER_LINK).unwrap(), 0);
        assert_eq!(sys.body_index(LOWER_LINK).unwrap(), 1);
        assert_eq!(model.state.q.len(), 2);
        assert_eq!(model.state.v.len(), 2);
    }

    #[test]
    fn test_rejects_nonpositive_mass() {
        let p = PendulumParameters {
            m2: 0.0,
            ..PendulumParameters::<f64>::default()
        };
        assert!(matches!(
            PendulumModel::build(&p),
            Err(PendulumErrors::MassProperties(
                MassPropertiesErrors::MassLessThanOrEqualToZero
            ))
        ));
    }

    #[test]
    fn test_rejects_nonpositive_inertia() {
        let p = PendulumParameters {
            i1: -1.0,
            ..PendulumParameters::<f64>::default()
        };
        assert!(PendulumModel::build(&p).is_err());
    }

    #[test]
    fn test_hanging_positions() {
        let p = PendulumParameters::<f64>::default();
        let model = PendulumModel::build(&p).unwrap();
        assert_abs_diff_eq!(
            model.elbow_position().unwrap(),
            Vector3::new(0.0, 0.0, -p.l1),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            model.tip_position().unwrap(),
            Vector3::new(0.0, 0.0, -(p.l1 + p.l2)),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_horizontal_upper_link() {
        let p = PendulumParameters::<f64>::default();
        let mut model = PendulumModel::build(&p).unwrap();
        model
            .set_state([std::f64::consts::FRAC_PI_2, 0.0], [0.0, 0.0])
            .unwrap();
        // both centers of mass at the shoulder's height
        assert_abs_diff_eq!(model.potential_energy().unwrap(), 0.0, epsilon = 1e-12);
    }
}

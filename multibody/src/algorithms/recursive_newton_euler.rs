use crate::{MultibodyErrors, state::MultibodyState, system::MultibodySystem};
use nalgebra::{DVector, Vector3};
use sim_value::SimValue;
use spatial_algebra::{ForceVector, MotionVector};
use tracing::debug;

impl<T: SimValue> MultibodySystem<T> {
    /// Joint forces that produce accelerations `qdd` from `state`, by the
    /// recursive Newton-Euler algorithm (Featherstone Table 5.1). Gravity
    /// enters as a fictitious upward acceleration of the base.
    pub fn inverse_dynamics(
        &self,
        state: &MultibodyState<T>,
        qdd: &DVector<T>,
    ) -> Result<DVector<T>, MultibodyErrors> {
        let n = self.nv();
        if qdd.len() != n {
            return Err(MultibodyErrors::AccelerationLengthMismatch { len: qdd.len(), nv: n });
        }
        let transforms = self.joint_transforms(state)?;
        let a_base = MotionVector::new(Vector3::zeros(), -self.base.gravity.clone());

        let mut velocities: Vec<MotionVector<T>> = Vec::with_capacity(n);
        let mut accelerations: Vec<MotionVector<T>> = Vec::with_capacity(n);
        let mut forces: Vec<ForceVector<T>> = Vec::with_capacity(n);

        // outward pass
        for (i, joint) in self.joints.iter().enumerate() {
            let x = &transforms[i];
            let s = joint.motion_subspace();
            let vj = s.scale(&state.v[joint.state_index]);
            let (v_parent, a_parent) = match joint.parent {
                Some(parent) => (velocities[parent].clone(), accelerations[parent].clone()),
                None => (MotionVector::zeros(), a_base.clone()),
            };
            let v = x * &v_parent + vj.clone();
            let a = x * &a_parent + s.scale(&qdd[joint.state_index]) + v.cross_motion(&vj);
            let inertia = &self.bodies[i].spatial_inertia;
            let f = inertia * &a + v.cross_force(&(inertia * &v));
            velocities.push(v);
            accelerations.push(a);
            forces.push(f);
        }

        // inward pass
        let mut tau = DVector::zeros(n);
        for i in (0..n).rev() {
            let joint = &self.joints[i];
            tau[joint.state_index] = joint.motion_subspace().dot(&forces[i]);
            if let Some(parent) = joint.parent {
                let f_parent = &transforms[i].inv() * &forces[i];
                forces[parent] = forces[parent].clone() + f_parent;
            }
        }
        debug!(n, "computed inverse dynamics");
        Ok(tau)
    }

    /// Coriolis, centrifugal and gravity terms: inverse dynamics at zero
    /// joint acceleration.
    pub fn bias_forces(&self, state: &MultibodyState<T>) -> Result<DVector<T>, MultibodyErrors> {
        self.inverse_dynamics(state, &DVector::zeros(self.nv()))
    }

    /// Generalized gravity forces: bias forces with the velocities zeroed.
    pub fn gravity_forces(&self, state: &MultibodyState<T>) -> Result<DVector<T>, MultibodyErrors> {
        let mut at_rest = state.clone();
        at_rest.v = DVector::zeros(state.v.len());
        self.bias_forces(&at_rest)
    }
}

#[cfg(test)]
mod tests {
    use crate::algorithms::test_models::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::DVector;

    #[test]
    fn test_gravity_forces() {
        let sys = two_link();
        let mut state = sys.create_state();
        let (q1, q2) = (0.6, -1.3);
        state.q[0] = q1;
        state.q[1] = q2;
        state.v[0] = 3.0;
        let g = sys.gravity_forces(&state).unwrap();
        let expected = gravity_forces(q1, q2);
        assert_abs_diff_eq!(g[0], expected[0], epsilon = 1e-12);
        assert_abs_diff_eq!(g[1], expected[1], epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_dynamics_is_mass_matrix_plus_bias() {
        let sys = two_link();
        let mut state = sys.create_state();
        state.q[0] = -0.2;
        state.q[1] = 0.9;
        state.v[0] = 1.1;
        state.v[1] = -2.3;
        let qdd = DVector::from_vec(vec![0.5, -1.5]);
        let tau = sys.inverse_dynamics(&state, &qdd).unwrap();
        let h = sys.mass_matrix(&state).unwrap();
        let bias = sys.bias_forces(&state).unwrap();
        assert_abs_diff_eq!(tau, h * qdd + bias, epsilon = 1e-10);
    }

    #[test]
    fn test_centrifugal_term() {
        // with no gravity the elbow feels m2 l1 lc2 sin(q2) v1^2
        let mut sys = two_link();
        sys.base.gravity = nalgebra::Vector3::zeros();
        let mut state = sys.create_state();
        let (q2, v1) = (0.7, 2.0);
        state.q[1] = q2;
        state.v[0] = v1;
        let bias = sys.bias_forces(&state).unwrap();
        assert_abs_diff_eq!(bias[1], M2 * L1 * LC2 * q2.sin() * v1 * v1, epsilon = 1e-12);
    }

    #[test]
    fn test_wrong_acceleration_length() {
        let sys = two_link();
        let state = sys.create_state();
        assert!(sys.inverse_dynamics(&state, &DVector::zeros(3)).is_err());
    }
}

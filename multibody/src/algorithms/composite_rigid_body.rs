use crate::{MultibodyErrors, state::MultibodyState, system::MultibodySystem};
use nalgebra::DMatrix;
use sim_value::SimValue;
use spatial_algebra::SpatialInertia;
use tracing::debug;

impl<T: SimValue> MultibodySystem<T> {
    /// Joint space mass matrix by the composite rigid body algorithm
    /// (Featherstone Table 6.2). Only the positions in `state` are used.
    pub fn mass_matrix(&self, state: &MultibodyState<T>) -> Result<DMatrix<T>, MultibodyErrors> {
        let transforms = self.joint_transforms(state)?;
        let n = self.nv();

        // composite inertias, accumulated from the tips inward
        let mut composite: Vec<SpatialInertia<T>> = self
            .bodies
            .iter()
            .map(|body| body.spatial_inertia.clone())
            .collect();
        for i in (0..n).rev() {
            if let Some(parent) = self.joints[i].parent {
                let shifted = composite[i].to_parent(&transforms[i]);
                composite[parent] = composite[parent].clone() + shifted;
            }
        }

        // body i is the outer body of joint i and joint i owns state entry i
        let mut h = DMatrix::zeros(n, n);
        for i in 0..n {
            let s_i = self.joints[i].motion_subspace();
            let mut f = &composite[i] * &s_i;
            h[(i, i)] = s_i.dot(&f);
            let mut j = i;
            while let Some(parent) = self.joints[j].parent {
                f = &transforms[j].inv() * &f;
                j = parent;
                let h_ij = self.joints[j].motion_subspace().dot(&f);
                h[(j, i)] = h_ij.clone();
                h[(i, j)] = h_ij;
            }
        }
        debug!(n, "computed mass matrix");
        Ok(h)
    }
}

#[cfg(test)]
mod tests {
    use crate::algorithms::test_models::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_two_link_mass_matrix() {
        let sys = two_link();
        for (q1, q2) in [(0.0, 0.0), (0.4, 1.1), (-2.0, -0.3)] {
            let mut state = sys.create_state();
            state.q[0] = q1;
            state.q[1] = q2;
            let h = sys.mass_matrix(&state).unwrap();
            let expected = mass_matrix(q2);
            for i in 0..2 {
                for j in 0..2 {
                    assert_abs_diff_eq!(h[(i, j)], expected[i][j], epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_mass_matrix_positive_definite() {
        let sys = two_link();
        let mut state = sys.create_state();
        state.q[1] = 2.5;
        let h = sys.mass_matrix(&state).unwrap();
        assert!(h.clone().cholesky().is_some());
        assert_abs_diff_eq!(h.clone(), h.transpose(), epsilon = 1e-15);
    }
}

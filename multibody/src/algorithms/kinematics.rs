use crate::{MultibodyErrors, state::MultibodyState, system::MultibodySystem};
use nalgebra::Vector3;
use sim_value::SimValue;
use spatial_algebra::{MotionVector, SpatialTransform};

impl<T: SimValue> MultibodySystem<T> {
    /// Outer body from inner body transform of every joint, `X_i` in
    /// Featherstone's notation.
    pub fn joint_transforms(
        &self,
        state: &MultibodyState<T>,
    ) -> Result<Vec<SpatialTransform<T>>, MultibodyErrors> {
        state.check_len(self.nq(), self.nv())?;
        Ok(self
            .joints
            .iter()
            .map(|joint| joint.ob_from_ib(&state.q[joint.state_index]))
            .collect())
    }

    /// Body frame from base frame for every body.
    pub fn body_placements(
        &self,
        state: &MultibodyState<T>,
    ) -> Result<Vec<SpatialTransform<T>>, MultibodyErrors> {
        let transforms = self.joint_transforms(state)?;
        let mut placements: Vec<SpatialTransform<T>> = Vec::with_capacity(transforms.len());
        for (joint, ob_from_ib) in self.joints.iter().zip(transforms) {
            let ob_from_base = match joint.parent {
                Some(parent) => &ob_from_ib * &placements[parent],
                None => ob_from_ib,
            };
            placements.push(ob_from_base);
        }
        Ok(placements)
    }

    /// Spatial velocity of every body in its own frame.
    pub fn body_velocities(
        &self,
        state: &MultibodyState<T>,
    ) -> Result<Vec<MotionVector<T>>, MultibodyErrors> {
        let transforms = self.joint_transforms(state)?;
        let mut velocities: Vec<MotionVector<T>> = Vec::with_capacity(transforms.len());
        for (joint, ob_from_ib) in self.joints.iter().zip(&transforms) {
            let vj = joint.motion_subspace().scale(&state.v[joint.state_index]);
            let v = match joint.parent {
                Some(parent) => ob_from_ib * &velocities[parent] + vj,
                None => vj,
            };
            velocities.push(v);
        }
        Ok(velocities)
    }

    /// Position in base coordinates of a point fixed in body `body`.
    pub fn point_in_base(
        &self,
        state: &MultibodyState<T>,
        body: usize,
        point: &Vector3<T>,
    ) -> Result<Vector3<T>, MultibodyErrors> {
        if body >= self.bodies.len() {
            return Err(MultibodyErrors::BodyNotFound(body.to_string()));
        }
        let placements = self.body_placements(state)?;
        Ok(placements[body].transform().inverse_transform_point(point))
    }

    pub fn center_of_mass_in_base(
        &self,
        state: &MultibodyState<T>,
        body: usize,
    ) -> Result<Vector3<T>, MultibodyErrors> {
        let com = self
            .bodies
            .get(body)
            .ok_or_else(|| MultibodyErrors::BodyNotFound(body.to_string()))?
            .mass_properties
            .center_of_mass
            .vector();
        self.point_in_base(state, body, &com)
    }
}

use crate::{MultibodyErrors, state::MultibodyState, system::MultibodySystem};
use sim_value::{SimValue, half};

impl<T: SimValue> MultibodySystem<T> {
    /// Sum over bodies of `1/2 vᵀ I v` with body velocities and inertias in
    /// body coordinates.
    pub fn kinetic_energy(&self, state: &MultibodyState<T>) -> Result<T, MultibodyErrors> {
        let velocities = self.body_velocities(state)?;
        let mut ke = T::zero();
        for (body, v) in self.bodies.iter().zip(&velocities) {
            let momentum = &body.spatial_inertia * v;
            ke += v.dot(&momentum);
        }
        Ok(half::<T>() * ke)
    }

    /// Gravitational potential energy relative to the base origin,
    /// `-Σ m g·c` with each center of mass `c` in base coordinates.
    pub fn potential_energy(&self, state: &MultibodyState<T>) -> Result<T, MultibodyErrors> {
        let placements = self.body_placements(state)?;
        let mut pe = T::zero();
        for (body, body_from_base) in self.bodies.iter().zip(&placements) {
            let mp = &body.mass_properties;
            let com = body_from_base
                .transform()
                .inverse_transform_point(&mp.center_of_mass.vector());
            pe -= mp.mass.clone() * self.base.gravity.dot(&com);
        }
        Ok(pe)
    }

    pub fn total_energy(&self, state: &MultibodyState<T>) -> Result<T, MultibodyErrors> {
        Ok(self.kinetic_energy(state)? + self.potential_energy(state)?)
    }
}

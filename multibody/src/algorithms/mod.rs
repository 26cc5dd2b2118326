pub mod composite_rigid_body;
pub mod energy;
pub mod kinematics;
pub mod recursive_newton_euler;

#[cfg(test)]
pub(crate) mod test_models {
    use crate::{
        joint::{JointModels, revolute::Revolute},
        system::{MultibodySystem, MultibodySystemBuilder},
    };
    use mass_properties::{CenterOfMass, Inertia, MassProperties};
    use nalgebra::Vector3;
    use transforms::Transform;

    pub const M1: f64 = 1.3;
    pub const M2: f64 = 0.7;
    pub const I1: f64 = 0.11;
    pub const I2: f64 = 0.05;
    pub const L1: f64 = 1.2;
    pub const LC1: f64 = 0.5;
    pub const LC2: f64 = 0.4;
    pub const G: f64 = 9.81;

    fn link(mass: f64, inertia: f64, lc: f64) -> MassProperties<f64> {
        MassProperties::new(
            mass,
            CenterOfMass::new(0.0, 0.0, -lc),
            Inertia::isotropic(inertia).unwrap(),
        )
        .unwrap()
    }

    /// Two links hanging along -z, hinged about y.
    pub fn two_link() -> MultibodySystem<f64> {
        let mut sys = MultibodySystemBuilder::new("world").unwrap();
        sys.set_gravity_constant(0.0, 0.0, -G);
        let axis = || -> JointModels { Revolute::new(Vector3::y()).unwrap().into() };
        let mut j1 = sys.new_joint("j1", axis()).unwrap();
        let mut b1 = sys.new_body("b1").unwrap().with_mass_properties(link(M1, I1, LC1));
        let mut j2 = sys.new_joint("j2", axis()).unwrap();
        let mut b2 = sys.new_body("b2").unwrap().with_mass_properties(link(M2, I2, LC2));
        sys.base
            .connect_outer_joint(&mut j1, Transform::identity())
            .unwrap();
        b1.connect_inner_joint(&mut j1, Transform::identity()).unwrap();
        b1.connect_outer_joint(&mut j2, Transform::from_translation(Vector3::new(0.0, 0.0, -L1)))
            .unwrap();
        b2.connect_inner_joint(&mut j2, Transform::identity()).unwrap();
        sys.add_joint(j1);
        sys.add_joint(j2);
        sys.add_body(b1);
        sys.add_body(b2);
        sys.build().unwrap()
    }

    pub fn mass_matrix(q2: f64) -> [[f64; 2]; 2] {
        let c2 = q2.cos();
        let m11 = I1 + I2 + M1 * LC1 * LC1 + M2 * (L1 * L1 + LC2 * LC2 + 2.0 * L1 * LC2 * c2);
        let m12 = I2 + M2 * (LC2 * LC2 + L1 * LC2 * c2);
        let m22 = I2 + M2 * LC2 * LC2;
        [[m11, m12], [m12, m22]]
    }

    pub fn potential_energy(q1: f64, q2: f64) -> f64 {
        -G * (M1 * LC1 * q1.cos() + M2 * (L1 * q1.cos() + LC2 * (q1 + q2).cos()))
    }

    pub fn gravity_forces(q1: f64, q2: f64) -> [f64; 2] {
        let g2 = G * M2 * LC2 * (q1 + q2).sin();
        [G * (M1 * LC1 + M2 * L1) * q1.sin() + g2, g2]
    }
}

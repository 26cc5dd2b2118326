use mass_properties::MassProperties;
use nalgebra::{Matrix3, Matrix6, Vector3, Vector6};
use sim_value::SimValue;
use std::ops::{Add, Mul, Neg, Sub};
use transforms::{Transform, skew};

#[derive(Clone, Debug, PartialEq)]
pub struct SpatialVector<T: SimValue> {
    pub rotation: Vector3<T>,
    pub translation: Vector3<T>,
}

impl<T: SimValue> Default for SpatialVector<T> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<T: SimValue> SpatialVector<T> {
    pub fn new(rotation: Vector3<T>, translation: Vector3<T>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn zeros() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }

    pub fn vector(&self) -> Vector6<T> {
        let r = &self.rotation;
        let t = &self.translation;
        Vector6::new(
            r[0].clone(),
            r[1].clone(),
            r[2].clone(),
            t[0].clone(),
            t[1].clone(),
            t[2].clone(),
        )
    }

    /// Featherstone 2.34
    pub fn cross_force(&self, rhs: &SpatialVector<T>) -> SpatialVector<T> {
        let rotation =
            self.rotation.cross(&rhs.rotation) + self.translation.cross(&rhs.translation);
        let translation = self.rotation.cross(&rhs.translation);
        SpatialVector::new(rotation, translation)
    }

    /// Featherstone 2.33
    pub fn cross_motion(&self, rhs: &SpatialVector<T>) -> SpatialVector<T> {
        let rotation = self.rotation.cross(&rhs.rotation);
        let translation =
            self.rotation.cross(&rhs.translation) + self.translation.cross(&rhs.rotation);
        SpatialVector::new(rotation, translation)
    }

    pub fn scale(&self, factor: &T) -> SpatialVector<T> {
        SpatialVector::new(
            &self.rotation * factor.clone(),
            &self.translation * factor.clone(),
        )
    }
}

impl<T: SimValue> From<Vector6<T>> for SpatialVector<T> {
    fn from(v: Vector6<T>) -> SpatialVector<T> {
        let rotation = Vector3::new(v[0].clone(), v[1].clone(), v[2].clone());
        let translation = Vector3::new(v[3].clone(), v[4].clone(), v[5].clone());
        SpatialVector::new(rotation, translation)
    }
}

impl<T: SimValue> Add<SpatialVector<T>> for SpatialVector<T> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.rotation + rhs.rotation,
            self.translation + rhs.translation,
        )
    }
}

impl<T: SimValue> Sub<SpatialVector<T>> for SpatialVector<T> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.rotation - rhs.rotation,
            self.translation - rhs.translation,
        )
    }
}

impl<T: SimValue> Neg for SpatialVector<T> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.rotation, -self.translation)
    }
}

/// Velocities and accelerations: angular part first, then linear.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionVector<T: SimValue>(pub SpatialVector<T>);

impl<T: SimValue> MotionVector<T> {
    pub fn new(angular: Vector3<T>, linear: Vector3<T>) -> Self {
        Self(SpatialVector::new(angular, linear))
    }

    pub fn zeros() -> Self {
        Self(SpatialVector::zeros())
    }

    pub fn angular(&self) -> &Vector3<T> {
        &self.0.rotation
    }

    pub fn linear(&self) -> &Vector3<T> {
        &self.0.translation
    }

    pub fn vector(&self) -> Vector6<T> {
        self.0.vector()
    }

    pub fn scale(&self, factor: &T) -> MotionVector<T> {
        MotionVector(self.0.scale(factor))
    }

    pub fn cross_motion(&self, rhs: &MotionVector<T>) -> MotionVector<T> {
        MotionVector(self.0.cross_motion(&rhs.0))
    }

    pub fn cross_force(&self, rhs: &ForceVector<T>) -> ForceVector<T> {
        ForceVector(self.0.cross_force(&rhs.0))
    }

    /// Power delivered by `force` along this motion.
    pub fn dot(&self, force: &ForceVector<T>) -> T {
        self.0.rotation.dot(&force.0.rotation) + self.0.translation.dot(&force.0.translation)
    }
}

impl<T: SimValue> Add<MotionVector<T>> for MotionVector<T> {
    type Output = MotionVector<T>;
    #[inline]
    fn add(self, rhs: MotionVector<T>) -> MotionVector<T> {
        MotionVector(self.0 + rhs.0)
    }
}

impl<T: SimValue> Sub<MotionVector<T>> for MotionVector<T> {
    type Output = MotionVector<T>;
    #[inline]
    fn sub(self, rhs: MotionVector<T>) -> MotionVector<T> {
        MotionVector(self.0 - rhs.0)
    }
}

/// Forces and momenta: moment first, then force.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForceVector<T: SimValue>(pub SpatialVector<T>);

impl<T: SimValue> ForceVector<T> {
    pub fn new(moment: Vector3<T>, force: Vector3<T>) -> Self {
        Self(SpatialVector::new(moment, force))
    }

    pub fn zeros() -> Self {
        Self(SpatialVector::zeros())
    }

    pub fn moment(&self) -> &Vector3<T> {
        &self.0.rotation
    }

    pub fn force(&self) -> &Vector3<T> {
        &self.0.translation
    }

    pub fn vector(&self) -> Vector6<T> {
        self.0.vector()
    }
}

impl<T: SimValue> Add<ForceVector<T>> for ForceVector<T> {
    type Output = ForceVector<T>;
    #[inline]
    fn add(self, rhs: ForceVector<T>) -> ForceVector<T> {
        ForceVector(self.0 + rhs.0)
    }
}

impl<T: SimValue> Sub<ForceVector<T>> for ForceVector<T> {
    type Output = ForceVector<T>;
    #[inline]
    fn sub(self, rhs: ForceVector<T>) -> ForceVector<T> {
        ForceVector(self.0 - rhs.0)
    }
}

// wrapper on Transform so the spatial products can live in this crate
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpatialTransform<T: SimValue>(pub Transform<T>);

impl<T: SimValue> SpatialTransform<T> {
    #[inline]
    pub fn inv(&self) -> SpatialTransform<T> {
        SpatialTransform::from(self.0.inv())
    }

    pub fn transform(&self) -> &Transform<T> {
        &self.0
    }

    /// 6x6 motion transform `[E 0; -E[r]x E]`.
    pub fn motion_matrix(&self) -> Matrix6<T> {
        let e = &self.0.rotation;
        let lower_left = -(e * skew(&self.0.translation));
        let mut m = Matrix6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(e);
        m.fixed_view_mut::<3, 3>(3, 0).copy_from(&lower_left);
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(e);
        m
    }
}

impl<T: SimValue> From<Transform<T>> for SpatialTransform<T> {
    #[inline]
    fn from(value: Transform<T>) -> Self {
        Self(value)
    }
}

impl<T: SimValue> Mul<&MotionVector<T>> for &SpatialTransform<T> {
    type Output = MotionVector<T>;
    fn mul(self, motion: &MotionVector<T>) -> MotionVector<T> {
        let e = &self.0.rotation;
        let r = &self.0.translation;
        let rotation = e * &motion.0.rotation;
        let translation = e * (&motion.0.translation - r.cross(&motion.0.rotation));
        MotionVector::new(rotation, translation)
    }
}

impl<T: SimValue> Mul<&ForceVector<T>> for &SpatialTransform<T> {
    type Output = ForceVector<T>;
    fn mul(self, force: &ForceVector<T>) -> ForceVector<T> {
        let e = &self.0.rotation;
        let r = &self.0.translation;
        let rotation = e * (&force.0.rotation - r.cross(&force.0.translation));
        let translation = e * &force.0.translation;
        ForceVector::new(rotation, translation)
    }
}

impl<T: SimValue> Mul<&SpatialTransform<T>> for &SpatialTransform<T> {
    type Output = SpatialTransform<T>;
    #[inline]
    fn mul(self, rhs: &SpatialTransform<T>) -> SpatialTransform<T> {
        SpatialTransform::from(&self.0 * &rhs.0)
    }
}

/// Rigid body inertia about the body frame origin, as a 6x6 matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialInertia<T: SimValue>(pub Matrix6<T>);

impl<T: SimValue> SpatialInertia<T> {
    pub fn zeros() -> Self {
        Self(Matrix6::zeros())
    }

    pub fn matrix(&self) -> &Matrix6<T> {
        &self.0
    }

    /// Expresses an inertia given in a child frame in its parent frame,
    /// `Xᵀ I X` with `child_from_parent` as `X`.
    pub fn to_parent(&self, child_from_parent: &SpatialTransform<T>) -> SpatialInertia<T> {
        let x = child_from_parent.motion_matrix();
        SpatialInertia(x.transpose() * &self.0 * x)
    }
}

impl<T: SimValue> From<&MassProperties<T>> for SpatialInertia<T> {
    fn from(mp: &MassProperties<T>) -> SpatialInertia<T> {
        let mass = mp.mass.clone();
        let cx = skew(&mp.center_of_mass.vector());
        let cxt = cx.transpose();

        let quad11 = mp.inertia.matrix() + &cx * &cxt * mass.clone();
        let quad12 = &cx * mass.clone();
        let quad21 = &cxt * mass.clone();
        let quad22 = Matrix3::identity() * mass;

        let mut m = Matrix6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&quad11);
        m.fixed_view_mut::<3, 3>(0, 3).copy_from(&quad12);
        m.fixed_view_mut::<3, 3>(3, 0).copy_from(&quad21);
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(&quad22);
        SpatialInertia(m)
    }
}

impl<T: SimValue> Add<SpatialInertia<T>> for SpatialInertia<T> {
    type Output = SpatialInertia<T>;
    fn add(self, rhs: SpatialInertia<T>) -> SpatialInertia<T> {
        SpatialInertia(self.0 + rhs.0)
    }
}

impl<T: SimValue> Mul<&MotionVector<T>> for &SpatialInertia<T> {
    type Output = ForceVector<T>;
    fn mul(self, motion: &MotionVector<T>) -> ForceVector<T> {
        ForceVector(SpatialVector::from(&self.0 * motion.vector()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use mass_properties::{CenterOfMass, Inertia};

    const TOL: f64 = 1e-12;

    fn sample_transform() -> SpatialTransform<f64> {
        let rotation = Transform::from_axis_angle(&Vector3::y(), &0.7);
        let translation = Transform::from_translation(Vector3::new(0.3, -0.2, 0.5));
        SpatialTransform(&rotation * &translation)
    }

    #[test]
    fn test_motion_matrix_matches_product() {
        let x = sample_transform();
        let v = MotionVector::new(Vector3::new(0.1, 0.2, 0.3), Vector3::new(-1.0, 0.5, 2.0));
        let by_matrix = x.motion_matrix() * v.vector();
        assert_abs_diff_eq!((&x * &v).vector(), by_matrix, epsilon = TOL);
    }

    #[test]
    fn test_power_is_invariant() {
        let x = sample_transform();
        let v = MotionVector::new(Vector3::new(0.1, 0.2, 0.3), Vector3::new(-1.0, 0.5, 2.0));
        let f = ForceVector::new(Vector3::new(0.4, -0.6, 0.2), Vector3::new(3.0, 1.0, -2.0));
        assert_abs_diff_eq!(v.dot(&f), (&x * &v).dot(&(&x * &f)), epsilon = TOL);
    }

    #[test]
    fn test_inverse() {
        let x = sample_transform();
        let v = MotionVector::new(Vector3::new(0.1, 0.2, 0.3), Vector3::new(-1.0, 0.5, 2.0));
        let back = &x.inv() * &(&x * &v);
        assert_abs_diff_eq!(back.vector(), v.vector(), epsilon = TOL);
    }

    #[test]
    fn test_cross_duality() {
        // (v x* f) . m == -f . (v x m)
        let v = MotionVector::new(Vector3::new(0.1, 0.2, 0.3), Vector3::new(-1.0, 0.5, 2.0));
        let m = MotionVector::new(Vector3::new(0.7, -0.1, 0.4), Vector3::new(0.2, 0.0, -0.3));
        let f = ForceVector::new(Vector3::new(0.4, -0.6, 0.2), Vector3::new(3.0, 1.0, -2.0));
        let lhs = m.dot(&v.cross_force(&f));
        let rhs = -v.cross_motion(&m).dot(&f);
        assert_abs_diff_eq!(lhs, rhs, epsilon = TOL);
    }

    #[test]
    fn test_inertia_kinetic_energy_of_point_offset() {
        // mass 2 at (0, 0, -1), spinning at 3 rad/s about y: ke = 1/2 (I + m d^2) w^2
        let mp = MassProperties::new(
            2.0,
            CenterOfMass::new(0.0, 0.0, -1.0),
            Inertia::isotropic(0.5).unwrap(),
        )
        .unwrap();
        let inertia = SpatialInertia::from(&mp);
        let v = MotionVector::new(Vector3::new(0.0, 3.0, 0.0), Vector3::zeros());
        let ke = 0.5 * v.dot(&(&inertia * &v));
        assert_abs_diff_eq!(ke, 0.5 * (0.5 + 2.0) * 9.0, epsilon = TOL);
    }

    #[test]
    fn test_inertia_to_parent_preserves_energy() {
        let mp = MassProperties::new(
            1.5,
            CenterOfMass::new(0.1, 0.0, -0.4),
            Inertia::new(0.2, 0.3, 0.25, 0.01, 0.0, 0.02).unwrap(),
        )
        .unwrap();
        let inertia = SpatialInertia::from(&mp);
        let child_from_parent = sample_transform();
        let v_parent =
            MotionVector::new(Vector3::new(0.3, -0.2, 0.1), Vector3::new(0.5, 1.0, -0.7));
        let v_child = &child_from_parent * &v_parent;
        let parent_inertia = inertia.to_parent(&child_from_parent);
        assert_abs_diff_eq!(
            v_child.dot(&(&inertia * &v_child)),
            v_parent.dot(&(&parent_inertia * &v_parent)),
            epsilon = 1e-10
        );
    }
}

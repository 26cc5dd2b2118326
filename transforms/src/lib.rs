use nalgebra::{Matrix3, Vector3};
use sim_value::SimValue;
use std::ops::Mul;

/// Rigid transform from frame A to frame B, written `b_from_a`.
///
/// `rotation` maps coordinates expressed in A onto B's axes and
/// `translation` is the origin of B expressed in A. With this convention a
/// point transforms as `p_b = E * (p_a - r)` and transforms compose like
/// matrices, right to left: `c_from_a = c_from_b * b_from_a`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform<T: SimValue> {
    pub rotation: Matrix3<T>,
    pub translation: Vector3<T>,
}

impl<T: SimValue> Default for Transform<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: SimValue> Transform<T> {
    pub fn new(rotation: Matrix3<T>, translation: Vector3<T>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }

    pub fn from_translation(translation: Vector3<T>) -> Self {
        Self::new(Matrix3::identity(), translation)
    }

    /// Frame B is frame A rotated by `angle` about the unit vector `axis`.
    /// The coordinate rotation is the transpose of the Rodrigues matrix:
    /// `E = cos(θ) I - sin(θ) [a]x + (1 - cos(θ)) a aᵀ`.
    pub fn from_axis_angle(axis: &Vector3<T>, angle: &T) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        let one_minus_c = T::one() - c.clone();
        let ax = skew(axis);
        let aat = axis * axis.transpose();
        let rotation = Matrix3::identity().map(|e: T| e * c.clone())
            - ax.map(|e: T| e * s.clone())
            + aat.map(|e: T| e * one_minus_c.clone());
        Self::new(rotation, Vector3::zeros())
    }

    /// `a_from_b` given `b_from_a`.
    pub fn inv(&self) -> Self {
        let rotation = self.rotation.transpose();
        let translation = -(&self.rotation * &self.translation);
        Self::new(rotation, translation)
    }

    /// Expresses a point given in frame A in frame B.
    pub fn transform_point(&self, point: &Vector3<T>) -> Vector3<T> {
        &self.rotation * (point - &self.translation)
    }

    /// Expresses a point given in frame B in frame A.
    pub fn inverse_transform_point(&self, point: &Vector3<T>) -> Vector3<T> {
        self.rotation.tr_mul(point) + &self.translation
    }

    /// Rotates a free vector from A to B (no translation).
    pub fn rotate(&self, vector: &Vector3<T>) -> Vector3<T> {
        &self.rotation * vector
    }
}

impl<T: SimValue> Mul<&Transform<T>> for &Transform<T> {
    type Output = Transform<T>;

    /// `c_from_b * b_from_a`
    fn mul(self, rhs: &Transform<T>) -> Transform<T> {
        let rotation = &self.rotation * &rhs.rotation;
        let translation = &rhs.translation + rhs.rotation.tr_mul(&self.translation);
        Transform::new(rotation, translation)
    }
}

impl<T: SimValue> Mul<Transform<T>> for Transform<T> {
    type Output = Transform<T>;

    fn mul(self, rhs: Transform<T>) -> Transform<T> {
        &self * &rhs
    }
}

/// Cross product matrix: `skew(a) * b == a.cross(&b)`.
pub fn skew<T: SimValue>(v: &Vector3<T>) -> Matrix3<T> {
    let (x, y, z) = (v[0].clone(), v[1].clone(), v[2].clone());
    Matrix3::new(
        T::zero(),
        -z.clone(),
        y.clone(),
        z,
        T::zero(),
        -x.clone(),
        -y,
        x,
        T::zero(),
    )
}

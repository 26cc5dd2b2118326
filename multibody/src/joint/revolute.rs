use nalgebra::Vector3;
use sim_value::SimValue;
use spatial_algebra::{MotionVector, SpatialTransform};
use thiserror::Error;
use transforms::Transform;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RevoluteErrors {
    #[error("revolute axis must be finite")]
    NonFiniteAxis,
    #[error("revolute axis cannot be zero")]
    ZeroAxis,
}

/// Rotation about a fixed unit axis through the joint frame origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Revolute {
    axis: Vector3<f64>,
}

impl Revolute {
    pub fn new(axis: Vector3<f64>) -> Result<Self, RevoluteErrors> {
        if axis.iter().any(|a| !a.is_finite()) {
            return Err(RevoluteErrors::NonFiniteAxis);
        }
        let norm = axis.norm();
        if norm < f64::EPSILON {
            return Err(RevoluteErrors::ZeroAxis);
        }
        Ok(Self { axis: axis / norm })
    }

    pub fn axis(&self) -> &Vector3<f64> {
        &self.axis
    }

    fn axis_as<T: SimValue>(&self) -> Vector3<T> {
        self.axis.map(T::from_f64)
    }

    pub fn jof_from_jif<T: SimValue>(&self, q: &T) -> SpatialTransform<T> {
        SpatialTransform::from(Transform::from_axis_angle(&self.axis_as(), q))
    }

    pub fn motion_subspace<T: SimValue>(&self) -> MotionVector<T> {
        MotionVector::new(self.axis_as(), Vector3::zeros())
    }
}

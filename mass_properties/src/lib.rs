use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use sim_value::SimValue;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MassPropertiesErrors {
    #[error("Ixx cant be less than or equal to zero")]
    IxxLessThanOrEqualToZero,
    #[error("Iyy cant be less than or equal to zero")]
    IyyLessThanOrEqualToZero,
    #[error("Izz cant be less than or equal to zero")]
    IzzLessThanOrEqualToZero,
    #[error("mass cannot be less than or equal to zero")]
    MassLessThanOrEqualToZero,
}

/// Rejects values that are provably non-positive. Values whose sign cannot
/// be decided (a real-valued symbol, say) are accepted.
fn check_positive<T: SimValue>(value: &T, error: MassPropertiesErrors) -> Result<(), MassPropertiesErrors> {
    match value.is_positive() {
        Some(false) => Err(error),
        _ => Ok(()),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CenterOfMass<T: SimValue> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: SimValue> Default for CenterOfMass<T> {
    fn default() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }
}

impl<T: SimValue> CenterOfMass<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    pub fn vector(&self) -> Vector3<T> {
        Vector3::new(self.x.clone(), self.y.clone(), self.z.clone())
    }
}

impl<T: SimValue> From<Vector3<T>> for CenterOfMass<T> {
    fn from(v: Vector3<T>) -> CenterOfMass<T> {
        CenterOfMass::new(v[0].clone(), v[1].clone(), v[2].clone())
    }
}

/// Inertia tensor about the center of mass, in body coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inertia<T: SimValue> {
    pub ixx: T,
    pub ixy: T,
    pub ixz: T,
    pub iyy: T,
    pub iyz: T,
    pub izz: T,
}

impl<T: SimValue> Inertia<T> {
    pub fn new(ixx: T, iyy: T, izz: T, ixy: T, ixz: T, iyz: T) -> Result<Self, MassPropertiesErrors> {
        check_positive(&ixx, MassPropertiesErrors::IxxLessThanOrEqualToZero)?;
        check_positive(&iyy, MassPropertiesErrors::IyyLessThanOrEqualToZero)?;
        check_positive(&izz, MassPropertiesErrors::IzzLessThanOrEqualToZero)?;
        Ok(Self {
            ixx,
            ixy,
            ixz,
            iyy,
            iyz,
            izz,
        })
    }

    /// Same moment about every axis, no products of inertia.
    pub fn isotropic(moment: T) -> Result<Self, MassPropertiesErrors> {
        Self::new(
            moment.clone(),
            moment.clone(),
            moment,
            T::zero(),
            T::zero(),
            T::zero(),
        )
    }

    pub fn matrix(&self) -> Matrix3<T> {
        Matrix3::new(
            self.ixx.clone(),
            self.ixy.clone(),
            self.ixz.clone(),
            self.ixy.clone(),
            self.iyy.clone(),
            self.iyz.clone(),
            self.ixz.clone(),
            self.iyz.clone(),
            self.izz.clone(),
        )
    }
}

/// Represents the mass properties of an object
/// Mass, Center of Mass, Inertia
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassProperties<T: SimValue> {
    pub center_of_mass: CenterOfMass<T>,
    pub mass: T,
    pub inertia: Inertia<T>,
}

impl<T: SimValue> MassProperties<T> {
    pub fn new(
        mass: T,
        center_of_mass: CenterOfMass<T>,
        inertia: Inertia<T>,
    ) -> Result<Self, MassPropertiesErrors> {
        check_positive(&mass, MassPropertiesErrors::MassLessThanOrEqualToZero)?;
        Ok(MassProperties {
            mass,
            center_of_mass,
            inertia,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_inertia_rejects_nonpositive_diagonal() {
        assert_eq!(
            Inertia::new(0.0, 1.0, 1.0, 0.0, 0.0, 0.0),
            Err(MassPropertiesErrors::IxxLessThanOrEqualToZero)
        );
        assert_eq!(
            Inertia::new(1.0, -1.0, 1.0, 0.0, 0.0, 0.0),
            Err(MassPropertiesErrors::IyyLessThanOrEqualToZero)
        );
        assert_eq!(
            Inertia::new(1.0, 1.0, 0.0, 0.0, 0.0, 0.0),
            Err(MassPropertiesErrors::IzzLessThanOrEqualToZero)
        );
    }

    #[test]
    fn test_mass_rejects_zero() {
        let inertia = Inertia::isotropic(1.0).unwrap();
        let result = MassProperties::new(0.0, CenterOfMass::default(), inertia);
        assert_eq!(result, Err(MassPropertiesErrors::MassLessThanOrEqualToZero));
    }

    #[test]
    fn test_inertia_matrix_is_symmetric() {
        let inertia = Inertia::new(2.0, 3.0, 4.0, 0.1, 0.2, 0.3).unwrap();
        let m = inertia.matrix();
        assert_abs_diff_eq!(m, m.transpose(), epsilon = 1e-15);
        assert_abs_diff_eq!(m[(2, 1)], 0.3, epsilon = 1e-15);
    }
}

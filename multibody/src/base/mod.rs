use crate::{joint::JointBuilder, body::BodyConnectionBuilder, system::Id};
use nalgebra::Vector3;
use sim_value::SimValue;
use thiserror::Error;
use transforms::Transform;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BaseErrors {
    #[error("name cannot be empty for base")]
    EmptyName,
    #[error("joint '{0}' already connected to {1} as an outer joint")]
    OuterJointExists(String, String),
    #[error("joint '{0}' already has an inner body")]
    InnerBodyExists(String),
}

/// The fixed root of the tree. Gravity is a constant acceleration expressed
/// in base coordinates.
#[derive(Clone, Debug)]
pub struct BaseBuilder<T: SimValue> {
    pub id: Id,
    pub name: String,
    pub outer_joints: Vec<Id>,
    pub gravity: Vector3<T>,
}

impl<T: SimValue> BaseBuilder<T> {
    pub fn new(id: Id, name: &str) -> Result<Self, BaseErrors> {
        if name.is_empty() {
            return Err(BaseErrors::EmptyName);
        }
        Ok(Self {
            id,
            name: name.to_string(),
            outer_joints: Vec::new(),
            gravity: Vector3::zeros(),
        })
    }

    /// Attaches `outer_joint` to the base. `transform` is the joint inner
    /// frame from the base frame.
    pub fn connect_outer_joint(
        &mut self,
        outer_joint: &mut JointBuilder<T>,
        transform: Transform<T>,
    ) -> Result<(), BaseErrors> {
        if self.outer_joints.contains(&outer_joint.id) {
            return Err(BaseErrors::OuterJointExists(
                outer_joint.name.clone(),
                self.name.clone(),
            ));
        }
        if outer_joint.connections.inner_body.is_some() {
            return Err(BaseErrors::InnerBodyExists(outer_joint.name.clone()));
        }
        self.outer_joints.push(outer_joint.id);
        outer_joint.connections.inner_body = Some(BodyConnectionBuilder::new(self.id, transform));
        Ok(())
    }

    pub fn set_gravity_constant(&mut self, gx: T, gy: T, gz: T) {
        self.gravity = Vector3::new(gx, gy, gz);
    }
}

#[derive(Clone, Debug)]
pub struct Base<T: SimValue> {
    pub name: String,
    pub gravity: Vector3<T>,
}

impl<T: SimValue> From<&BaseBuilder<T>> for Base<T> {
    fn from(builder: &BaseBuilder<T>) -> Self {
        Self {
            name: builder.name.clone(),
            gravity: builder.gravity.clone(),
        }
    }
}

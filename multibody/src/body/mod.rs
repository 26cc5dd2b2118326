use crate::{
    joint::{JointBuilder, JointErrors},
    system::Id,
};
use mass_properties::{MassProperties, MassPropertiesErrors};
use sim_value::SimValue;
use spatial_algebra::SpatialInertia;
use thiserror::Error;
use transforms::Transform;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BodyErrors {
    #[error("name cannot be empty for body")]
    EmptyName,
    #[error("attempted to connect inner joint to body '{0}', but it already has an inner joint")]
    InnerJointExists(String),
    #[error("{0}")]
    Joint(#[from] JointErrors),
    #[error("no mass properties found for body '{0}'")]
    NoMassProperties(String),
    #[error("joint '{0}' already connected to {1} as an outer joint")]
    OuterJointExists(String, String),
    #[error("{0}")]
    MassPropertiesError(#[from] MassPropertiesErrors),
}

/// One side of a joint: the body it attaches to and the joint frame from
/// that body's frame.
#[derive(Debug, Clone)]
pub struct BodyConnectionBuilder<T: SimValue> {
    pub body_id: Id,
    pub transform: Transform<T>,
}

impl<T: SimValue> BodyConnectionBuilder<T> {
    pub fn new(body_id: Id, transform: Transform<T>) -> Self {
        Self { body_id, transform }
    }
}

#[derive(Debug, Clone)]
pub struct BodyBuilder<T: SimValue> {
    pub id: Id,
    pub inner_joint: Option<Id>,
    pub mass_properties: Option<MassProperties<T>>,
    pub name: String,
    pub outer_joints: Vec<Id>, // id of joint in system.joints, joint contains the transform information
}

impl<T: SimValue> BodyBuilder<T> {
    pub fn new(name: &str, id: Id) -> Result<Self, BodyErrors> {
        if name.is_empty() {
            return Err(BodyErrors::EmptyName);
        }
        Ok(Self {
            id,
            inner_joint: None,
            mass_properties: None,
            name: name.to_string(),
            outer_joints: Vec::new(),
        })
    }

    pub fn with_mass_properties(mut self, mass_properties: MassProperties<T>) -> Self {
        self.mass_properties = Some(mass_properties);
        self
    }

    pub fn set_mass_properties(&mut self, mass_properties: MassProperties<T>) {
        self.mass_properties = Some(mass_properties);
    }

    /// `transform` is the joint outer frame from this body's frame.
    pub fn connect_inner_joint(
        &mut self,
        inner_joint: &mut JointBuilder<T>,
        transform: Transform<T>,
    ) -> Result<(), BodyErrors> {
        if self.inner_joint.is_some() {
            return Err(BodyErrors::InnerJointExists(self.name.clone()));
        }
        if inner_joint.connections.outer_body.is_some() {
            return Err(JointErrors::OuterBodyExists(inner_joint.name.clone()).into());
        }
        self.inner_joint = Some(inner_joint.id);
        inner_joint.connections.outer_body = Some(BodyConnectionBuilder::new(self.id, transform));
        Ok(())
    }

    /// `transform` is the joint inner frame from this body's frame.
    pub fn connect_outer_joint(
        &mut self,
        outer_joint: &mut JointBuilder<T>,
        transform: Transform<T>,
    ) -> Result<(), BodyErrors> {
        if self.outer_joints.contains(&outer_joint.id) {
            return Err(BodyErrors::OuterJointExists(
                outer_joint.name.clone(),
                self.name.clone(),
            ));
        }
        if outer_joint.connections.inner_body.is_some() {
            return Err(JointErrors::InnerBodyExists(outer_joint.name.clone()).into());
        }
        self.outer_joints.push(outer_joint.id);
        outer_joint.connections.inner_body = Some(BodyConnectionBuilder::new(self.id, transform));
        Ok(())
    }

    pub fn build(&self, inner_joint: usize) -> Result<Body<T>, BodyErrors> {
        let mass_properties = match &self.mass_properties {
            Some(mp) => mp.clone(),
            None => return Err(BodyErrors::NoMassProperties(self.name.clone())),
        };
        let spatial_inertia = SpatialInertia::from(&mass_properties);
        Ok(Body {
            name: self.name.clone(),
            inner_joint,
            mass_properties,
            spatial_inertia,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Body<T: SimValue> {
    pub name: String,
    /// Index of the inner joint in `MultibodySystem::joints`.
    pub inner_joint: usize,
    pub mass_properties: MassProperties<T>,
    /// Spatial inertia about the body frame origin.
    pub spatial_inertia: SpatialInertia<T>,
}

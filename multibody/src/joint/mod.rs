pub mod joint_transforms;
pub mod revolute;

use crate::body::BodyConnectionBuilder;
use crate::system::Id;
use joint_transforms::JointTransforms;
use revolute::{Revolute, RevoluteErrors};
use sim_value::SimValue;
use spatial_algebra::{MotionVector, SpatialTransform};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum JointErrors {
    #[error("name cannot be empty for joint")]
    EmptyName,
    #[error("inner body already exists for joint '{0}'")]
    InnerBodyExists(String),
    #[error("outer body already exists for joint '{0}'")]
    OuterBodyExists(String),
    #[error("{0}")]
    RevoluteError(#[from] RevoluteErrors),
}

/// Joint models with one degree of freedom each.
#[derive(Debug, Clone, PartialEq)]
pub enum JointModels {
    Revolute(Revolute),
}

impl From<Revolute> for JointModels {
    fn from(value: Revolute) -> Self {
        JointModels::Revolute(value)
    }
}

impl JointModels {
    /// Joint outer frame from joint inner frame at position `q`.
    pub fn jof_from_jif<T: SimValue>(&self, q: &T) -> SpatialTransform<T> {
        match self {
            JointModels::Revolute(revolute) => revolute.jof_from_jif(q),
        }
    }

    /// Motion of the outer frame per unit joint velocity, in joint outer
    /// frame coordinates.
    pub fn motion_subspace<T: SimValue>(&self) -> MotionVector<T> {
        match self {
            JointModels::Revolute(revolute) => revolute.motion_subspace(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JointConnectionBuilder<T: SimValue> {
    pub inner_body: Option<BodyConnectionBuilder<T>>,
    pub outer_body: Option<BodyConnectionBuilder<T>>,
}

impl<T: SimValue> Default for JointConnectionBuilder<T> {
    fn default() -> Self {
        Self {
            inner_body: None,
            outer_body: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JointBuilder<T: SimValue> {
    pub id: Id,
    pub name: String,
    pub model: JointModels,
    pub connections: JointConnectionBuilder<T>,
}

impl<T: SimValue> JointBuilder<T> {
    pub fn new(id: Id, name: &str, model: JointModels) -> Result<Self, JointErrors> {
        if name.is_empty() {
            return Err(JointErrors::EmptyName);
        }
        Ok(Self {
            id,
            name: name.to_string(),
            model,
            connections: JointConnectionBuilder::default(),
        })
    }

    /// Builds the joint once its place in the tree is known. The caller has
    /// already checked both connections through validation.
    pub(crate) fn build(
        &self,
        jif_from_ib: &BodyConnectionBuilder<T>,
        jof_from_ob: &BodyConnectionBuilder<T>,
        parent: Option<usize>,
        state_index: usize,
    ) -> Joint<T> {
        Joint {
            name: self.name.clone(),
            model: self.model.clone(),
            transforms: JointTransforms::new(&jif_from_ib.transform, &jof_from_ob.transform),
            parent,
            state_index,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Joint<T: SimValue> {
    pub name: String,
    pub model: JointModels,
    pub transforms: JointTransforms<T>,
    /// Index of the inner body in `MultibodySystem::bodies`, `None` for the base.
    pub parent: Option<usize>,
    /// Offset of this joint's coordinate in the state vectors.
    pub state_index: usize,
}

impl<T: SimValue> Joint<T> {
    /// Outer body frame from inner body frame at joint position `q`.
    pub fn ob_from_ib(&self, q: &T) -> SpatialTransform<T> {
        self.transforms.ob_from_ib(&self.model.jof_from_jif(q))
    }

    /// Motion subspace expressed in the outer body frame.
    pub fn motion_subspace(&self) -> MotionVector<T> {
        &self.transforms.ob_from_jof * &self.model.motion_subspace()
    }
}

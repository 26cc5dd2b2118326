pub mod algorithms;
pub mod base;
pub mod body;
pub mod joint;
pub mod state;
pub mod system;

use base::BaseErrors;
use body::BodyErrors;
use joint::JointErrors;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MultibodyErrors {
    #[error("expected {nv} joint accelerations, got {len}")]
    AccelerationLengthMismatch { len: usize, nv: usize },
    #[error("{0}")]
    BaseErrors(#[from] BaseErrors),
    #[error("base does not have any outer joints")]
    BaseMissingOuterJoint,
    #[error("could not find body '{0}' in the system")]
    BodyNotFound(String),
    #[error("{0}")]
    Body(#[from] BodyErrors),
    #[error("body '{0}' does not have an inner joint")]
    BodyMissingInnerJoint(String),
    #[error("body '{0}' is not reachable from the base")]
    BodyNotReachable(String),
    #[error("invalid connection between joint '{0}' and body '{1}'")]
    InvalidConnection(String, String),
    #[error("{0}")]
    JointErrors(#[from] JointErrors),
    #[error("joint '{0}' must have an inner body")]
    JointMissingInnerBody(String),
    #[error("joint '{0}' must have an outer body")]
    JointMissingOuterBody(String),
    #[error("could not find joint '{0}' in system")]
    JointNotFound(String),
    #[error("the name '{0}' is already taken")]
    NameTaken(String),
    #[error("state index {index} out of range for {len} entries")]
    StateIndexOutOfRange { index: usize, len: usize },
    #[error("state has {q} positions and {v} velocities, system expects {nq} and {nv}")]
    StateLengthMismatch {
        q: usize,
        v: usize,
        nq: usize,
        nv: usize,
    },
}

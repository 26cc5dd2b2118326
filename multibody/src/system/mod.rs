use crate::{
    MultibodyErrors,
    base::{Base, BaseBuilder},
    body::{Body, BodyBuilder},
    joint::{Joint, JointBuilder, JointModels},
    state::MultibodyState,
};
use sim_value::SimValue;
use std::{
    collections::{HashMap, HashSet},
    fmt::{self, Display, Formatter},
};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct MultibodySystemBuilder<T: SimValue> {
    pub base: BaseBuilder<T>,
    pub bodies: HashMap<Id, BodyBuilder<T>>,
    pub identifier: Identifier,
    pub joints: HashMap<Id, JointBuilder<T>>,
}

impl<T: SimValue> MultibodySystemBuilder<T> {
    pub fn new(base_name: &str) -> Result<Self, MultibodyErrors> {
        let mut id = Identifier::new();
        Ok(Self {
            base: BaseBuilder::new(id.next(), base_name)?,
            bodies: HashMap::new(),
            identifier: id,
            joints: HashMap::new(),
        })
    }

    pub fn add_body(&mut self, body: BodyBuilder<T>) {
        self.bodies.insert(body.id, body);
    }

    pub fn add_joint(&mut self, joint: JointBuilder<T>) {
        self.joints.insert(joint.id, joint);
    }

    pub fn new_body(&mut self, name: &str) -> Result<BodyBuilder<T>, MultibodyErrors> {
        let id = self.identifier.next();
        Ok(BodyBuilder::new(name, id)?)
    }

    pub fn new_joint(
        &mut self,
        name: &str,
        model: JointModels,
    ) -> Result<JointBuilder<T>, MultibodyErrors> {
        let id = self.identifier.next();
        Ok(JointBuilder::new(id, name, model)?)
    }

    pub fn set_gravity_constant(&mut self, gx: T, gy: T, gz: T) {
        self.base.set_gravity_constant(gx, gy, gz);
    }

    pub fn validate(&self) -> Result<(), MultibodyErrors> {
        // names are unique across base, bodies and joints
        let mut names = HashSet::new();
        names.insert(self.base.name.as_str());
        for name in self
            .bodies
            .values()
            .map(|b| b.name.as_str())
            .chain(self.joints.values().map(|j| j.name.as_str()))
        {
            if !names.insert(name) {
                return Err(MultibodyErrors::NameTaken(name.to_string()));
            }
        }

        // check that the base has an outer joint
        let base_outer_joints = &self.base.outer_joints;
        if base_outer_joints.is_empty() {
            return Err(MultibodyErrors::BaseMissingOuterJoint);
        }

        // check that all outer joints exist in the hashmap
        for outer_joint_id in base_outer_joints {
            let Some(joint) = self.joints.get(outer_joint_id) else {
                return Err(MultibodyErrors::JointNotFound(outer_joint_id.to_string()));
            };
            self.check_inner_connection(joint, self.base.id, &self.base.name)?;
        }

        // check that every body has an inner joint
        for body in self.bodies.values() {
            if let Some(inner_joint_id) = &body.inner_joint {
                if !self.joints.contains_key(inner_joint_id) {
                    return Err(MultibodyErrors::JointNotFound(inner_joint_id.to_string()));
                }
            } else {
                return Err(MultibodyErrors::BodyMissingInnerJoint(body.name.clone()));
            }

            for outer_joint_id in &body.outer_joints {
                let Some(joint) = self.joints.get(outer_joint_id) else {
                    return Err(MultibodyErrors::JointNotFound(outer_joint_id.to_string()));
                };
                self.check_inner_connection(joint, body.id, &body.name)?;
            }
        }

        // check that every joint has an inner and outer body connection
        for joint in self.joints.values() {
            if let Some(inner_body_connection) = &joint.connections.inner_body {
                if !self.bodies.contains_key(&inner_body_connection.body_id)
                    && inner_body_connection.body_id != self.base.id
                {
                    return Err(MultibodyErrors::BodyNotFound(
                        inner_body_connection.body_id.to_string(),
                    ));
                }
            } else {
                return Err(MultibodyErrors::JointMissingInnerBody(joint.name.clone()));
            };
            if let Some(outer_body_connection) = &joint.connections.outer_body {
                let Some(outer_body) = self.bodies.get(&outer_body_connection.body_id) else {
                    return Err(MultibodyErrors::BodyNotFound(
                        outer_body_connection.body_id.to_string(),
                    ));
                };
                // a body has exactly one inner joint, so it must be this one
                if outer_body.inner_joint != Some(joint.id) {
                    return Err(MultibodyErrors::InvalidConnection(
                        joint.name.clone(),
                        outer_body.name.clone(),
                    ));
                }
            } else {
                return Err(MultibodyErrors::JointMissingOuterBody(joint.name.clone()));
            }
        }

        // every body hangs off the base, which also rules out loops
        let mut reached = HashSet::new();
        let mut stack: Vec<Id> = base_outer_joints.clone();
        while let Some(joint_id) = stack.pop() {
            let Some(body_id) = self
                .joints
                .get(&joint_id)
                .and_then(|j| j.connections.outer_body.as_ref())
                .map(|c| c.body_id)
            else {
                continue;
            };
            if !reached.insert(body_id) {
                continue;
            }
            if let Some(body) = self.bodies.get(&body_id) {
                stack.extend(body.outer_joints.iter().copied());
            }
        }
        let mut unreached: Vec<&BodyBuilder<T>> = self
            .bodies
            .values()
            .filter(|b| !reached.contains(&b.id))
            .collect();
        unreached.sort_by_key(|b| b.id);
        if let Some(body) = unreached.first() {
            return Err(MultibodyErrors::BodyNotReachable(body.name.clone()));
        }
        Ok(())
    }

    /// An outer joint listed on a body (or the base) must point back at it.
    fn check_inner_connection(
        &self,
        joint: &JointBuilder<T>,
        body_id: Id,
        body_name: &str,
    ) -> Result<(), MultibodyErrors> {
        match &joint.connections.inner_body {
            Some(connection) if connection.body_id == body_id => Ok(()),
            Some(_) => Err(MultibodyErrors::InvalidConnection(
                joint.name.clone(),
                body_name.to_string(),
            )),
            None => Err(MultibodyErrors::JointMissingInnerBody(joint.name.clone())),
        }
    }

    /// Validates the builder and lays the tree out depth first from the
    /// base, so every body comes after its parent.
    pub fn build(&self) -> Result<MultibodySystem<T>, MultibodyErrors> {
        self.validate()?;

        // order matters for bodies and joints
        let mut bodies = Vec::new();
        let mut joints = Vec::new();

        for outer_joint_id in &self.base.outer_joints {
            traverse_joint(self, *outer_joint_id, None, &mut joints, &mut bodies)?;
        }

        debug!(
            base = self.base.name.as_str(),
            bodies = bodies.len(),
            joints = joints.len(),
            "built multibody system"
        );

        Ok(MultibodySystem {
            base: Base::from(&self.base),
            bodies,
            joints,
        })
    }
}

/// Builds `joint_id` and its outer body, then recurses into the body's
/// outer joints.
fn traverse_joint<T: SimValue>(
    builder: &MultibodySystemBuilder<T>,
    joint_id: Id,
    parent: Option<usize>,
    joints: &mut Vec<Joint<T>>,
    bodies: &mut Vec<Body<T>>,
) -> Result<(), MultibodyErrors> {
    let joint_builder = builder
        .joints
        .get(&joint_id)
        .ok_or_else(|| MultibodyErrors::JointNotFound(joint_id.to_string()))?;
    let inner = joint_builder
        .connections
        .inner_body
        .as_ref()
        .ok_or_else(|| MultibodyErrors::JointMissingInnerBody(joint_builder.name.clone()))?;
    let outer = joint_builder
        .connections
        .outer_body
        .as_ref()
        .ok_or_else(|| MultibodyErrors::JointMissingOuterBody(joint_builder.name.clone()))?;
    let body_builder = builder
        .bodies
        .get(&outer.body_id)
        .ok_or_else(|| MultibodyErrors::BodyNotFound(outer.body_id.to_string()))?;

    // single degree of freedom joints, so the state index is the joint index
    let index = joints.len();
    joints.push(joint_builder.build(inner, outer, parent, index));
    bodies.push(body_builder.build(index)?);

    for outer_joint_id in &body_builder.outer_joints {
        traverse_joint(builder, *outer_joint_id, Some(index), joints, bodies)?;
    }
    Ok(())
}

/// A validated kinematic tree. `bodies[i]` is the outer body of `joints[i]`
/// and parents always precede their children.
#[derive(Debug, Clone)]
pub struct MultibodySystem<T: SimValue> {
    pub base: Base<T>,
    pub bodies: Vec<Body<T>>,
    pub joints: Vec<Joint<T>>,
}

impl<T: SimValue> MultibodySystem<T> {
    /// Number of generalized positions.
    pub fn nq(&self) -> usize {
        self.joints.len()
    }

    /// Number of generalized velocities.
    pub fn nv(&self) -> usize {
        self.joints.len()
    }

    pub fn create_state(&self) -> MultibodyState<T> {
        MultibodyState::zeros(self.nq(), self.nv())
    }

    pub fn body_index(&self, name: &str) -> Result<usize, MultibodyErrors> {
        self.bodies
            .iter()
            .position(|b| b.name == name)
            .ok_or_else(|| MultibodyErrors::BodyNotFound(name.to_string()))
    }

    pub fn joint_index(&self, name: &str) -> Result<usize, MultibodyErrors> {
        self.joints
            .iter()
            .position(|j| j.name == name)
            .ok_or_else(|| MultibodyErrors::JointNotFound(name.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct Identifier {
    current_id: usize,
}

impl Identifier {
    fn new() -> Self {
        Self { current_id: 0 }
    }

    fn next(&mut self) -> Id {
        let id = Id(self.current_id);
        self.current_id += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(usize);

impl Display for Id {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::revolute::Revolute;
    use mass_properties::{CenterOfMass, Inertia, MassProperties};
    use nalgebra::Vector3;
    use transforms::Transform;

    fn mass_properties() -> MassProperties<f64> {
        MassProperties::new(
            1.0,
            CenterOfMass::new(0.0, 0.0, -0.5),
            Inertia::isotropic(0.1).unwrap(),
        )
        .unwrap()
    }

    fn revolute() -> JointModels {
        Revolute::new(Vector3::y()).unwrap().into()
    }

    /// base -> j1 -> b1 -> j2 -> b2
    fn chain() -> MultibodySystemBuilder<f64> {
        let mut sys = MultibodySystemBuilder::new("world").unwrap();
        let mut j1 = sys.new_joint("j1", revolute()).unwrap();
        let mut b1 = sys.new_body("b1").unwrap().with_mass_properties(mass_properties());
        let mut j2 = sys.new_joint("j2", revolute()).unwrap();
        let mut b2 = sys.new_body("b2").unwrap().with_mass_properties(mass_properties());
        sys.base
            .connect_outer_joint(&mut j1, Transform::identity())
            .unwrap();
        b1.connect_inner_joint(&mut j1, Transform::identity()).unwrap();
        b1.connect_outer_joint(&mut j2, Transform::from_translation(Vector3::new(0.0, 0.0, -1.0)))
            .unwrap();
        b2.connect_inner_joint(&mut j2, Transform::identity()).unwrap();
        sys.add_joint(j1);
        sys.add_joint(j2);
        sys.add_body(b1);
        sys.add_body(b2);
        sys
    }

    #[test]
    fn test_build_orders_parents_first() {
        let sys = chain().build().unwrap();
        assert_eq!(sys.nq(), 2);
        assert_eq!(sys.bodies[0].name, "b1");
        assert_eq!(sys.bodies[1].name, "b2");
        assert_eq!(sys.joints[0].parent, None);
        assert_eq!(sys.joints[1].parent, Some(0));
        assert_eq!(sys.body_index("b2").unwrap(), 1);
        assert_eq!(sys.joint_index("j2").unwrap(), 1);
        assert!(sys.body_index("nope").is_err());
    }

    #[test]
    fn test_missing_base_joint() {
        let sys = MultibodySystemBuilder::<f64>::new("world").unwrap();
        assert_eq!(sys.validate(), Err(MultibodyErrors::BaseMissingOuterJoint));
    }

    #[test]
    fn test_name_taken() {
        let mut sys = chain();
        let b3 = sys.new_body("b1").unwrap();
        sys.add_body(b3);
        assert_eq!(sys.validate(), Err(MultibodyErrors::NameTaken("b1".to_string())));
    }

    #[test]
    fn test_body_without_inner_joint() {
        let mut sys = chain();
        let b3 = sys.new_body("b3").unwrap();
        sys.add_body(b3);
        assert_eq!(
            sys.validate(),
            Err(MultibodyErrors::BodyMissingInnerJoint("b3".to_string()))
        );
    }

    #[test]
    fn test_double_attach() {
        let mut sys = MultibodySystemBuilder::<f64>::new("world").unwrap();
        let mut j1 = sys.new_joint("j1", revolute()).unwrap();
        let mut b1 = sys.new_body("b1").unwrap();
        let mut b2 = sys.new_body("b2").unwrap();
        b1.connect_inner_joint(&mut j1, Transform::identity()).unwrap();
        assert!(b2.connect_inner_joint(&mut j1, Transform::identity()).is_err());
        let mut j2 = sys.new_joint("j2", revolute()).unwrap();
        assert!(b1.connect_inner_joint(&mut j2, Transform::identity()).is_err());
    }

    #[test]
    fn test_missing_mass_properties() {
        let mut sys = chain();
        if let Some(body) = sys.bodies.values_mut().find(|b| b.name == "b2") {
            body.mass_properties = None;
        }
        assert!(matches!(sys.build(), Err(MultibodyErrors::Body(_))));
    }
}

use sim_value::SimValue;
use spatial_algebra::SpatialTransform;
use transforms::Transform;

/// We use the terminology B_from_A rather than A_to_B so that notation matches matrix multiplication
/// i.e. v_C = C_from_B * B_from_A * v_A
/// inner_body: the "body frame" of the body on the base side of the joint
/// outer_body: the "body frame" of the body on the tip side of the joint
/// jif: the "joint inner frame"
/// jof: the "joint outer frame"
#[derive(Clone, Debug)]
pub struct JointTransforms<T: SimValue> {
    pub jif_from_ib: SpatialTransform<T>, // my-joint-inner-frame from my-inner-body-frame
    pub ob_from_jof: SpatialTransform<T>, // my-outer-body-frame from my-joint-outer-frame
}

impl<T: SimValue> JointTransforms<T> {
    pub fn new(jif_from_ib: &Transform<T>, jof_from_ob: &Transform<T>) -> Self {
        Self {
            jif_from_ib: SpatialTransform::from(jif_from_ib.clone()),
            ob_from_jof: SpatialTransform::from(jof_from_ob.inv()),
        }
    }

    /// ob_from_ib = ob_from_jof * jof_from_jif * jif_from_ib
    pub fn ob_from_ib(&self, jof_from_jif: &SpatialTransform<T>) -> SpatialTransform<T> {
        let jof_from_ib = jof_from_jif * &self.jif_from_ib;
        &self.ob_from_jof * &jof_from_ib
    }
}

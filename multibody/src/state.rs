use crate::MultibodyErrors;
use nalgebra::DVector;
use sim_value::SimValue;

/// Generalized positions `q` and velocities `v` of a system, one entry per
/// joint degree of freedom.
#[derive(Debug, Clone, PartialEq)]
pub struct MultibodyState<T: SimValue> {
    pub q: DVector<T>,
    pub v: DVector<T>,
}

impl<T: SimValue> MultibodyState<T> {
    pub fn zeros(nq: usize, nv: usize) -> Self {
        Self {
            q: DVector::zeros(nq),
            v: DVector::zeros(nv),
        }
    }

    pub fn set_q(&mut self, index: usize, value: T) -> Result<(), MultibodyErrors> {
        let len = self.q.len();
        let slot = self
            .q
            .get_mut(index)
            .ok_or(MultibodyErrors::StateIndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    pub fn set_v(&mut self, index: usize, value: T) -> Result<(), MultibodyErrors> {
        let len = self.v.len();
        let slot = self
            .v
            .get_mut(index)
            .ok_or(MultibodyErrors::StateIndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Errors unless the state has exactly `nq` positions and `nv` velocities.
    pub fn check_len(&self, nq: usize, nv: usize) -> Result<(), MultibodyErrors> {
        if self.q.len() != nq || self.v.len() != nv {
            return Err(MultibodyErrors::StateLengthMismatch {
                q: self.q.len(),
                v: self.v.len(),
                nq,
                nv,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_out_of_range() {
        let mut state = MultibodyState::<f64>::zeros(2, 2);
        state.set_q(1, 0.5).unwrap();
        assert_eq!(state.q[1], 0.5);
        assert_eq!(
            state.set_v(2, 1.0),
            Err(MultibodyErrors::StateIndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_check_len() {
        let state = MultibodyState::<f64>::zeros(2, 1);
        assert!(state.check_len(2, 1).is_ok());
        assert!(state.check_len(2, 2).is_err());
    }
}

use num_traits::{One, Zero};
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Scalar type that the dynamics crates are generic over.
///
/// Implemented by `f64` for numeric evaluation and by `symbolic::Expr` for
/// closed-form derivation, so the same multibody model can be run either way.
/// The arithmetic bounds are the ones nalgebra needs to multiply matrices of
/// the scalar, so `Matrix3<T>`, `Matrix6<T>` and `DMatrix<T>` all work.
pub trait SimValue:
    Add<Output = Self>
    + AddAssign
    + Clone
    + Debug
    + Mul<Output = Self>
    + MulAssign
    + Neg<Output = Self>
    + One
    + PartialEq
    + Sub<Output = Self>
    + SubAssign
    + Zero
    + 'static
{
    /// Converts a numeric constant into the scalar type.
    fn from_f64(value: f64) -> Self;
    fn sin(&self) -> Self;
    fn cos(&self) -> Self;
    /// `Some(true)` if the value is provably positive, `Some(false)` if it is
    /// provably zero or negative, `None` if it cannot be decided.
    fn is_positive(&self) -> Option<bool>;
}

impl SimValue for f64 {
    fn from_f64(value: f64) -> Self {
        value
    }

    fn sin(&self) -> Self {
        f64::sin(*self)
    }

    fn cos(&self) -> Self {
        f64::cos(*self)
    }

    fn is_positive(&self) -> Option<bool> {
        if self.is_nan() {
            return None;
        }
        Some(*self > f64::EPSILON)
    }
}

/// One half, built without division so symbolic scalars stay exact.
pub fn half<T: SimValue>() -> T {
    T::from_f64(0.5)
}

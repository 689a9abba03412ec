#![allow(non_snake_case)]
use num_traits::{Float, FromPrimitive, NumAssign};
use std::fmt::{Debug, Display, LowerExp};

/// Floating point type the solver and its linear algebra are generic
/// over.  The bridge only ever instantiates `f64`.
pub trait FloatT:
    'static + Send + Float + NumAssign + Default + FromPrimitive + Display + LowerExp + Debug
{
}

impl<T> FloatT for T where
    T: 'static + Send + Float + NumAssign + Default + FromPrimitive + Display + LowerExp + Debug
{
}

/// Converts `f64` constants into a [`FloatT`], as in `(0.5).as_T()`.
///
/// Also used by the [solver settings](crate::solver::AdmmSettings)
/// builder defaults.  A value the target type cannot represent becomes NaN.
pub trait AsFloatT<T> {
    fn as_T(&self) -> T;
}

impl<T: FloatT> AsFloatT<T> for f64 {
    #[inline]
    fn as_T(&self) -> T {
        T::from_f64(*self).unwrap_or_else(T::nan)
    }
}

#[test]
fn test_as_T() {
    let half: f64 = (0.5).as_T();
    assert_eq!(half, 0.5);

    let single: f32 = (0.1).as_T();
    assert_eq!(single, 0.1f32);
}

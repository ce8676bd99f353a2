//! Bound-target shapes.
//!
//! A [`Target`] is the caller-owned storage an option ultimately writes into.
//! The shape (scalar, sequence, optional) is fixed by the type, so the
//! assignment strategy is chosen at compile time:
//!
//! - scalar `T`: the converted token replaces the current value
//! - `Vec<T>`: the token is converted to `T` and appended
//! - `Option<T>`: the token is converted to `T` and installed as `Some`
//!
//! Element conversion always goes through [`convert_scalar`], so container
//! shapes never duplicate conversion logic.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::convert::{convert_scalar, Converted, FromArgument};

/// Static shape of a bound target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Sequence,
    Optional,
}

/// Storage that options and positional arguments can be bound to.
pub trait Target: Default + 'static {
    /// Shape used to pick the assignment strategy and default arity.
    const SHAPE: Shape;

    /// Token assigned when an option bound to this target is given without
    /// an argument. Types with a flag value default to taking no arguments.
    const FLAG_VALUE: Option<&'static str> = None;

    /// Convert `arg` and store it according to the target's shape.
    fn assign(&mut self, arg: &str) -> Converted<()>;
}

/// Implement the scalar [`Target`] shape for types that already implement
/// [`FromArgument`](crate::FromArgument) and `Default`.
#[macro_export]
macro_rules! scalar_target {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Target for $ty {
            const SHAPE: $crate::Shape = $crate::Shape::Scalar;

            fn assign(&mut self, arg: &str) -> $crate::Converted<()> {
                $crate::convert_scalar::<$ty>(arg).map(|value| *self = value)
            }
        }
    )+};
}

scalar_target!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char, String,
    PathBuf, OsString
);

impl Target for bool {
    const SHAPE: Shape = Shape::Scalar;
    const FLAG_VALUE: Option<&'static str> = Some("true");

    fn assign(&mut self, arg: &str) -> Converted<()> {
        convert_scalar::<bool>(arg).map(|value| *self = value)
    }
}

impl<T: FromArgument + 'static> Target for Vec<T> {
    const SHAPE: Shape = Shape::Sequence;

    fn assign(&mut self, arg: &str) -> Converted<()> {
        convert_scalar::<T>(arg).map(|value| self.push(value))
    }
}

impl<T: FromArgument + 'static> Target for Option<T> {
    const SHAPE: Shape = Shape::Optional;

    fn assign(&mut self, arg: &str) -> Converted<()> {
        convert_scalar::<T>(arg).map(|value| *self = Some(value))
    }
}

//! Conversion layer: text token → typed scalar.
//!
//! A scalar type advertises how it can be built from a token through
//! [`FromArgument`]. Two capabilities are tried in a fixed order:
//!
//! ```text
//! dedicated converter (convert) → construct from text (construct) → unsupported
//! ```
//!
//! The first capability that answers wins. A type that answers neither is not
//! an error at this level: [`convert_scalar`] reports [`Converted::Unsupported`]
//! and the caller decides what to do with it.

use std::ffi::OsString;
use std::fmt::Display;
use std::num::{IntErrorKind, ParseIntError};
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced when a token cannot be turned into the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The token is not a valid spelling of the type.
    #[error("'{input}' is not a valid {type_name}: {reason}")]
    Invalid {
        input: String,
        type_name: &'static str,
        reason: String,
    },

    /// The token is well formed but does not fit the type.
    #[error("'{input}' is out of range for {type_name}")]
    OutOfRange {
        input: String,
        type_name: &'static str,
    },
}

impl ConversionError {
    /// Build an [`ConversionError::Invalid`] from any displayable reason.
    pub fn invalid(input: &str, type_name: &'static str, reason: impl Display) -> Self {
        Self::Invalid {
            input: input.to_string(),
            type_name,
            reason: reason.to_string(),
        }
    }

    /// Build an [`ConversionError::OutOfRange`].
    pub fn out_of_range(input: &str, type_name: &'static str) -> Self {
        Self::OutOfRange {
            input: input.to_string(),
            type_name,
        }
    }
}

/// Outcome of converting one token.
#[derive(Debug, Clone, PartialEq)]
pub enum Converted<T> {
    /// Conversion succeeded.
    Value(T),
    /// The type supports conversion but this token was rejected.
    Invalid(ConversionError),
    /// The type exposes no way to be built from text.
    Unsupported,
}

impl<T> Converted<T> {
    /// Transform the successful value, keeping failures as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Converted<U> {
        match self {
            Converted::Value(value) => Converted::Value(f(value)),
            Converted::Invalid(err) => Converted::Invalid(err),
            Converted::Unsupported => Converted::Unsupported,
        }
    }

    /// Returns the converted value, if any.
    pub fn value(self) -> Option<T> {
        match self {
            Converted::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// Capability query for scalar element types.
///
/// Both methods default to `None` ("not available"). Implementors override
/// whichever pathway fits the type; when both are provided, `convert` takes
/// priority and `construct` is never consulted.
pub trait FromArgument: Sized {
    /// Dedicated string-to-`Self` converter.
    fn convert(_arg: &str) -> Option<Result<Self, ConversionError>> {
        None
    }

    /// Build `Self` directly from the text of the token.
    fn construct(_arg: &str) -> Option<Result<Self, ConversionError>> {
        None
    }
}

/// Convert a single token into `T` using the fixed capability priority.
pub fn convert_scalar<T: FromArgument>(arg: &str) -> Converted<T> {
    match T::convert(arg).or_else(|| T::construct(arg)) {
        Some(Ok(value)) => Converted::Value(value),
        Some(Err(err)) => Converted::Invalid(err),
        None => Converted::Unsupported,
    }
}

/// Split an integer token into its digits (sign kept) and radix.
///
/// Recognised prefixes: `0x`/`0X`, `0o`/`0O`, `0b`/`0B`.
fn split_radix(arg: &str) -> (String, u32) {
    let (sign, unsigned) = match arg.as_bytes().first() {
        Some(b'-') | Some(b'+') => arg.split_at(1),
        _ => ("", arg),
    };

    let lower = unsigned.get(..2).map(str::to_ascii_lowercase);
    let radix = match lower.as_deref() {
        Some("0x") => 16,
        Some("0o") => 8,
        Some("0b") => 2,
        _ => return (arg.to_string(), 10),
    };

    let digits = &unsigned[2..];
    // A second sign after the prefix ("0x-1") must not be accepted.
    if digits.starts_with(['-', '+']) {
        return (format!("{sign}!{digits}"), radix);
    }
    (format!("{sign}{digits}"), radix)
}

fn integer_error(input: &str, type_name: &'static str, err: ParseIntError) -> ConversionError {
    match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ConversionError::out_of_range(input, type_name)
        }
        _ => ConversionError::invalid(input, type_name, err),
    }
}

macro_rules! integer_argument {
    ($($ty:ty),+ $(,)?) => {$(
        impl FromArgument for $ty {
            fn convert(arg: &str) -> Option<Result<Self, ConversionError>> {
                let (digits, radix) = split_radix(arg.trim());
                Some(
                    <$ty>::from_str_radix(&digits, radix)
                        .map_err(|err| integer_error(arg, stringify!($ty), err)),
                )
            }
        }
    )+};
}

integer_argument!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! float_argument {
    ($($ty:ty),+ $(,)?) => {$(
        impl FromArgument for $ty {
            fn convert(arg: &str) -> Option<Result<Self, ConversionError>> {
                Some(
                    arg.trim()
                        .parse::<$ty>()
                        .map_err(|err| ConversionError::invalid(arg, stringify!($ty), err)),
                )
            }
        }
    )+};
}

float_argument!(f32, f64);

impl FromArgument for bool {
    fn convert(arg: &str) -> Option<Result<Self, ConversionError>> {
        let parsed = match arg.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(ConversionError::invalid(
                arg,
                "bool",
                "expected one of true/false, yes/no, on/off, 1/0",
            )),
        };
        Some(parsed)
    }
}

impl FromArgument for char {
    fn convert(arg: &str) -> Option<Result<Self, ConversionError>> {
        let mut chars = arg.chars();
        let parsed = match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ConversionError::invalid(
                arg,
                "char",
                "expected exactly one character",
            )),
        };
        Some(parsed)
    }
}

impl FromArgument for String {
    fn construct(arg: &str) -> Option<Result<Self, ConversionError>> {
        Some(Ok(arg.to_string()))
    }
}

impl FromArgument for PathBuf {
    fn construct(arg: &str) -> Option<Result<Self, ConversionError>> {
        Some(Ok(PathBuf::from(arg)))
    }
}

impl FromArgument for OsString {
    fn construct(arg: &str) -> Option<Result<Self, ConversionError>> {
        Some(Ok(OsString::from(arg)))
    }
}

/// Implement [`FromArgument`] (construct-from-text pathway, via `FromStr`)
/// and the scalar [`Target`](crate::Target) shape for one or more types.
///
/// ```
/// #[derive(Debug, Default, PartialEq)]
/// struct Level(u8);
///
/// impl std::str::FromStr for Level {
///     type Err = String;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.strip_prefix('L')
///             .and_then(|n| n.parse().ok())
///             .map(Level)
///             .ok_or_else(|| format!("bad level {s}"))
///     }
/// }
///
/// argbind::from_str_argument!(Level);
///
/// assert_eq!(argbind::convert_scalar::<Level>("L3").value(), Some(Level(3)));
/// ```
#[macro_export]
macro_rules! from_str_argument {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::FromArgument for $ty {
            fn construct(
                arg: &str,
            ) -> ::std::option::Option<::std::result::Result<Self, $crate::ConversionError>> {
                ::std::option::Option::Some(arg.parse::<$ty>().map_err(|err| {
                    $crate::ConversionError::invalid(arg, ::std::any::type_name::<$ty>(), err)
                }))
            }
        }

        $crate::scalar_target!($ty);
    )+};
}

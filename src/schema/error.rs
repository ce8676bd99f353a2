//! Errors raised while declaring a schema.

use thiserror::Error;

/// Mistakes in a schema declaration. These are programming errors in the
/// caller, reported when the option is declared rather than during a parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The name is already used by another option or command.
    #[error("Name '{0}' is already declared")]
    DuplicateName(String),

    /// The name does not have the required shape.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// An option or command was declared without any name.
    #[error("At least one name is required")]
    EmptyNames,

    /// A shared value was bound to an option of a different target type.
    #[error("Value {value} holds a different target type than '{name}' expects")]
    TypeMismatch { name: String, value: usize },

    /// The value id does not belong to this definition.
    #[error("Unknown value {0}")]
    UnknownValue(usize),

    /// Minimum argument count above the maximum.
    #[error("Invalid arity: min {min} is greater than max {max}")]
    InvalidArity { min: usize, max: usize },
}

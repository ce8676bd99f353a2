//! Schema registry: declared values, options, positionals and subcommands.

mod builder;
mod command;
mod definition;
mod error;
mod option;

pub use builder::{OptionConfig, VoidOptionConfig};
pub use command::Command;
pub use definition::ParserDefinition;
pub use error::SchemaError;
pub use option::{Arity, OptionDef, DEFAULT_FLAG_VALUE};

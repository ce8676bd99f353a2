//! Command-line token parsing into caller-owned, strongly typed targets.
//!
//! A schema ([`ParserDefinition`]) binds option names and positional slots
//! to variables owned by the caller. Parsing walks the tokens once, converts
//! each argument to the target's type and writes it in place. Problems are
//! collected into the [`ParseResult`] instead of aborting the scan, so one
//! parse reports every mistake in the command line.
//!
//! ```
//! use argbind::{ArgumentParser, ErrorCode};
//!
//! let mut verbose = false;
//! let mut tags: Vec<String> = Vec::new();
//! let mut jobs = 0usize;
//! let result = {
//!     let mut parser = ArgumentParser::new();
//!     parser.add_option(&mut verbose, ["-v", "--verbose"]).unwrap();
//!     parser.add_option(&mut tags, ["--tag"]).unwrap();
//!     parser.add_option(&mut jobs, ["-j"]).unwrap().absent(4);
//!     parser.parse_args(["--tag", "a", "-v", "--bogus", "--tag", "b"])
//! };
//!
//! assert!(verbose);
//! assert_eq!(tags, ["a", "b"]);
//! assert_eq!(jobs, 4);
//! assert_eq!(result.errors().len(), 1);
//! assert_eq!(result.errors()[0].code, ErrorCode::UnknownOption);
//! ```
//!
//! Conversion picks, in order, a dedicated converter
//! ([`FromArgument::convert`]), construction from text
//! ([`FromArgument::construct`]) and otherwise leaves the target untouched
//! with a warning logged through `tracing`.

mod argument_parser;
mod config;
mod convert;
mod environment;
mod parser;
mod result;
mod schema;
mod target;
mod value;

pub use argument_parser::ArgumentParser;
pub use config::{ConfigError, ParserConfig};
pub use convert::{convert_scalar, ConversionError, Converted, FromArgument};
pub use environment::Environment;
pub use parser::Parser;
pub use result::{Assignment, ErrorCode, ParseError, ParseErrors, ParseResult, ParseResultBuilder};
pub use schema::{
    Arity, Command, OptionConfig, OptionDef, ParserDefinition, SchemaError, VoidOptionConfig,
    DEFAULT_FLAG_VALUE,
};
pub use target::{Shape, Target};
pub use value::{
    AssignAction, AssignError, Assigned, ConvertedValue, DefaultAction, Value, ValueId, ValueState,
    VoidValue,
};

//! Parser configuration: token syntax and matching rules.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::ParserConfig;

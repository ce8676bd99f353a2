//! Top-level entry point: a definition plus convenience parse methods.

use std::ops::{Deref, DerefMut};

use crate::config::{ConfigError, ParserConfig};
use crate::parser::Parser;
use crate::result::{ParseResult, ParseResultBuilder};
use crate::schema::ParserDefinition;

/// Owns a [`ParserDefinition`] and runs parses over it.
///
/// Declaration methods are reached through `Deref`, so options are added
/// directly on the parser:
///
/// ```
/// use argbind::ArgumentParser;
///
/// let mut port = 0u16;
/// let mut files: Vec<String> = Vec::new();
/// {
///     let mut parser = ArgumentParser::new();
///     parser.add_option(&mut port, ["-p", "--port"]).unwrap().absent(8080);
///     parser.add_positional(&mut files, "files").unwrap();
///
///     let result = parser.parse_args(["a.txt", "--port=9000", "b.txt"]);
///     assert!(result.is_ok());
/// }
/// assert_eq!(port, 9000);
/// assert_eq!(files, ["a.txt", "b.txt"]);
/// ```
#[derive(Default)]
pub struct ArgumentParser<'a> {
    definition: ParserDefinition<'a>,
}

impl<'a> ArgumentParser<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            definition: ParserDefinition::with_config(config)?,
        })
    }

    pub fn definition(&self) -> &ParserDefinition<'a> {
        &self.definition
    }

    pub fn definition_mut(&mut self) -> &mut ParserDefinition<'a> {
        &mut self.definition
    }

    /// Parse already-split tokens (without the program name).
    pub fn parse_args<I, S>(&mut self, tokens: I) -> ParseResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|token| token.as_ref().to_string())
            .collect();

        let mut builder = ParseResultBuilder::new();
        Parser::new(&mut self.definition, &mut builder).parse(&tokens);
        let result = builder.build();

        tracing::debug!(
            tokens = tokens.len(),
            assignments = result.assignments().len(),
            errors = result.errors().len(),
            commands = ?result.commands(),
            "Parse finished"
        );
        result
    }

    /// Parse the process arguments, skipping the program name.
    ///
    /// Arguments that are not valid UTF-8 are converted lossily.
    pub fn parse_env_args(&mut self) -> ParseResult {
        let args: Vec<String> = std::env::args_os()
            .skip(1)
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        self.parse_args(args)
    }
}

impl<'a> Deref for ArgumentParser<'a> {
    type Target = ParserDefinition<'a>;

    fn deref(&self) -> &Self::Target {
        &self.definition
    }
}

impl<'a> DerefMut for ArgumentParser<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.definition
    }
}

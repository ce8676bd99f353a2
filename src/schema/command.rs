//! Subcommands: a name plus a nested definition that takes over the rest of
//! the token stream.

use crate::config::ParserConfig;
use crate::schema::definition::ParserDefinition;

pub struct Command<'a> {
    pub(crate) names: Vec<String>,
    pub(crate) definition: ParserDefinition<'a>,
    help: String,
}

impl<'a> Command<'a> {
    pub(crate) fn new(names: Vec<String>, definition: ParserDefinition<'a>) -> Self {
        Self {
            names,
            definition,
            help: String::new(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn display_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or_default()
    }

    pub fn definition(&self) -> &ParserDefinition<'a> {
        &self.definition
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn with_help(&mut self, help: impl Into<String>) -> &mut Self {
        self.help = help.into();
        self
    }

    pub(crate) fn has_name(&self, name: &str, config: &ParserConfig) -> bool {
        self.names
            .iter()
            .any(|declared| config.names_match(declared, name))
    }
}

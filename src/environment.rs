//! Context handed to assign actions.

use crate::result::{ErrorCode, ParseError, ParseResultBuilder};

/// Lets an action inspect which option is being assigned, report errors and
/// stop the parser.
pub struct Environment<'r> {
    option_name: &'r str,
    result: &'r mut ParseResultBuilder,
}

impl<'r> Environment<'r> {
    pub(crate) fn new(option_name: &'r str, result: &'r mut ParseResultBuilder) -> Self {
        Self {
            option_name,
            result,
        }
    }

    /// Display name of the option (or positional) being assigned.
    pub fn option_name(&self) -> &str {
        self.option_name
    }

    /// Record an error against the current option.
    pub fn add_error(&mut self, code: ErrorCode) {
        self.result
            .add_error(ParseError::new(self.option_name, code));
    }

    /// Stop scanning after the current token.
    ///
    /// Required-option and missing-argument checks are skipped for the rest
    /// of the parse; this is what `--help` style options want.
    pub fn exit_parser(&mut self) {
        tracing::debug!(option = %self.option_name, "Parser exit requested");
        self.result.request_exit();
    }
}

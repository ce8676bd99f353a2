//! The parsing state machine.
//!
//! A [`Parser`] walks the token sequence once. Tokens naming options start
//! (and possibly activate) the option; free tokens feed the active option,
//! the current positional slot or a subcommand. Problems are recorded in the
//! result builder and the scan always continues.

use tracing::{debug, trace};

use crate::environment::Environment;
use crate::parser::classifier::{classify, is_negative_number, Token};
use crate::result::{ErrorCode, ParseError, ParseResultBuilder};
use crate::schema::{OptionDef, ParserDefinition};
use crate::value::{AssignError, Assigned, Value};

/// What the scan does after a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    /// A subcommand consumed the remaining tokens.
    Delegated,
}

/// Single-use parser over one definition.
///
/// Assignments go to the targets bound in the definition, errors and
/// assignment records to the result builder. Create a new parser for every
/// token sequence.
pub struct Parser<'p, 'a> {
    def: &'p mut ParserDefinition<'a>,
    result: &'p mut ParseResultBuilder,
    ignore_options: bool,
    position: usize,
    positional_started: bool,
    active_option: Option<usize>,
}

impl<'p, 'a> Parser<'p, 'a> {
    pub fn new(def: &'p mut ParserDefinition<'a>, result: &'p mut ParseResultBuilder) -> Self {
        Self {
            def,
            result,
            ignore_options: false,
            position: 0,
            positional_started: false,
            active_option: None,
        }
    }

    /// Scan `tokens` and finalize the definition's values.
    pub fn parse<S: AsRef<str>>(mut self, tokens: &[S]) {
        for value in self.def.values.iter_mut() {
            value.reset();
        }
        debug!(tokens = tokens.len(), "Parsing");

        for (i, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            let flow = self.process(token, &tokens[i + 1..]);
            if flow == Flow::Delegated {
                break;
            }
            if self.result.exit_requested() {
                debug!(token, "Scan stopped on exit request");
                break;
            }
        }

        self.finish();
    }

    fn process<S: AsRef<str>>(&mut self, token: &str, rest: &[S]) -> Flow {
        if self.ignore_options {
            return self.add_free_argument(token, rest);
        }

        match classify(token, &self.def.config) {
            Token::EndOfOptions => {
                trace!("End of options");
                self.ignore_options = true;
                Flow::Continue
            }
            Token::Long { name, attached } => {
                self.add_long_option(name, attached);
                Flow::Continue
            }
            Token::Short(name) => {
                if let Some(index) = self.def.option_index(name) {
                    self.start_option(index);
                    Flow::Continue
                } else if self.def.config.negative_numbers_are_free
                    && is_negative_number(name, &self.def.config)
                {
                    self.add_free_argument(token, rest)
                } else if self.def.config.group_short_options {
                    self.add_short_cluster(name);
                    Flow::Continue
                } else {
                    self.unknown_option(name);
                    Flow::Continue
                }
            }
            Token::Free(token) => self.add_free_argument(token, rest),
        }
    }

    fn add_long_option(&mut self, name: &str, attached: Option<&str>) {
        let Some(index) = self.def.option_index(name) else {
            self.unknown_option(name);
            return;
        };

        match attached {
            None => self.start_option(index),
            Some(arg) if !self.def.options[index].accepts_arguments() => {
                self.close_option();
                let option = &self.def.options[index];
                self.result.add_error(
                    ParseError::new(option.display_name(), ErrorCode::FlagParameter)
                        .with_detail(format!("'{arg}' given to an option without arguments")),
                );
            }
            Some(arg) => {
                self.start_option(index);
                self.assign_option(index, arg);
                self.close_option();
            }
        }
    }

    /// `-abc` is `-a -b -c`; a letter taking arguments swallows the rest of
    /// the cluster as its value (`-n5`).
    fn add_short_cluster(&mut self, token: &str) {
        let prefix = self.def.config.short_prefix.clone();
        let mut rest = &token[prefix.len()..];
        let mut first = true;

        while let Some(letter) = rest.chars().next() {
            rest = &rest[letter.len_utf8()..];
            let name = format!("{prefix}{letter}");
            let Some(index) = self.def.option_index(&name) else {
                if first {
                    self.unknown_option(token);
                    return;
                }
                self.unknown_option(&name);
                continue;
            };
            first = false;

            if self.def.options[index].accepts_arguments() && !rest.is_empty() {
                self.start_option(index);
                self.assign_option(index, rest);
                self.close_option();
                return;
            }
            self.start_option(index);
            if self.result.exit_requested() {
                return;
            }
        }
    }

    fn unknown_option(&mut self, name: &str) {
        self.result
            .add_error(ParseError::new(name, ErrorCode::UnknownOption));
    }

    fn start_option(&mut self, index: usize) {
        self.close_option();

        let option = &self.def.options[index];
        trace!(option = option.display_name(), "Option started");
        self.def.values[option.value.0].on_option_started();

        if option.accepts_arguments() {
            self.active_option = Some(index);
        } else {
            let flag = option.effective_flag_value().to_string();
            self.assign_option(index, &flag);
        }
    }

    fn close_option(&mut self) {
        let Some(index) = self.active_option.take() else {
            return;
        };

        let option = &self.def.options[index];
        let value = &*self.def.values[option.value.0];
        if option.needs_more_arguments(value) {
            self.result.add_error(ParseError::new(
                option.display_name(),
                ErrorCode::MissingArgument,
            ));
        } else if !option.was_assigned_through_this_option(value) {
            if let Some(flag) = option.flag_value.clone() {
                self.assign_option(index, &flag);
            }
        }
    }

    fn add_free_argument<S: AsRef<str>>(&mut self, token: &str, rest: &[S]) -> Flow {
        if let Some(index) = self.active_option {
            let option = &self.def.options[index];
            if option.will_accept_argument(&*self.def.values[option.value.0]) {
                self.assign_option(index, token);
                let option = &self.def.options[index];
                if !option.will_accept_argument(&*self.def.values[option.value.0]) {
                    self.close_option();
                }
                return Flow::Continue;
            }
            self.close_option();
        }

        // A positional in the middle of its arguments keeps them.
        if self.positional_started && self.current_positional_needs_more() {
            self.assign_positional(self.position, token);
            return Flow::Continue;
        }

        if !self.ignore_options {
            if let Some(index) = self.def.command_index(token) {
                let command = &mut self.def.commands[index];
                debug!(
                    command = command.display_name(),
                    remaining = rest.len(),
                    "Delegating to subcommand"
                );
                self.result.add_command(command.display_name());
                Parser::new(&mut command.definition, &mut *self.result).parse(rest);
                return Flow::Delegated;
            }
        }

        match self.next_positional() {
            Some(slot) => self.assign_positional(slot, token),
            None => self
                .result
                .add_error(ParseError::new(token, ErrorCode::UnexpectedFreeArgument)),
        }
        Flow::Continue
    }

    fn current_positional_needs_more(&self) -> bool {
        self.def.positionals.get(self.position).is_some_and(|slot| {
            slot.needs_more_arguments(&*self.def.values[slot.value.0])
        })
    }

    /// Index of the positional slot that takes the next free argument,
    /// starting slots as they are reached.
    fn next_positional(&mut self) -> Option<usize> {
        while let Some(slot) = self.def.positionals.get(self.position) {
            let value = slot.value;
            if !self.positional_started {
                trace!(positional = slot.display_name(), "Positional started");
                self.def.values[value.0].on_option_started();
                self.positional_started = true;
            }
            let slot = &self.def.positionals[self.position];
            if slot.will_accept_argument(&*self.def.values[value.0]) {
                return Some(self.position);
            }
            self.position += 1;
            self.positional_started = false;
        }
        None
    }

    fn assign_option(&mut self, index: usize, token: &str) {
        assign(
            &mut self.def.options[index],
            &mut self.def.values,
            self.result,
            token,
        );
    }

    fn assign_positional(&mut self, index: usize, token: &str) {
        assign(
            &mut self.def.positionals[index],
            &mut self.def.values,
            self.result,
            token,
        );
    }

    /// End of input: close the active option, report missing items and
    /// apply defaults to untouched values.
    fn finish(&mut self) {
        self.close_option();
        if self.result.exit_requested() {
            return;
        }

        for (i, slot) in self.def.positionals.iter().enumerate() {
            let value = &*self.def.values[slot.value.0];
            let started = i == self.position && self.positional_started;
            if (started && slot.needs_more_arguments(value))
                || (slot.required && value.assign_count() == 0)
            {
                self.result.add_error(ParseError::new(
                    slot.display_name(),
                    ErrorCode::MissingArgument,
                ));
            }
        }

        for option in &self.def.options {
            if option.required && self.def.values[option.value.0].assign_count() == 0 {
                self.result.add_error(ParseError::new(
                    option.display_name(),
                    ErrorCode::MissingOption,
                ));
            }
        }

        let values = &mut self.def.values;
        let slots = self
            .def
            .options
            .iter_mut()
            .chain(self.def.positionals.iter_mut());
        for option in slots {
            let value = &mut values[option.value.0];
            // Shared values take the first default only.
            if value.assign_count() > 0 {
                continue;
            }
            if let Some(default) = option.default_action.as_mut() {
                trace!(option = %option.names[0], "Applying default");
                value.set_default(default);
            }
        }
    }
}

/// Assign one token through `option`, recording the outcome.
fn assign<'a>(
    option: &mut OptionDef<'a>,
    values: &mut [Box<dyn Value + 'a>],
    result: &mut ParseResultBuilder,
    token: &str,
) {
    let name = option.display_name().to_string();
    let value = &mut *values[option.value.0];

    if !option.choices.is_empty() && !option.choices.iter().any(|choice| choice == token) {
        value.mark_bad_argument();
        result.add_error(
            ParseError::new(name, ErrorCode::InvalidChoice).with_detail(format!(
                "'{token}' is not one of: {}",
                option.choices.join(", ")
            )),
        );
        return;
    }

    let mut env = Environment::new(&name, result);
    let outcome = value.set_value(token, option.action.as_mut(), &mut env);
    match outcome {
        Ok(Assigned::Stored) => {
            trace!(option = %name, argument = token, "Assigned");
            result.add_assignment(&name, token);
        }
        Ok(Assigned::Unsupported) => {
            debug!(option = %name, argument = token, "Token not stored, target has no conversion");
        }
        Err(AssignError::Conversion(err)) => result.add_error(
            ParseError::new(name.as_str(), ErrorCode::ConversionFailed).with_detail(err.to_string()),
        ),
        Err(AssignError::Action(err)) => result.add_error(
            ParseError::new(name.as_str(), ErrorCode::ActionFailed).with_detail(format!("{err:#}")),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ParseResult;
    use crate::schema::Arity;

    fn run(def: &mut ParserDefinition<'_>, tokens: &[&str]) -> ParseResult {
        let mut result = ParseResultBuilder::new();
        Parser::new(def, &mut result).parse(tokens);
        result.build()
    }

    fn codes(result: &ParseResult) -> Vec<ErrorCode> {
        result.errors().iter().map(|error| error.code).collect()
    }

    #[test]
    fn short_cluster_expands_into_flags() {
        let mut all = false;
        let mut verbose = false;
        let mut count = 0u32;
        let mut def = ParserDefinition::new();
        def.add_option(&mut all, ["-a"]).unwrap();
        def.add_option(&mut verbose, ["-v"]).unwrap();
        def.add_option(&mut count, ["-n"]).unwrap();

        let result = run(&mut def, &["-avn7"]);
        assert!(result.is_ok(), "{:?}", result.errors());
        drop(def);
        assert!(all);
        assert!(verbose);
        assert_eq!(count, 7);
    }

    #[test]
    fn cluster_letter_waits_for_next_token() {
        let mut verbose = false;
        let mut count = 0u32;
        let mut def = ParserDefinition::new();
        def.add_option(&mut verbose, ["-v"]).unwrap();
        def.add_option(&mut count, ["-n"]).unwrap();

        let result = run(&mut def, &["-vn", "3"]);
        assert!(result.is_ok());
        drop(def);
        assert!(verbose);
        assert_eq!(count, 3);
    }

    #[test]
    fn unknown_cluster_is_one_error() {
        let mut verbose = false;
        let mut def = ParserDefinition::new();
        def.add_option(&mut verbose, ["-v"]).unwrap();

        let result = run(&mut def, &["-xyz", "-vq"]);
        let subjects: Vec<_> = result
            .errors()
            .iter()
            .map(|error| error.subject.as_str())
            .collect();
        assert_eq!(subjects, vec!["-xyz", "-q"]);
        assert_eq!(
            codes(&result),
            vec![ErrorCode::UnknownOption, ErrorCode::UnknownOption]
        );
    }

    #[test]
    fn negative_number_is_an_argument() {
        let mut offset = 0i32;
        let mut rest: Vec<f64> = Vec::new();
        let mut def = ParserDefinition::new();
        def.add_option(&mut offset, ["--offset"]).unwrap();
        def.add_positional(&mut rest, "values").unwrap();

        let result = run(&mut def, &["--offset", "-5", "-0.5", "2"]);
        assert!(result.is_ok(), "{:?}", result.errors());
        drop(def);
        assert_eq!(offset, -5);
        assert_eq!(rest, vec![-0.5, 2.0]);
    }

    #[test]
    fn flag_with_attached_value_is_rejected() {
        let mut verbose = false;
        let mut def = ParserDefinition::new();
        def.add_option(&mut verbose, ["--verbose"]).unwrap();

        let result = run(&mut def, &["--verbose=yes"]);
        assert_eq!(codes(&result), vec![ErrorCode::FlagParameter]);
        drop(def);
        assert!(!verbose);
    }

    #[test]
    fn missing_argument_at_end_of_input() {
        let mut name = String::new();
        let mut def = ParserDefinition::new();
        def.add_option(&mut name, ["--name"]).unwrap();

        let result = run(&mut def, &["--name"]);
        assert_eq!(codes(&result), vec![ErrorCode::MissingArgument]);
    }

    #[test]
    fn option_closes_when_next_option_starts() {
        let mut pair: Vec<String> = Vec::new();
        let mut verbose = false;
        let mut def = ParserDefinition::new();
        def.add_option(&mut pair, ["--pair"])
            .unwrap()
            .arity(Arity::exactly(2));
        def.add_option(&mut verbose, ["-v"]).unwrap();

        let result = run(&mut def, &["--pair", "a", "-v", "b"]);
        assert_eq!(
            codes(&result),
            vec![ErrorCode::MissingArgument, ErrorCode::UnexpectedFreeArgument]
        );
    }

    #[test]
    fn optional_argument_falls_back_to_flag_value() {
        let mut color = String::new();
        let mut def = ParserDefinition::new();
        def.add_option(&mut color, ["--color"])
            .unwrap()
            .arity(Arity::at_most(1))
            .flag_value("always");

        let result = run(&mut def, &["--color"]);
        assert!(result.is_ok());
        drop(def);
        assert_eq!(color, "always");
    }

    #[test]
    fn invalid_choice_is_reported_and_target_kept() {
        let mut mode = String::new();
        let mut def = ParserDefinition::new();
        def.add_option(&mut mode, ["--mode"])
            .unwrap()
            .choices(["fast", "safe"]);

        let result = run(&mut def, &["--mode", "loud"]);
        assert_eq!(codes(&result), vec![ErrorCode::InvalidChoice]);
        assert_eq!(
            result.errors()[0].detail.as_deref(),
            Some("'loud' is not one of: fast, safe")
        );
        assert!(def.value(def.options()[0].value_id()).unwrap().has_errors());
        drop(def);
        assert!(mode.is_empty());
    }

    #[test]
    fn parse_resets_values_first() {
        let mut tags: Vec<String> = Vec::new();
        let mut def = ParserDefinition::new();
        def.add_option(&mut tags, ["--tag"]).unwrap();

        run(&mut def, &["--tag", "a"]);
        run(&mut def, &["--tag", "b"]);
        let value = def.value(def.options()[0].value_id()).unwrap();
        assert_eq!(value.assign_count(), 1);
        drop(def);
        assert_eq!(tags, vec!["b".to_string()]);
    }
}

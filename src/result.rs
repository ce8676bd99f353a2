//! Parse results: successful assignments and structured errors.

use std::fmt;

use thiserror::Error;

/// Kind of a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// An option-looking token names no declared option.
    UnknownOption,
    /// A free argument found no positional slot or command.
    UnexpectedFreeArgument,
    /// An option or positional received fewer arguments than it requires.
    MissingArgument,
    /// A required option was never given.
    MissingOption,
    /// The token could not be converted to the target type.
    ConversionFailed,
    /// The token is not one of the declared choices.
    InvalidChoice,
    /// An option that takes no argument was given one (`--flag=value`).
    FlagParameter,
    /// A custom assign action failed.
    ActionFailed,
    /// Application-defined code raised from an action.
    Custom(i32),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::UnknownOption => f.write_str("unknown option"),
            ErrorCode::UnexpectedFreeArgument => f.write_str("unexpected argument"),
            ErrorCode::MissingArgument => f.write_str("missing argument for"),
            ErrorCode::MissingOption => f.write_str("missing required option"),
            ErrorCode::ConversionFailed => f.write_str("invalid value for"),
            ErrorCode::InvalidChoice => f.write_str("invalid choice for"),
            ErrorCode::FlagParameter => f.write_str("unexpected value for flag"),
            ErrorCode::ActionFailed => f.write_str("action failed for"),
            ErrorCode::Custom(code) => write!(f, "error {code} for"),
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

/// A structured error: the offending token or option name plus its code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code} '{subject}'{}", detail_suffix(.detail))]
pub struct ParseError {
    pub subject: String,
    pub code: ErrorCode,
    pub detail: Option<String>,
}

impl ParseError {
    pub fn new(subject: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            subject: subject.into(),
            code,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// All errors of a failed parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summarize(.0))]
pub struct ParseErrors(pub Vec<ParseError>);

fn summarize(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// One token successfully assigned through an option or positional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub argument: String,
}

/// Collects assignments and errors while a parse runs.
#[derive(Debug, Default)]
pub struct ParseResultBuilder {
    errors: Vec<ParseError>,
    assignments: Vec<Assignment>,
    commands: Vec<String>,
    exit_requested: bool,
}

impl ParseResultBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: ParseError) {
        tracing::debug!(
            subject = %error.subject,
            code = ?error.code,
            "Recorded parse error"
        );
        self.errors.push(error);
    }

    pub fn add_assignment(&mut self, name: &str, argument: &str) {
        self.assignments.push(Assignment {
            name: name.to_string(),
            argument: argument.to_string(),
        });
    }

    /// Record that a subcommand took over the rest of the tokens.
    pub fn add_command(&mut self, name: &str) {
        self.commands.push(name.to_string());
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn build(self) -> ParseResult {
        ParseResult {
            errors: self.errors,
            assignments: self.assignments,
            commands: self.commands,
            exit_requested: self.exit_requested,
        }
    }
}

/// Outcome of a parse. Assignments already made stay visible in their bound
/// targets whether or not errors were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    errors: Vec<ParseError>,
    assignments: Vec<Assignment>,
    commands: Vec<String>,
    exit_requested: bool,
}

impl ParseResult {
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Errors with the given code.
    pub fn errors_with(&self, code: ErrorCode) -> impl Iterator<Item = &ParseError> {
        self.errors.iter().filter(move |error| error.code == code)
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Subcommands that were invoked, outermost first.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// True when an action asked the parser to stop (e.g. `--help`).
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Turn the result into `Err` when any error was recorded.
    pub fn into_result(self) -> Result<Self, ParseErrors> {
        if self.errors.is_empty() {
            Ok(self)
        } else {
            Err(ParseErrors(self.errors))
        }
    }
}

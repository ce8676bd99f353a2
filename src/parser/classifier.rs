//! Token classifier: one raw token to its syntactic kind.
//!
//! Classification only looks at the configured prefixes. Whether a name is
//! actually declared is decided later by the state machine.

use crate::config::ParserConfig;

/// Syntactic kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'t> {
    /// The end-of-options marker (`--`).
    EndOfOptions,
    /// Long option, possibly with an attached value (`--name=value`).
    Long {
        name: &'t str,
        attached: Option<&'t str>,
    },
    /// Short option or short cluster (`-v`, `-abc`, `-n5`), or a negative
    /// number.
    Short(&'t str),
    /// Anything else.
    Free(&'t str),
}

pub(crate) fn classify<'t>(token: &'t str, config: &ParserConfig) -> Token<'t> {
    if token == config.end_of_options {
        return Token::EndOfOptions;
    }

    let long = config.long_prefix.as_str();
    if token.len() > long.len() && token.starts_with(long) {
        if config.attached_values {
            // A separator right after the prefix is part of the name.
            let body = &token[long.len()..];
            if let Some(pos) = body.find(config.value_separator).filter(|&pos| pos > 0) {
                let split = long.len() + pos;
                return Token::Long {
                    name: &token[..split],
                    attached: Some(&token[split + config.value_separator.len_utf8()..]),
                };
            }
        }
        return Token::Long {
            name: token,
            attached: None,
        };
    }

    if config.is_option_name(token) {
        return Token::Short(token);
    }

    Token::Free(token)
}

/// True when the part after the short prefix reads as a number (`-5`, `-.5`).
pub(crate) fn is_negative_number(token: &str, config: &ParserConfig) -> bool {
    let Some(digits) = token.strip_prefix(config.short_prefix.as_str()) else {
        return false;
    };
    digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') && digits.parse::<f64>().is_ok()
}

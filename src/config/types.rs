use serde::{Deserialize, Serialize};

/// Token syntax and name-matching rules used by the parser.
///
/// Can be embedded in an application's own TOML configuration; every field
/// has a default, so an empty table is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Prefix of long option names (default: "--").
    #[serde(default = "default_long_prefix")]
    pub long_prefix: String,
    /// Prefix of short option names (default: "-").
    #[serde(default = "default_short_prefix")]
    pub short_prefix: String,
    /// Token after which every token is a free argument (default: "--").
    #[serde(default = "default_end_of_options")]
    pub end_of_options: String,
    /// Accept `--name=value` style attached values (default: true).
    #[serde(default = "default_true")]
    pub attached_values: bool,
    /// Separator between a long option name and its attached value (default: '=').
    #[serde(default = "default_value_separator")]
    pub value_separator: char,
    /// Match option and command names case-sensitively (default: true).
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
    /// Expand `-abc` into `-a -b -c` when `-abc` is not itself declared (default: true).
    #[serde(default = "default_true")]
    pub group_short_options: bool,
    /// Treat tokens such as `-5` or `-0.5` as free arguments unless an option
    /// with that exact name exists (default: true).
    #[serde(default = "default_true")]
    pub negative_numbers_are_free: bool,
}

fn default_long_prefix() -> String {
    "--".to_string()
}

fn default_short_prefix() -> String {
    "-".to_string()
}

fn default_end_of_options() -> String {
    "--".to_string()
}

fn default_value_separator() -> char {
    '='
}

fn default_true() -> bool {
    true
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            long_prefix: default_long_prefix(),
            short_prefix: default_short_prefix(),
            end_of_options: default_end_of_options(),
            attached_values: true,
            value_separator: default_value_separator(),
            case_sensitive: true,
            group_short_options: true,
            negative_numbers_are_free: true,
        }
    }
}

impl ParserConfig {
    /// Compare two names according to `case_sensitive`.
    pub fn names_match(&self, declared: &str, given: &str) -> bool {
        if self.case_sensitive {
            declared == given
        } else {
            declared.to_lowercase() == given.to_lowercase()
        }
    }

    /// True when `name` has the shape of an option name.
    pub fn is_option_name(&self, name: &str) -> bool {
        name.len() > self.short_prefix.len() && name.starts_with(&self.short_prefix)
    }
}

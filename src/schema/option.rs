//! Option definitions: one declared option or positional slot.

use crate::config::ParserConfig;
use crate::schema::error::SchemaError;
use crate::target::{Shape, Target};
use crate::value::{AssignAction, DefaultAction, Value, ValueId};

/// Flag value used when an argument-less option declares none.
pub const DEFAULT_FLAG_VALUE: &str = "1";

/// How many argument tokens an option accepts per activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    min: usize,
    max: Option<usize>,
}

impl Arity {
    pub fn exactly(count: usize) -> Self {
        Self {
            min: count,
            max: Some(count),
        }
    }

    pub fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn at_most(max: usize) -> Self {
        Self {
            min: 0,
            max: Some(max),
        }
    }

    pub fn between(min: usize, max: usize) -> Result<Self, SchemaError> {
        if min > max {
            return Err(SchemaError::InvalidArity { min, max });
        }
        Ok(Self {
            min,
            max: Some(max),
        })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    /// Upper bound, `None` when unbounded.
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Default arity of an option bound to `T`.
    pub(crate) fn option_default<T: Target>() -> Self {
        if T::FLAG_VALUE.is_some() {
            Self::exactly(0)
        } else {
            Self::exactly(1)
        }
    }

    /// Default arity of a positional slot bound to `T`.
    pub(crate) fn positional_default<T: Target>() -> Self {
        match T::SHAPE {
            Shape::Scalar => Self::exactly(1),
            Shape::Optional => Self::at_most(1),
            Shape::Sequence => Self::at_least(1),
        }
    }
}

/// A declared option or positional argument.
///
/// Holds the option's own behaviour; the bound target lives in the value
/// referenced by [`value_id`](OptionDef::value_id), which other options may
/// share.
pub struct OptionDef<'a> {
    pub(crate) names: Vec<String>,
    pub(crate) value: ValueId,
    pub(crate) arity: Arity,
    pub(crate) required: bool,
    pub(crate) flag_value: Option<String>,
    pub(crate) choices: Vec<String>,
    pub(crate) action: Option<AssignAction<'a>>,
    pub(crate) default_action: Option<DefaultAction<'a>>,
    pub(crate) help: String,
}

impl<'a> OptionDef<'a> {
    pub(crate) fn new(names: Vec<String>, value: ValueId, arity: Arity) -> Self {
        Self {
            names,
            value,
            arity,
            required: false,
            flag_value: None,
            choices: Vec::new(),
            action: None,
            default_action: None,
            help: String::new(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// First declared name, used in errors.
    pub fn display_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or_default()
    }

    pub fn value_id(&self) -> ValueId {
        self.value
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn flag_value(&self) -> Option<&str> {
        self.flag_value.as_deref()
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn has_default(&self) -> bool {
        self.default_action.is_some()
    }

    pub(crate) fn has_name(&self, name: &str, config: &ParserConfig) -> bool {
        self.names
            .iter()
            .any(|declared| config.names_match(declared, name))
    }

    /// False for flags: the option never consumes argument tokens.
    pub fn accepts_arguments(&self) -> bool {
        self.arity.max != Some(0)
    }

    /// The current activation can take another argument token.
    pub fn will_accept_argument(&self, value: &dyn Value) -> bool {
        self.arity
            .max
            .map_or(true, |max| value.option_assign_count() < max)
    }

    /// The current activation has not yet reached its minimum.
    pub fn needs_more_arguments(&self, value: &dyn Value) -> bool {
        value.option_assign_count() < self.arity.min
    }

    /// At least one token was consumed (or rejected) during this activation.
    pub fn was_assigned_through_this_option(&self, value: &dyn Value) -> bool {
        value.option_assign_count() > 0
    }

    /// Token assigned when the option appears without an argument.
    pub(crate) fn effective_flag_value(&self) -> &str {
        self.flag_value.as_deref().unwrap_or(DEFAULT_FLAG_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ConvertedValue;

    #[test]
    fn default_arity_follows_target_shape() {
        assert_eq!(Arity::option_default::<bool>(), Arity::exactly(0));
        assert_eq!(Arity::option_default::<u32>(), Arity::exactly(1));
        assert_eq!(Arity::option_default::<Vec<u32>>(), Arity::exactly(1));
        assert_eq!(Arity::positional_default::<String>(), Arity::exactly(1));
        assert_eq!(Arity::positional_default::<Option<String>>(), Arity::at_most(1));
        assert_eq!(Arity::positional_default::<Vec<String>>(), Arity::at_least(1));
    }

    #[test]
    fn between_rejects_inverted_bounds() {
        assert_eq!(
            Arity::between(3, 1),
            Err(SchemaError::InvalidArity { min: 3, max: 1 })
        );
        let arity = Arity::between(1, 3).unwrap();
        assert_eq!((arity.min(), arity.max()), (1, Some(3)));
    }

    #[test]
    fn acceptance_tracks_option_counter() {
        let mut target: Vec<u8> = Vec::new();
        let mut value = ConvertedValue::new(&mut target);
        let value: &mut dyn Value = &mut value;
        let option = OptionDef::new(
            vec!["--n".to_string()],
            ValueId(0),
            Arity::between(1, 2).unwrap(),
        );

        assert!(option.accepts_arguments());
        assert!(option.will_accept_argument(value));
        assert!(option.needs_more_arguments(value));
        assert!(!option.was_assigned_through_this_option(value));

        value.mark_bad_argument();
        assert!(option.will_accept_argument(value));
        assert!(!option.needs_more_arguments(value));

        value.mark_bad_argument();
        assert!(!option.will_accept_argument(value));
        assert!(option.was_assigned_through_this_option(value));
    }

    #[test]
    fn flags_fall_back_to_default_flag_value() {
        let mut option = OptionDef::new(vec!["-v".to_string()], ValueId(0), Arity::exactly(0));
        assert!(!option.accepts_arguments());
        assert_eq!(option.effective_flag_value(), DEFAULT_FLAG_VALUE);
        option.flag_value = Some("true".to_string());
        assert_eq!(option.effective_flag_value(), "true");
    }
}

//! Fluent configuration of a freshly declared option.

use std::marker::PhantomData;

use crate::environment::Environment;
use crate::schema::option::{Arity, OptionDef};
use crate::target::Target;
use crate::value::{typed_action, typed_default, void_action};

/// Configures an option or positional bound to a target of type `T`.
///
/// ```
/// use argbind::{Arity, ParserDefinition};
///
/// let mut level = String::new();
/// let mut def = ParserDefinition::new();
/// def.add_option(&mut level, ["-l", "--level"])
///     .unwrap()
///     .choices(["low", "high"])
///     .absent("low".to_string())
///     .arity(Arity::exactly(1))
///     .help("Processing level");
/// ```
pub struct OptionConfig<'d, 'a, T> {
    option: &'d mut OptionDef<'a>,
    _target: PhantomData<fn(&mut T)>,
}

impl<'d, 'a, T: Target> OptionConfig<'d, 'a, T> {
    pub(crate) fn new(option: &'d mut OptionDef<'a>) -> Self {
        Self {
            option,
            _target: PhantomData,
        }
    }

    pub fn arity(self, arity: Arity) -> Self {
        self.option.arity = arity;
        self
    }

    /// A required option that is never given is reported as an error.
    pub fn required(self, required: bool) -> Self {
        self.option.required = required;
        self
    }

    /// Token assigned when the option is given without an argument.
    pub fn flag_value(self, value: impl Into<String>) -> Self {
        self.option.flag_value = Some(value.into());
        self
    }

    /// Value stored when no token was assigned during a parse.
    pub fn absent(self, value: T) -> Self
    where
        T: Clone,
    {
        self.option.default_action = Some(typed_default::<T, _>(move |target| {
            *target = value.clone();
        }));
        self
    }

    /// Restrict accepted tokens to the given spellings.
    pub fn choices<I, S>(self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.option.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the default conversion with a custom assignment.
    pub fn action<F>(self, action: F) -> Self
    where
        F: FnMut(&mut T, &str, &mut Environment<'_>) -> anyhow::Result<()> + 'a,
    {
        self.option.action = Some(typed_action::<T, F>(action));
        self
    }

    pub fn help(self, help: impl Into<String>) -> Self {
        self.option.help = help.into();
        self
    }
}

/// Configures an option that is not bound to any target.
pub struct VoidOptionConfig<'d, 'a> {
    option: &'d mut OptionDef<'a>,
}

impl<'d, 'a> VoidOptionConfig<'d, 'a> {
    pub(crate) fn new(option: &'d mut OptionDef<'a>) -> Self {
        Self { option }
    }

    pub fn arity(self, arity: Arity) -> Self {
        self.option.arity = arity;
        self
    }

    pub fn required(self, required: bool) -> Self {
        self.option.required = required;
        self
    }

    pub fn flag_value(self, value: impl Into<String>) -> Self {
        self.option.flag_value = Some(value.into());
        self
    }

    /// Called with every token (or the flag value) given to the option.
    pub fn action<F>(self, action: F) -> Self
    where
        F: FnMut(&str, &mut Environment<'_>) -> anyhow::Result<()> + 'a,
    {
        self.option.action = Some(void_action(action));
        self
    }

    pub fn help(self, help: impl Into<String>) -> Self {
        self.option.help = help.into();
        self
    }
}

//! The schema registry: declared values, options, positionals and commands.
//!
//! Nodes live in arenas owned by the definition and are referred to by index.
//! Values are separate from options so several options can write through the
//! same value (e.g. `--verbose` and `--quiet` adjusting one level).

use std::any::TypeId;

use crate::config::{ConfigError, ParserConfig};
use crate::schema::builder::{OptionConfig, VoidOptionConfig};
use crate::schema::command::Command;
use crate::schema::error::SchemaError;
use crate::schema::option::{Arity, OptionDef};
use crate::target::Target;
use crate::value::{ConvertedValue, Value, ValueId, VoidValue};

/// Declared schema of a parser. `'a` is the lifetime of the bound targets.
#[derive(Default)]
pub struct ParserDefinition<'a> {
    pub(crate) config: ParserConfig,
    pub(crate) values: Vec<Box<dyn Value + 'a>>,
    pub(crate) options: Vec<OptionDef<'a>>,
    pub(crate) positionals: Vec<OptionDef<'a>>,
    pub(crate) commands: Vec<Command<'a>>,
}

impl<'a> ParserDefinition<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A definition using a custom (validated) configuration.
    pub fn with_config(config: ParserConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// An empty definition for a subcommand, inheriting this configuration.
    pub fn subcommand(&self) -> Self {
        Self {
            config: self.config.clone(),
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn options(&self) -> &[OptionDef<'a>] {
        &self.options
    }

    pub fn positionals(&self) -> &[OptionDef<'a>] {
        &self.positionals
    }

    pub fn commands(&self) -> &[Command<'a>] {
        &self.commands
    }

    /// State of a declared value.
    pub fn value(&self, id: ValueId) -> Option<&(dyn Value + 'a)> {
        self.values.get(id.0).map(|value| &**value)
    }

    /// Look up an option by any of its names.
    pub fn find_option(&self, name: &str) -> Option<&OptionDef<'a>> {
        self.option_index(name).map(|index| &self.options[index])
    }

    /// Look up a command by any of its names.
    pub fn find_command(&self, name: &str) -> Option<&Command<'a>> {
        self.command_index(name).map(|index| &self.commands[index])
    }

    pub(crate) fn option_index(&self, name: &str) -> Option<usize> {
        self.options
            .iter()
            .position(|option| option.has_name(name, &self.config))
    }

    pub(crate) fn command_index(&self, name: &str) -> Option<usize> {
        self.commands
            .iter()
            .position(|command| command.has_name(name, &self.config))
    }

    /// Declare a value that options can share through
    /// [`add_option_for`](Self::add_option_for).
    pub fn add_value<T: Target>(&mut self, target: &'a mut T) -> ValueId {
        self.push_value(Box::new(ConvertedValue::new(target)))
    }

    /// Declare an option bound to its own target.
    pub fn add_option<T, N, S>(
        &mut self,
        target: &'a mut T,
        names: N,
    ) -> Result<OptionConfig<'_, 'a, T>, SchemaError>
    where
        T: Target,
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = self.checked_option_names(names)?;
        let value = self.push_value(Box::new(ConvertedValue::new(target)));
        let option = self.push_option(names, value, Arity::option_default::<T>(), T::FLAG_VALUE);
        Ok(OptionConfig::new(option))
    }

    /// Declare an option writing through an existing value.
    pub fn add_option_for<T, N, S>(
        &mut self,
        value: ValueId,
        names: N,
    ) -> Result<OptionConfig<'_, 'a, T>, SchemaError>
    where
        T: Target,
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = self.checked_option_names(names)?;
        let declared = self
            .values
            .get(value.0)
            .ok_or(SchemaError::UnknownValue(value.0))?;
        if declared.target_type() != TypeId::of::<T>() {
            return Err(SchemaError::TypeMismatch {
                name: names[0].clone(),
                value: value.0,
            });
        }
        let option = self.push_option(names, value, Arity::option_default::<T>(), T::FLAG_VALUE);
        Ok(OptionConfig::new(option))
    }

    /// Declare an option with no bound target; only its action does work.
    pub fn add_void_option<N, S>(&mut self, names: N) -> Result<VoidOptionConfig<'_, 'a>, SchemaError>
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = self.checked_option_names(names)?;
        let value = self.push_value(Box::new(VoidValue::default()));
        let option = self.push_option(names, value, Arity::exactly(0), None);
        Ok(VoidOptionConfig::new(option))
    }

    /// Declare the next positional slot.
    pub fn add_positional<T: Target>(
        &mut self,
        target: &'a mut T,
        name: impl Into<String>,
    ) -> Result<OptionConfig<'_, 'a, T>, SchemaError> {
        let name = name.into();
        if name.is_empty() || self.config.is_option_name(&name) {
            return Err(SchemaError::InvalidName {
                reason: format!(
                    "positional names must be non-empty and not start with '{}'",
                    self.config.short_prefix
                ),
                name,
            });
        }
        if self
            .positionals
            .iter()
            .any(|slot| slot.has_name(&name, &self.config))
        {
            return Err(SchemaError::DuplicateName(name));
        }

        let value = self.push_value(Box::new(ConvertedValue::new(target)));
        let mut slot = OptionDef::new(vec![name], value, Arity::positional_default::<T>());
        slot.flag_value = T::FLAG_VALUE.map(str::to_string);
        self.positionals.push(slot);
        let index = self.positionals.len() - 1;
        Ok(OptionConfig::new(&mut self.positionals[index]))
    }

    /// Declare a subcommand parsed by its own definition.
    pub fn add_command<N, S>(
        &mut self,
        names: N,
        definition: ParserDefinition<'a>,
    ) -> Result<&mut Command<'a>, SchemaError>
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(SchemaError::EmptyNames);
        }
        for name in &names {
            if name.is_empty() || self.config.is_option_name(name) {
                return Err(SchemaError::InvalidName {
                    name: name.clone(),
                    reason: format!(
                        "command names must be non-empty and not start with '{}'",
                        self.config.short_prefix
                    ),
                });
            }
            if self.command_index(name).is_some() {
                return Err(SchemaError::DuplicateName(name.clone()));
            }
        }

        self.commands.push(Command::new(names, definition));
        let index = self.commands.len() - 1;
        Ok(&mut self.commands[index])
    }

    fn checked_option_names<N, S>(&self, names: N) -> Result<Vec<String>, SchemaError>
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(SchemaError::EmptyNames);
        }

        for (i, name) in names.iter().enumerate() {
            if !self.config.is_option_name(name) || *name == self.config.end_of_options {
                return Err(SchemaError::InvalidName {
                    name: name.clone(),
                    reason: format!(
                        "option names must start with '{}' and differ from '{}'",
                        self.config.short_prefix, self.config.end_of_options
                    ),
                });
            }
            let repeated = names[..i]
                .iter()
                .any(|earlier| self.config.names_match(earlier, name));
            if repeated || self.option_index(name).is_some() {
                return Err(SchemaError::DuplicateName(name.clone()));
            }
        }

        Ok(names)
    }

    fn push_value(&mut self, value: Box<dyn Value + 'a>) -> ValueId {
        self.values.push(value);
        ValueId(self.values.len() - 1)
    }

    fn push_option(
        &mut self,
        names: Vec<String>,
        value: ValueId,
        arity: Arity,
        flag_value: Option<&str>,
    ) -> &mut OptionDef<'a> {
        let mut option = OptionDef::new(names, value, arity);
        option.flag_value = flag_value.map(str::to_string);
        self.options.push(option);
        let index = self.options.len() - 1;
        &mut self.options[index]
    }
}

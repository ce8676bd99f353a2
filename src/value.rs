//! Value abstraction: one bound target plus its assignment bookkeeping.
//!
//! Every option or positional slot writes through a [`Value`]. The value
//! tracks how often it was assigned overall (shared by all options bound to
//! it) and during the current option activation, and whether any attempt
//! failed. The actual conversion is delegated to the target's shape
//! ([`Target::assign`]) unless the option supplies its own action.

use std::any::{Any, TypeId};

use thiserror::Error;

use crate::convert::{ConversionError, Converted};
use crate::environment::Environment;
use crate::target::Target;

/// Action executed to assign one token to a value.
///
/// When an option has no action of its own, the value's default action
/// (target conversion) is used instead.
pub type AssignAction<'a> =
    Box<dyn FnMut(&mut dyn Value, &str, &mut Environment<'_>) -> anyhow::Result<()> + 'a>;

/// Action executed once when a value received no assignment during a parse.
/// The documented default is captured inside the closure.
pub type DefaultAction<'a> = Box<dyn FnMut(&mut dyn Value) + 'a>;

/// Index of a value inside its [`ParserDefinition`](crate::ParserDefinition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueId(pub(crate) usize);

/// Outcome of an assignment that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assigned {
    /// The token reached the target.
    Stored,
    /// The target type has no conversion; the target was left untouched.
    Unsupported,
}

/// Errors raised while assigning a token.
#[derive(Debug, Error)]
pub enum AssignError {
    /// The target rejected the token.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// A custom action returned an error.
    #[error("{0}")]
    Action(anyhow::Error),
}

/// Assignment counters of a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueState {
    assign_count: usize,
    option_assign_count: usize,
    has_errors: bool,
}

impl ValueState {
    /// Assignments through all the options that share this value.
    pub fn assign_count(&self) -> usize {
        self.assign_count
    }

    /// Assignments (including failed attempts) through the current option.
    pub fn option_assign_count(&self) -> usize {
        self.option_assign_count
    }

    /// Sticky failure flag, cleared only when the value is reset.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A stateful wrapper around one bound target.
pub trait Value {
    fn state(&self) -> &ValueState;
    fn state_mut(&mut self) -> &mut ValueState;

    /// Type of the bound target (`()` for values without one).
    fn target_type(&self) -> TypeId;

    /// The bound target, if the value has one.
    fn target_mut(&mut self) -> Option<&mut dyn Any>;

    /// Default action bound at construction time.
    fn assign_default(&mut self, arg: &str) -> Result<Assigned, AssignError>;

    /// Restore the target to its zero value.
    fn reset_target(&mut self);
}

impl<'v> dyn Value + 'v {
    /// Assign `arg`, through `action` when given, else through the default
    /// action.
    ///
    /// Both counters are incremented before the action runs, whatever its
    /// outcome. A failed assignment sets the sticky error flag; the attempt
    /// already counts for the current option, so a flag value is not applied
    /// on top of it.
    pub fn set_value(
        &mut self,
        arg: &str,
        action: Option<&mut AssignAction<'_>>,
        env: &mut Environment<'_>,
    ) -> Result<Assigned, AssignError> {
        let state = self.state_mut();
        state.assign_count += 1;
        state.option_assign_count += 1;

        let outcome = match action {
            Some(action) => action(&mut *self, arg, env)
                .map(|()| Assigned::Stored)
                .map_err(AssignError::Action),
            None => self.assign_default(arg),
        };

        if outcome.is_err() {
            self.state_mut().has_errors = true;
        }
        outcome
    }

    /// Record an argument refused before any action ran (e.g. not one of the
    /// declared choices).
    ///
    /// The attempt still counts for the current option so a flag value is not
    /// applied on top of it, and `assign_count` never falls behind
    /// `option_assign_count`.
    pub fn mark_bad_argument(&mut self) {
        let state = self.state_mut();
        state.option_assign_count += 1;
        state.assign_count = state.assign_count.max(state.option_assign_count);
        state.has_errors = true;
    }

    /// Run the default action for a value nobody assigned.
    pub fn set_default(&mut self, action: &mut DefaultAction<'_>) {
        self.state_mut().assign_count += 1;
        action(&mut *self);
    }

    pub fn on_option_started(&mut self) {
        self.state_mut().option_assign_count = 0;
    }

    /// Zero the counters, clear the error flag and reset the target.
    pub fn reset(&mut self) {
        self.state_mut().reset();
        self.reset_target();
    }

    pub fn assign_count(&self) -> usize {
        self.state().assign_count()
    }

    pub fn option_assign_count(&self) -> usize {
        self.state().option_assign_count()
    }

    pub fn has_errors(&self) -> bool {
        self.state().has_errors()
    }
}

/// Value bound to a typed target.
pub struct ConvertedValue<'a, T: Target> {
    state: ValueState,
    target: &'a mut T,
}

impl<'a, T: Target> ConvertedValue<'a, T> {
    pub fn new(target: &'a mut T) -> Self {
        Self {
            state: ValueState::default(),
            target,
        }
    }
}

impl<T: Target> Value for ConvertedValue<'_, T> {
    fn state(&self) -> &ValueState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ValueState {
        &mut self.state
    }

    fn target_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn target_mut(&mut self) -> Option<&mut dyn Any> {
        Some(&mut *self.target as &mut dyn Any)
    }

    fn assign_default(&mut self, arg: &str) -> Result<Assigned, AssignError> {
        match self.target.assign(arg) {
            Converted::Value(()) => Ok(Assigned::Stored),
            Converted::Invalid(err) => Err(AssignError::Conversion(err)),
            Converted::Unsupported => {
                tracing::warn!(
                    argument = %arg,
                    target = std::any::type_name::<T>(),
                    "Assignment is not implemented"
                );
                Ok(Assigned::Unsupported)
            }
        }
    }

    fn reset_target(&mut self) {
        *self.target = T::default();
    }
}

/// Value without a target; only custom actions have an effect.
#[derive(Debug, Default)]
pub struct VoidValue {
    state: ValueState,
}

impl Value for VoidValue {
    fn state(&self) -> &ValueState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ValueState {
        &mut self.state
    }

    fn target_type(&self) -> TypeId {
        TypeId::of::<()>()
    }

    fn target_mut(&mut self) -> Option<&mut dyn Any> {
        None
    }

    fn assign_default(&mut self, _arg: &str) -> Result<Assigned, AssignError> {
        Ok(Assigned::Stored)
    }

    fn reset_target(&mut self) {}
}

fn boxed_action<'a, F>(action: F) -> AssignAction<'a>
where
    F: FnMut(&mut dyn Value, &str, &mut Environment<'_>) -> anyhow::Result<()> + 'a,
{
    Box::new(action)
}

fn boxed_default<'a, F>(action: F) -> DefaultAction<'a>
where
    F: FnMut(&mut dyn Value) + 'a,
{
    Box::new(action)
}

/// Wrap an action on `&mut T` into an [`AssignAction`].
pub(crate) fn typed_action<'a, T, F>(mut action: F) -> AssignAction<'a>
where
    T: Target,
    F: FnMut(&mut T, &str, &mut Environment<'_>) -> anyhow::Result<()> + 'a,
{
    boxed_action(move |value, arg, env| {
        match value.target_mut().and_then(|target| target.downcast_mut::<T>()) {
            Some(target) => action(target, arg, env),
            None => Ok(()),
        }
    })
}

/// Wrap an action that ignores the target (void options).
pub(crate) fn void_action<'a, F>(mut action: F) -> AssignAction<'a>
where
    F: FnMut(&str, &mut Environment<'_>) -> anyhow::Result<()> + 'a,
{
    boxed_action(move |_value, arg, env| action(arg, env))
}

/// Wrap a default on `&mut T` into a [`DefaultAction`].
pub(crate) fn typed_default<'a, T, F>(mut assign: F) -> DefaultAction<'a>
where
    T: Target,
    F: FnMut(&mut T) + 'a,
{
    boxed_default(move |value| {
        if let Some(target) = value.target_mut().and_then(|target| target.downcast_mut::<T>()) {
            assign(target);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ParseResultBuilder;

    fn with_env<R>(f: impl FnOnce(&mut Environment<'_>) -> R) -> R {
        let mut result = ParseResultBuilder::new();
        let mut env = Environment::new("--test", &mut result);
        f(&mut env)
    }

    #[test]
    fn set_value_counts_and_converts() {
        let mut target = 0i32;
        {
            let mut value = ConvertedValue::new(&mut target);
            let value: &mut dyn Value = &mut value;
            let outcome = with_env(|env| value.set_value("12", None, env)).unwrap();
            assert_eq!(outcome, Assigned::Stored);
            assert_eq!(value.assign_count(), 1);
            assert_eq!(value.option_assign_count(), 1);
            assert!(!value.has_errors());
        }
        assert_eq!(target, 12);
    }

    #[test]
    fn failed_conversion_still_counts_as_assigned() {
        let mut target = 3u8;
        {
            let mut value = ConvertedValue::new(&mut target);
            let value: &mut dyn Value = &mut value;
            let outcome = with_env(|env| value.set_value("nope", None, env));
            assert!(matches!(outcome, Err(AssignError::Conversion(_))));
            assert_eq!(value.assign_count(), 1);
            assert_eq!(value.option_assign_count(), 1);
            assert!(value.has_errors());
        }
        assert_eq!(target, 3);
    }

    #[test]
    fn rejected_argument_counts_both_counters() {
        let mut target = String::new();
        let mut value = ConvertedValue::new(&mut target);
        let value: &mut dyn Value = &mut value;
        value.mark_bad_argument();
        assert_eq!(value.assign_count(), 1);
        assert_eq!(value.option_assign_count(), 1);
        assert!(value.has_errors());

        // A second option sharing the value starts from an earlier total.
        with_env(|env| value.set_value("a", None, env)).unwrap();
        value.on_option_started();
        value.mark_bad_argument();
        assert_eq!(value.assign_count(), 2);
        assert_eq!(value.option_assign_count(), 1);
    }

    #[derive(Debug, Default)]
    struct Opaque;

    impl crate::FromArgument for Opaque {}

    crate::scalar_target!(Opaque);

    #[test]
    fn unsupported_target_is_not_stored() {
        let mut target = Opaque;
        let mut value = ConvertedValue::new(&mut target);
        let value: &mut dyn Value = &mut value;
        let outcome = with_env(|env| value.set_value("anything", None, env));
        assert!(matches!(outcome, Ok(Assigned::Unsupported)));
        assert!(!value.has_errors());
    }

    #[test]
    fn option_start_resets_only_option_counter() {
        let mut target: Vec<u32> = Vec::new();
        let mut value = ConvertedValue::new(&mut target);
        let value: &mut dyn Value = &mut value;
        with_env(|env| value.set_value("1", None, env)).unwrap();
        with_env(|env| value.set_value("2", None, env)).unwrap();
        value.on_option_started();
        assert_eq!(value.assign_count(), 2);
        assert_eq!(value.option_assign_count(), 0);
    }

    #[test]
    fn custom_action_replaces_default_conversion() {
        let mut target = String::new();
        {
            let mut value = ConvertedValue::new(&mut target);
            let value: &mut dyn Value = &mut value;
            let mut action = typed_action::<String, _>(|target, arg, _env| {
                *target = arg.to_uppercase();
                Ok(())
            });
            with_env(|env| value.set_value("shout", Some(&mut action), env)).unwrap();
        }
        assert_eq!(target, "SHOUT");
    }

    #[test]
    fn failing_action_is_reported() {
        let mut target = 0u32;
        let mut value = ConvertedValue::new(&mut target);
        let value: &mut dyn Value = &mut value;
        let mut action =
            typed_action::<u32, _>(|_target, arg, _env| Err(anyhow::anyhow!("rejected {arg}")));
        let outcome = with_env(|env| value.set_value("7", Some(&mut action), env));
        match outcome {
            Err(AssignError::Action(err)) => assert_eq!(err.to_string(), "rejected 7"),
            other => panic!("expected action error, got {other:?}"),
        }
        assert!(value.has_errors());
    }

    #[test]
    fn set_default_counts_without_touching_option_counter() {
        let mut target = 0u16;
        {
            let mut value = ConvertedValue::new(&mut target);
            let value: &mut dyn Value = &mut value;
            let mut default = typed_default::<u16, _>(|target| *target = 8080);
            value.set_default(&mut default);
            assert_eq!(value.assign_count(), 1);
            assert_eq!(value.option_assign_count(), 0);
        }
        assert_eq!(target, 8080);
    }

    #[test]
    fn reset_restores_zero_state() {
        let mut target = vec!["x".to_string()];
        {
            let mut value = ConvertedValue::new(&mut target);
            let value: &mut dyn Value = &mut value;
            value.mark_bad_argument();
            value.reset();
            assert_eq!(value.state(), &ValueState::default());
        }
        assert!(target.is_empty());
    }

    #[test]
    fn void_value_ignores_default_assignment() {
        let mut value = VoidValue::default();
        let value: &mut dyn Value = &mut value;
        let mut seen = Vec::new();
        {
            let mut action = void_action(|arg, _env| {
                seen.push(arg.to_string());
                Ok(())
            });
            with_env(|env| value.set_value("1", Some(&mut action), env)).unwrap();
        }
        with_env(|env| value.set_value("2", None, env)).unwrap();
        assert_eq!(seen, vec!["1".to_string()]);
        assert_eq!(value.assign_count(), 2);
        assert_eq!(value.target_type(), TypeId::of::<()>());
    }
}

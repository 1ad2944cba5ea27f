//! Type-erased registry entries.
//!
//! `Flag<T>` and `Positional<T>` are generic over their value type; the
//! dispatcher stores them behind the [`FlagEntry`] / [`PositionalEntry`]
//! trait objects so flags of arbitrarily different types can live in one
//! homogeneous map. The concrete type is recovered only at the typed
//! accessor boundary, through `as_any`.

use std::any::Any;

use crate::error::Result;
use crate::flag::Flag;
use crate::positional::Positional;
use crate::value::Value;

/// Behavior the dispatcher needs from a flag, independent of its value type.
pub(crate) trait FlagEntry {
    fn set_from_token(&mut self, token: &str) -> Result<()>;
    fn has_value(&self) -> bool;
    fn is_required(&self) -> bool;
    /// Whether the underlying type is boolean. Decides if a following bare
    /// token is this flag's value or the next argument.
    fn is_boolean(&self) -> bool;
    fn long_name(&self) -> &str;
    fn short_name(&self) -> Option<&str>;
    fn description(&self) -> &str;
    fn long_description(&self) -> Option<&str>;
    /// Current value rendered as text, for display purposes.
    fn value_display(&self) -> Option<String>;
    /// Restore the value slot to its declared default.
    fn reset(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Value> FlagEntry for Flag<T> {
    fn set_from_token(&mut self, token: &str) -> Result<()> {
        Flag::set_from_token(self, token)
    }

    fn has_value(&self) -> bool {
        Flag::has_value(self)
    }

    fn is_required(&self) -> bool {
        Flag::is_required(self)
    }

    fn is_boolean(&self) -> bool {
        T::IS_BOOLEAN
    }

    fn long_name(&self) -> &str {
        self.get_long_name()
    }

    fn short_name(&self) -> Option<&str> {
        self.get_short_name()
    }

    fn description(&self) -> &str {
        self.get_description()
    }

    fn long_description(&self) -> Option<&str> {
        self.get_long_description()
    }

    fn value_display(&self) -> Option<String> {
        self.value().map(|v| v.to_string())
    }

    fn reset(&mut self) {
        Flag::reset(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behavior the dispatcher needs from a positional, independent of its
/// value type.
pub(crate) trait PositionalEntry {
    fn set_from_token(&mut self, token: &str) -> Result<()>;
    fn has_value(&self) -> bool;
    fn is_required(&self) -> bool;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn value_display(&self) -> Option<String>;
    fn reset(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Value> PositionalEntry for Positional<T> {
    fn set_from_token(&mut self, token: &str) -> Result<()> {
        Positional::set_from_token(self, token)
    }

    fn has_value(&self) -> bool {
        Positional::has_value(self)
    }

    fn is_required(&self) -> bool {
        Positional::is_required(self)
    }

    fn name(&self) -> &str {
        self.get_name()
    }

    fn description(&self) -> &str {
        self.get_description()
    }

    fn value_display(&self) -> Option<String> {
        self.value().map(|v| v.to_string())
    }

    fn reset(&mut self) {
        Positional::reset(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

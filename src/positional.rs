//! Typed positional descriptor. Positionals are matched strictly in
//! declaration order and carry no defaults or choice sets.

use crate::error::Result;
use crate::flag::Validator;
use crate::value::Value;

/// A typed positional argument.
///
/// Created through `Parser::add_positional` / `Subcommand::add_positional`.
pub struct Positional<T: Value> {
    name: String,
    description: String,
    required: bool,
    value: Option<T>,
    validator: Option<Validator<T>>,
}

impl<T: Value> Positional<T> {
    pub(crate) fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            value: None,
            validator: None,
        }
    }

    /// Attach a custom validator, run after conversion.
    pub fn validator(&mut self, validate: impl Fn(&T) -> Result<()> + 'static) -> &mut Self {
        self.validator = Some(Box::new(validate));
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Convert a raw token, store the value, then run the validator if
    /// one is configured.
    pub(crate) fn set_from_token(&mut self, token: &str) -> Result<()> {
        let converted = T::from_token(token)?;
        let validated = match &self.validator {
            Some(validate) => validate(&converted),
            None => Ok(()),
        };
        self.value = Some(converted);
        validated
    }

    /// Clear the value slot.
    pub(crate) fn reset(&mut self) {
        self.value = None;
    }
}

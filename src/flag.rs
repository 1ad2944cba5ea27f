//! Typed flag descriptor: declared schema plus current value for one flag.

use crate::error::{Error, Result};
use crate::value::Value;

/// Custom validation predicate for a typed value.
///
/// Return `Ok(())` to accept. Validators author their own rejection
/// messages; [`Error::validation_failed`] is the conventional factory.
pub type Validator<T> = Box<dyn Fn(&T) -> Result<()>>;

/// A typed command-line flag.
///
/// Created through `Parser::add_flag` / `Subcommand::add_flag` and
/// configured fluently:
///
/// ```
/// let mut parser = argot::Parser::new("app", "demo", "1.0.0");
/// parser
///     .add_flag::<i64>("threads", "Worker thread count")
///     .short_name("t")
///     .default_value(4)
///     .validator(|v| {
///         if *v > 0 {
///             Ok(())
///         } else {
///             Err(argot::Error::validation_failed("--threads", "must be positive"))
///         }
///     });
/// ```
pub struct Flag<T: Value> {
    long_name: String,
    short_name: Option<String>,
    description: String,
    long_description: Option<String>,
    required: bool,
    value: Option<T>,
    default: Option<T>,
    choices: Vec<T>,
    validator: Option<Validator<T>>,
}

impl<T: Value> Flag<T> {
    pub(crate) fn new(long_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            long_name: long_name.into(),
            short_name: None,
            description: description.into(),
            long_description: None,
            required: false,
            value: None,
            default: None,
            choices: Vec::new(),
            validator: None,
        }
    }

    // -- Fluent configuration -------------------------------------------

    /// Assign a short alias (without the dash), e.g. `"v"` for `-v`.
    pub fn short_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.short_name = Some(name.into());
        self
    }

    /// Mark the flag as required.
    pub fn required(&mut self) -> &mut Self {
        self.required = true;
        self
    }

    /// Set a default value. The current value is initialized to the
    /// default immediately.
    pub fn default_value(&mut self, value: T) -> &mut Self {
        self.value = Some(value.clone());
        self.default = Some(value);
        self
    }

    /// Restrict acceptable values to a fixed set. An empty set means
    /// unrestricted.
    pub fn choices(&mut self, choices: impl IntoIterator<Item = T>) -> &mut Self {
        self.choices = choices.into_iter().collect();
        self
    }

    /// Attach a custom validator, run after the choice-set check.
    pub fn validator(&mut self, validate: impl Fn(&T) -> Result<()> + 'static) -> &mut Self {
        self.validator = Some(Box::new(validate));
        self
    }

    /// Set a detailed description shown in help output below the summary.
    pub fn long_description(&mut self, text: impl Into<String>) -> &mut Self {
        self.long_description = Some(text.into());
        self
    }

    // -- Accessors -------------------------------------------------------

    pub fn get_long_name(&self) -> &str {
        &self.long_name
    }

    pub fn get_short_name(&self) -> Option<&str> {
        self.short_name.as_deref()
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn get_long_description(&self) -> Option<&str> {
        self.long_description.as_deref()
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

    pub fn default(&self) -> Option<&T> {
        self.default.as_ref()
    }

    pub fn get_choices(&self) -> &[T] {
        &self.choices
    }

    // -- Parse-time operations --------------------------------------------

    /// Convert a raw token, store the value, then validate it.
    ///
    /// Conversion failures propagate untouched. Validation runs the
    /// choice-set check first, then the custom validator.
    pub(crate) fn set_from_token(&mut self, token: &str) -> Result<()> {
        let converted = T::from_token(token)?;
        self.value = Some(converted);
        self.validate()
    }

    /// Validate the current value. A flag with no value set is vacuously
    /// valid; defaults are assumed valid as declared.
    pub(crate) fn validate(&self) -> Result<()> {
        let Some(value) = &self.value else {
            return Ok(());
        };

        if !self.choices.is_empty() && !self.choices.contains(value) {
            return Err(Error::validation_failed(
                &self.long_name,
                "value not in allowed choices",
            ));
        }

        if let Some(validate) = &self.validator {
            return validate(value);
        }

        Ok(())
    }

    /// Restore the value slot to the declared default (or empty).
    pub(crate) fn reset(&mut self) {
        self.value = self.default.clone();
    }
}

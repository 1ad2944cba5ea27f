//! Error taxonomy and the Result alias used by every fallible operation.
//!
//! Errors carry a machine-readable [`ErrorKind`], a human-readable message,
//! and the source location of the call site that produced them. Message
//! wording is centralized in the factory constructors so the same failure
//! is always reported the same way.

use std::fmt;
use std::panic::Location;

use thiserror::Error;

/// Result alias returned by every fallible operation in the crate.
pub type Result<T = ()> = std::result::Result<T, Error>;

/// Error categories produced by parsing and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No error. Sentinel for a default-constructed [`Error`]; never
    /// returned from a fallible operation.
    None,
    /// Token resolves to neither a known long nor short flag name.
    UnknownFlag,
    /// A required flag has no value after a full parse. Also used when a
    /// required subcommand was not selected.
    MissingRequiredFlag,
    /// A required positional has no value after a full parse.
    MissingRequiredPositional,
    /// Raw token failed type conversion.
    InvalidFlagValue,
    /// A positional-shaped token arrived with no declared slot remaining.
    TooManyPositionals,
    /// A flag expected a value but none was given.
    MissingFlagValue,
    /// Choice-set or custom-validator rejection.
    ValidationFailed,
}

/// Structured parse error with kind, message, and call-site provenance.
///
/// Construct through the named factories ([`Error::unknown_flag`] and
/// friends) so message formats stay consistent. [`Error::new`] is the
/// escape hatch for validators that author their own messages.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    location: &'static Location<'static>,
}

impl Default for Error {
    #[track_caller]
    fn default() -> Self {
        Self::new(ErrorKind::None, "")
    }
}

impl PartialEq for Error {
    /// Provenance is diagnostic only; equality compares kind and message.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.message == other.message
    }
}

impl Error {
    /// Create an error with an explicit kind and message.
    #[track_caller]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: Location::caller(),
        }
    }

    /// The error category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Call site that constructed this error.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Message formatted for display. Debug builds append the source
    /// location where the error was constructed.
    pub fn format(&self) -> String {
        if cfg!(debug_assertions) {
            format!(
                "{} [{}:{}]",
                self.message,
                self.location.file(),
                self.location.line()
            )
        } else {
            self.message.clone()
        }
    }

    // -- Factories ------------------------------------------------------

    /// Unknown flag name (e.g. `--bogus`).
    #[track_caller]
    pub fn unknown_flag(flag: impl fmt::Display) -> Self {
        Self::new(ErrorKind::UnknownFlag, format!("Unknown flag: {flag}"))
    }

    /// Required flag was not provided.
    #[track_caller]
    pub fn missing_required_flag(long_name: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::MissingRequiredFlag,
            format!("Required flag missing: --{long_name}"),
        )
    }

    /// Required positional was not provided.
    #[track_caller]
    pub fn missing_required_positional(name: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::MissingRequiredPositional,
            format!("Required positional missing: {name}"),
        )
    }

    /// Invalid value for a known flag.
    #[track_caller]
    pub fn invalid_flag_value(long_name: impl fmt::Display, value: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::InvalidFlagValue,
            format!("Invalid value for --{long_name}: {value}"),
        )
    }

    /// Too many positional arguments were passed.
    #[track_caller]
    pub fn too_many_positionals() -> Self {
        Self::new(ErrorKind::TooManyPositionals, "Too many positional arguments")
    }

    /// A flag expecting a value did not receive one.
    #[track_caller]
    pub fn missing_flag_value(long_name: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::MissingFlagValue,
            format!("Missing value for flag: --{long_name}"),
        )
    }

    /// A validator rejected a value with a reason.
    #[track_caller]
    pub fn validation_failed(name: impl fmt::Display, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::ValidationFailed,
            format!("Validation failed for {name}: {reason}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factories_set_kind_and_message() {
        let err = Error::unknown_flag("--bogus");
        assert_eq!(err.kind(), ErrorKind::UnknownFlag);
        assert_eq!(err.message(), "Unknown flag: --bogus");

        let err = Error::missing_required_flag("output");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredFlag);
        assert_eq!(err.message(), "Required flag missing: --output");

        let err = Error::missing_required_positional("file");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredPositional);
        assert_eq!(err.message(), "Required positional missing: file");

        let err = Error::invalid_flag_value("port", "abc");
        assert_eq!(err.kind(), ErrorKind::InvalidFlagValue);
        assert_eq!(err.message(), "Invalid value for --port: abc");

        let err = Error::too_many_positionals();
        assert_eq!(err.kind(), ErrorKind::TooManyPositionals);

        let err = Error::missing_flag_value("port");
        assert_eq!(err.kind(), ErrorKind::MissingFlagValue);
        assert_eq!(err.message(), "Missing value for flag: --port");

        let err = Error::validation_failed("--format", "value not in allowed choices");
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(
            err.message(),
            "Validation failed for --format: value not in allowed choices"
        );
    }

    #[test]
    fn default_is_the_none_sentinel() {
        let err = Error::default();
        assert_eq!(err.kind(), ErrorKind::None);
        assert_eq!(err.message(), "");
    }

    #[test]
    fn display_is_the_message() {
        let err = Error::too_many_positionals();
        assert_eq!(err.to_string(), "Too many positional arguments");
    }

    #[test]
    fn format_appends_location_in_debug_builds() {
        let err = Error::unknown_flag("-x");
        let formatted = err.format();
        assert!(formatted.starts_with("Unknown flag: -x"));
        if cfg!(debug_assertions) {
            assert!(formatted.contains("error.rs"));
        }
    }

    #[test]
    fn equality_ignores_provenance() {
        let a = Error::unknown_flag("-x");
        let b = Error::unknown_flag("-x");
        assert_eq!(a, b);
        assert_ne!(a, Error::unknown_flag("-y"));
    }

    #[test]
    fn implements_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&Error::too_many_positionals());
    }
}

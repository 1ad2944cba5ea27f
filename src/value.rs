//! Value conversion layer: raw tokens into typed values.
//!
//! Each supported type implements [`Value`]; the rest of the crate is
//! agnostic to the concrete type behind it. Implement [`Value`] for your
//! own types to use them with flags and positionals.

use std::any::Any;
use std::fmt;
use std::num::IntErrorKind;

use crate::error::{Error, ErrorKind, Result};

/// A type that can be parsed from a single command-line token.
///
/// Built-in implementations: `String` (identity), `i64`, `f64`, `bool`.
/// Conversion is strict: the entire token must parse, with no surrounding
/// whitespace tolerance.
pub trait Value: Any + Clone + PartialEq + fmt::Display + 'static {
    /// True for boolean-typed values. The dispatcher uses this to decide
    /// whether a bare token following the flag is its value or the next
    /// argument.
    const IS_BOOLEAN: bool = false;

    /// Convert a raw token into a typed value.
    fn from_token(token: &str) -> Result<Self>;
}

impl Value for String {
    fn from_token(token: &str) -> Result<Self> {
        Ok(token.to_string())
    }
}

impl Value for i64 {
    fn from_token(token: &str) -> Result<Self> {
        token.parse::<i64>().map_err(|err| match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                Error::new(ErrorKind::InvalidFlagValue, "Integer out of range")
            }
            _ => Error::new(ErrorKind::InvalidFlagValue, "Invalid integer format"),
        })
    }
}

impl Value for f64 {
    fn from_token(token: &str) -> Result<Self> {
        let parsed: f64 = token
            .parse()
            .map_err(|_| Error::new(ErrorKind::InvalidFlagValue, "Invalid floating-point format"))?;

        // str::parse saturates overflowing magnitudes to infinity instead
        // of failing; report those as out of range unless infinity was
        // actually spelled out.
        if parsed.is_infinite() && !token.to_ascii_lowercase().contains("inf") {
            return Err(Error::new(
                ErrorKind::InvalidFlagValue,
                "Floating-point out of range",
            ));
        }

        Ok(parsed)
    }
}

impl Value for bool {
    const IS_BOOLEAN: bool = true;

    fn from_token(token: &str) -> Result<Self> {
        match token {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::new(
                ErrorKind::InvalidFlagValue,
                "Invalid boolean value (expected: true/false, 1/0, yes/no, on/off)",
            )),
        }
    }
}

/// True if the token is one of the eight recognized boolean literals.
///
/// Used during flag parsing to decide whether a boolean flag consumes the
/// following token as its value.
pub(crate) fn is_boolean_literal(token: &str) -> bool {
    matches!(
        token,
        "true" | "false" | "1" | "0" | "yes" | "no" | "on" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn string_is_identity() {
        assert_eq!(String::from_token("hello").unwrap(), "hello");
        assert_eq!(String::from_token("").unwrap(), "");
        assert_eq!(String::from_token("--flag").unwrap(), "--flag");
    }

    #[test]
    fn integer_parses_whole_token() {
        assert_eq!(i64::from_token("8080").unwrap(), 8080);
        assert_eq!(i64::from_token("-42").unwrap(), -42);
        assert_eq!(i64::from_token("0").unwrap(), 0);
    }

    #[rstest]
    #[case("12abc")]
    #[case("abc")]
    #[case(" 12")]
    #[case("12 ")]
    #[case("")]
    #[case("1.5")]
    fn integer_rejects_malformed(#[case] token: &str) {
        let err = i64::from_token(token).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFlagValue);
        assert_eq!(err.message(), "Invalid integer format");
    }

    #[test]
    fn integer_overflow_has_distinct_message() {
        let err = i64::from_token("99999999999999999999999").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFlagValue);
        assert_eq!(err.message(), "Integer out of range");

        let err = i64::from_token("-99999999999999999999999").unwrap_err();
        assert_eq!(err.message(), "Integer out of range");
    }

    #[test]
    fn float_parses_whole_token() {
        assert_eq!(f64::from_token("3.25").unwrap(), 3.25);
        assert_eq!(f64::from_token("-0.5").unwrap(), -0.5);
        assert_eq!(f64::from_token("10").unwrap(), 10.0);
    }

    #[test]
    fn float_accepts_scientific_notation() {
        assert_eq!(f64::from_token("1e3").unwrap(), 1000.0);
        assert_eq!(f64::from_token("2.5E-2").unwrap(), 0.025);
    }

    #[rstest]
    #[case("1.5x")]
    #[case("x1.5")]
    #[case(" 1.5")]
    #[case("")]
    fn float_rejects_malformed(#[case] token: &str) {
        let err = f64::from_token(token).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFlagValue);
        assert_eq!(err.message(), "Invalid floating-point format");
    }

    #[test]
    fn float_overflow_has_distinct_message() {
        let err = f64::from_token("1e999").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFlagValue);
        assert_eq!(err.message(), "Floating-point out of range");
    }

    #[test]
    fn float_explicit_infinity_is_accepted() {
        assert!(f64::from_token("inf").unwrap().is_infinite());
    }

    #[rstest]
    #[case("true", true)]
    #[case("1", true)]
    #[case("yes", true)]
    #[case("on", true)]
    #[case("false", false)]
    #[case("0", false)]
    #[case("no", false)]
    #[case("off", false)]
    fn boolean_accepts_all_literal_forms(#[case] token: &str, #[case] expected: bool) {
        assert_eq!(bool::from_token(token).unwrap(), expected);
    }

    #[rstest]
    #[case("True")]
    #[case("YES")]
    #[case("y")]
    #[case("2")]
    #[case("")]
    fn boolean_is_case_sensitive_and_closed(#[case] token: &str) {
        let err = bool::from_token(token).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFlagValue);
        assert!(err.message().contains("true/false, 1/0, yes/no, on/off"));
    }

    #[test]
    fn boolean_literal_detection_matches_converter() {
        for token in ["true", "false", "1", "0", "yes", "no", "on", "off"] {
            assert!(is_boolean_literal(token));
            assert!(bool::from_token(token).is_ok());
        }
        assert!(!is_boolean_literal("file.txt"));
        assert!(!is_boolean_literal("True"));
    }

    #[test]
    fn round_trip_preserves_value() {
        // Display then re-parse yields an equal value for each built-in type.
        let n = i64::from_token("8080").unwrap();
        assert_eq!(i64::from_token(&n.to_string()).unwrap(), n);

        let f = f64::from_token("2.5").unwrap();
        assert_eq!(f64::from_token(&f.to_string()).unwrap(), f);

        let b = bool::from_token("yes").unwrap();
        assert_eq!(bool::from_token(&b.to_string()).unwrap(), b);

        let s = String::from_token("as-is").unwrap();
        assert_eq!(String::from_token(&s).unwrap(), s);
    }

    #[test]
    fn custom_value_types_plug_in() {
        #[derive(Debug, Clone, PartialEq)]
        struct Port(u16);

        impl fmt::Display for Port {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Value for Port {
            fn from_token(token: &str) -> Result<Self> {
                token
                    .parse::<u16>()
                    .map(Port)
                    .map_err(|_| Error::new(ErrorKind::InvalidFlagValue, "Invalid port"))
            }
        }

        assert_eq!(Port::from_token("8080").unwrap(), Port(8080));
        assert!(Port::from_token("70000").is_err());
    }
}

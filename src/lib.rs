//! argot -- declarative command-line argument parsing.
//!
//! Declare flags, positionals, and nested subcommands on a [`Parser`],
//! hand it the argument list, and read typed values back out. The library
//! never prints or terminates the process on its own: parsing returns a
//! [`Result`] and the caller decides what a failure means.
//!
//! ```
//! let mut parser = argot::Parser::new("serve", "Tiny file server", "0.3.0");
//! parser
//!     .add_flag::<i64>("port", "Listen port")
//!     .short_name("p")
//!     .default_value(8080);
//! parser
//!     .add_flag::<String>("format", "Log format")
//!     .choices(["plain".to_string(), "json".to_string()]);
//! parser.add_positional::<String>("root", "Directory to serve", true);
//! parser.add_help_flag();
//!
//! parser.parse_from(["-p", "9000", "public"]).unwrap();
//! assert_eq!(parser.get::<i64>("port"), Some(9000));
//! assert_eq!(parser.get_positional::<String>(0).as_deref(), Some("public"));
//! ```
//!
//! Flag values of any type can coexist because the parser stores
//! descriptors behind a type-erased registry; implement [`Value`] for your
//! own types to parse them directly from tokens.

mod error;
mod flag;
mod help;
mod parser;
mod positional;
mod registry;
mod subcommand;
mod value;

pub use error::{Error, ErrorKind, Result};
pub use flag::{Flag, Validator};
pub use help::Palette;
pub use parser::Parser;
pub use positional::Positional;
pub use subcommand::Subcommand;
pub use value::Value;

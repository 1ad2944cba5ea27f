//! Top-level dispatcher: owns the schema for one command level, walks the
//! token sequence, and routes each token to a flag, a positional, or a
//! nested subcommand.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, ErrorKind, Result};
use crate::flag::Flag;
use crate::help::{self, Example, Palette};
use crate::positional::Positional;
use crate::registry::{FlagEntry, PositionalEntry};
use crate::subcommand::{Scan, Subcommand};
use crate::value::{is_boolean_literal, Value};

/// Command-line parser for one application.
///
/// Declare flags, positionals, and subcommands up front, then call
/// [`Parser::parse`] (process arguments) or [`Parser::parse_from`] (any
/// token sequence). Parsing never prints or exits; every failure comes
/// back as an [`Error`] for the caller to act on.
///
/// ```
/// let mut parser = argot::Parser::new("myapp", "A sample application", "1.0.0");
/// parser.add_flag::<i64>("port", "Listen port").short_name("p");
/// parser.add_help_flag();
///
/// parser.parse_from(["-p", "8080"]).unwrap();
/// assert_eq!(parser.get::<i64>("port"), Some(8080));
/// ```
pub struct Parser {
    pub(crate) app_name: String,
    pub(crate) description: String,
    pub(crate) version: String,
    pub(crate) flags: BTreeMap<String, Box<dyn FlagEntry>>,
    short_index: HashMap<String, String>,
    pub(crate) positionals: Vec<Box<dyn PositionalEntry>>,
    pub(crate) subcommands: BTreeMap<String, Subcommand>,
    pub(crate) examples: Vec<Example>,
    selected_subcommand: Option<String>,
    pub(crate) required_subcommands: i32,
    parsed: bool,
    help_requested: bool,
    version_requested: bool,
}

impl Parser {
    /// Create a parser for an application. `version` may be empty.
    pub fn new(
        app_name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            description: description.into(),
            version: version.into(),
            flags: BTreeMap::new(),
            short_index: HashMap::new(),
            positionals: Vec::new(),
            subcommands: BTreeMap::new(),
            examples: Vec::new(),
            selected_subcommand: None,
            required_subcommands: 0,
            parsed: false,
            help_requested: false,
            version_requested: false,
        }
    }

    // -- Declaration ------------------------------------------------------

    /// Declare a typed flag. Declaring the same long name twice replaces
    /// the earlier declaration.
    pub fn add_flag<T: Value>(
        &mut self,
        long_name: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Flag<T> {
        let long_name = long_name.into();
        self.flags.insert(
            long_name.clone(),
            Box::new(Flag::<T>::new(long_name.clone(), description)),
        );
        self.flags
            .get_mut(&long_name)
            .and_then(|entry| entry.as_any_mut().downcast_mut())
            .expect("flag was just inserted")
    }

    /// Declare a typed positional. Positionals match in declaration order.
    pub fn add_positional<T: Value>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> &mut Positional<T> {
        self.positionals
            .push(Box::new(Positional::<T>::new(name, description, required)));
        self.positionals
            .last_mut()
            .and_then(|entry| entry.as_any_mut().downcast_mut())
            .expect("positional was just inserted")
    }

    /// Declare a subcommand.
    pub fn add_subcommand(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Subcommand {
        let name = name.into();
        let chain = format!("{} {}", self.app_name, name);
        self.subcommands
            .insert(name.clone(), Subcommand::new(name.clone(), description, chain));
        self.subcommands
            .get_mut(&name)
            .expect("subcommand was just inserted")
    }

    /// Register the standard boolean help flag (`--help`, `-h`).
    pub fn add_help_flag(&mut self) -> &mut Self {
        self.add_flag::<bool>("help", "Display this help message")
            .short_name("h");
        self
    }

    /// Register the standard boolean version flag (`--version`, `-V`).
    pub fn add_version_flag(&mut self) -> &mut Self {
        self.add_flag::<bool>("version", "Display version information")
            .short_name("V");
        self
    }

    /// Add a usage example rendered in help output.
    pub fn add_example(
        &mut self,
        description: impl Into<String>,
        command: impl Into<String>,
    ) -> &mut Self {
        self.examples.push(Example {
            description: description.into(),
            command: command.into(),
        });
        self
    }

    /// Require subcommand selection: `-1` means exactly one subcommand
    /// must be selected, `0` (default) makes them optional.
    pub fn require_subcommand(&mut self, count: i32) -> &mut Self {
        self.required_subcommands = count;
        self
    }

    // -- Parsing ----------------------------------------------------------

    /// Parse the process argument list (the program path is discarded).
    pub fn parse(&mut self) -> Result<()> {
        self.parse_from(std::env::args().skip(1))
    }

    /// Parse an already-split token sequence.
    ///
    /// All state from a previous parse is reset first: flag values return
    /// to their defaults, positionals clear, and the subcommand tree is
    /// reset recursively.
    pub fn parse_from<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();

        self.reset();
        self.rebuild_short_index();

        let mut pos_index = 0;
        let mut after_double_dash = false;
        let mut deferred_child: Option<String> = None;
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];

            if arg == "--" {
                after_double_dash = true;
                i += 1;
                continue;
            }

            if !after_double_dash
                && !arg.is_empty()
                && !arg.starts_with('-')
                && self.subcommands.contains_key(arg.as_str())
            {
                let name = arg.clone();
                self.selected_subcommand = Some(name.clone());

                let child = self
                    .subcommands
                    .get_mut(&name)
                    .expect("selected subcommand exists");
                let scan = child.parse_tokens(&args, i + 1)?;
                child.parsed = true;

                if child.help_requested {
                    self.help_requested = true;
                    self.parsed = true;
                    return Ok(());
                }

                match scan {
                    Scan::Deferred(next) => {
                        deferred_child = Some(name);
                        i = next;
                        continue;
                    }
                    Scan::Complete(_) => {
                        let child = self
                            .subcommands
                            .get_mut(&name)
                            .expect("selected subcommand exists");
                        child.validate_requirements()?;
                        self.parsed = true;
                        child.invoke_callback();
                        return Ok(());
                    }
                }
            }

            if after_double_dash || arg.is_empty() || !arg.starts_with('-') {
                if pos_index >= self.positionals.len() {
                    return Err(Error::too_many_positionals());
                }
                self.positionals[pos_index].set_from_token(arg)?;
                pos_index += 1;
                i += 1;
                continue;
            }

            i = self.scan_flag(&args, i)?;
        }

        self.parsed = true;

        // Help and version short-circuit requirement validation.
        if self.help_requested || self.version_requested {
            return Ok(());
        }

        if self.required_subcommands == -1 && self.selected_subcommand.is_none() {
            return Err(Error::new(
                ErrorKind::MissingRequiredFlag,
                "A subcommand is required",
            ));
        }

        if let Some(name) = deferred_child {
            let child = self
                .subcommands
                .get_mut(&name)
                .expect("selected subcommand exists");
            child.validate_requirements()?;
            child.invoke_callback();
        }

        self.validate_requirements()
    }

    /// Resolve one flag-shaped token, consume its value, and set it.
    /// Returns the index of the next unprocessed token.
    fn scan_flag(&mut self, args: &[String], mut i: usize) -> Result<usize> {
        let arg = &args[i];
        let mut value: Option<String> = None;

        let long_name = if let Some(rest) = arg.strip_prefix("--") {
            match rest.split_once('=') {
                Some((name, inline)) => {
                    value = Some(inline.to_string());
                    name.to_string()
                }
                None => rest.to_string(),
            }
        } else {
            match self.short_index.get(&arg[1..]) {
                Some(long_name) => long_name.clone(),
                None => return Err(Error::unknown_flag(arg)),
            }
        };

        if long_name == "help" {
            self.help_requested = true;
        }
        if long_name == "version" {
            self.version_requested = true;
        }

        let Some(entry) = self.flags.get_mut(&long_name) else {
            return Err(Error::unknown_flag(arg));
        };

        let is_boolean = entry.is_boolean();

        if value.is_none() && i + 1 < args.len() && !args[i + 1].starts_with('-') {
            if !is_boolean {
                i += 1;
                value = Some(args[i].clone());
            } else if is_boolean_literal(&args[i + 1]) {
                // Boolean flags only swallow the next token when it is an
                // actual boolean literal; anything else stays in the
                // stream (e.g. a positional).
                i += 1;
                value = Some(args[i].clone());
            }
        }

        if value.is_none() && is_boolean {
            value = Some("true".to_string());
        }

        let Some(value) = value else {
            return Err(Error::missing_flag_value(&long_name));
        };

        entry.set_from_token(&value)?;
        Ok(i + 1)
    }

    fn rebuild_short_index(&mut self) {
        self.short_index.clear();
        for (long_name, entry) in &self.flags {
            if let Some(short) = entry.short_name() {
                self.short_index
                    .insert(short.to_string(), long_name.clone());
            }
        }
    }

    /// Clear all parse state, recursively through the subcommand tree.
    fn reset(&mut self) {
        for entry in self.flags.values_mut() {
            entry.reset();
        }
        for entry in &mut self.positionals {
            entry.reset();
        }
        for child in self.subcommands.values_mut() {
            child.reset();
        }
        self.selected_subcommand = None;
        self.parsed = false;
        self.help_requested = false;
        self.version_requested = false;
    }

    /// Check that every required flag and positional received a value.
    fn validate_requirements(&self) -> Result<()> {
        for (long_name, entry) in &self.flags {
            if entry.is_required() && !entry.has_value() {
                return Err(Error::missing_required_flag(long_name));
            }
        }

        for entry in &self.positionals {
            if entry.is_required() && !entry.has_value() {
                return Err(Error::missing_required_positional(entry.name()));
            }
        }

        Ok(())
    }

    // -- Queries ----------------------------------------------------------

    /// Flag value by long name. `None` when absent or the type does not
    /// match the declaration.
    pub fn get<T: Value>(&self, long_name: &str) -> Option<T> {
        let entry = self.flags.get(long_name)?;
        if !entry.has_value() {
            return None;
        }
        let flag = entry.as_any().downcast_ref::<Flag<T>>()?;
        flag.value().cloned()
    }

    /// True if the flag has a value (set on the command line or by default).
    pub fn has(&self, long_name: &str) -> bool {
        self.flags
            .get(long_name)
            .is_some_and(|entry| entry.has_value())
    }

    /// Positional value by zero-based declaration index.
    pub fn get_positional<T: Value>(&self, index: usize) -> Option<T> {
        let entry = self.positionals.get(index)?;
        let pos = entry.as_any().downcast_ref::<Positional<T>>()?;
        pos.value().cloned()
    }

    /// Positional value by declared name.
    pub fn get_positional_named<T: Value>(&self, name: &str) -> Option<T> {
        let entry = self.positionals.iter().find(|entry| entry.name() == name)?;
        let pos = entry.as_any().downcast_ref::<Positional<T>>()?;
        pos.value().cloned()
    }

    /// Name of the subcommand selected during the last parse.
    pub fn selected_subcommand(&self) -> Option<&str> {
        self.selected_subcommand.as_deref()
    }

    /// Access a subcommand by name.
    pub fn subcommand(&self, name: &str) -> Option<&Subcommand> {
        self.subcommands.get(name)
    }

    /// Mutable access to a subcommand by name.
    pub fn subcommand_mut(&mut self, name: &str) -> Option<&mut Subcommand> {
        self.subcommands.get_mut(name)
    }

    /// True once a parse has completed successfully.
    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// True if a flag named `help` was recognized during the last parse.
    pub fn help_requested(&self) -> bool {
        self.help_requested
    }

    /// True if a flag named `version` was recognized during the last parse.
    pub fn version_requested(&self) -> bool {
        self.version_requested
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    // -- Help and version -------------------------------------------------

    /// Plain-text help for this parser's schema.
    pub fn generate_help(&self) -> String {
        help::render_parser_help(self, &Palette::plain())
    }

    /// Help text with an explicit color palette.
    pub fn generate_help_with(&self, palette: &Palette) -> String {
        help::render_parser_help(self, palette)
    }

    /// Print help to stdout, colored when stdout is a terminal.
    pub fn print_help(&self) {
        print!("{}", self.generate_help_with(&Palette::auto()));
    }

    /// Version line, e.g. `"myapp v1.0.0"`.
    pub fn generate_version(&self) -> String {
        help::render_version(self, &Palette::plain())
    }

    /// Print the version line to stdout, colored when stdout is a terminal.
    pub fn print_version(&self) {
        print!("{}", help::render_version(self, &Palette::auto()));
    }
}

//! Nested subcommand scope: the recursive twin of the top-level parser.
//!
//! A subcommand owns its own flag/positional registries and child
//! subcommands, and parses the tail of the token sequence handed to it by
//! its parent. A subcommand marked *fallthrough* defers tokens it does not
//! recognize back to the parent scope instead of erroring.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, ErrorKind, Result};
use crate::flag::Flag;
use crate::help::{self, Example, Palette};
use crate::positional::Positional;
use crate::registry::{FlagEntry, PositionalEntry};
use crate::value::{is_boolean_literal, Value};

/// Where a subcommand's scan stopped.
#[derive(Debug)]
pub(crate) enum Scan {
    /// All tokens in scope were consumed (or a nested child finished);
    /// holds the index of the first unconsumed token.
    Complete(usize),
    /// A fallthrough scope hit a token it does not recognize; the parent
    /// resolves the token at this index against its own schema.
    Deferred(usize),
}

/// Outcome of resolving one flag-shaped token.
enum FlagScan {
    Consumed(usize),
    Deferred,
}

/// A named command scope nested under a [`crate::Parser`] or another
/// `Subcommand`.
pub struct Subcommand {
    name: String,
    description: String,
    /// Full command chain ("app sub subsub"), accumulated at construction
    /// time. Used only for help rendering.
    chain: String,
    pub(crate) flags: BTreeMap<String, Box<dyn FlagEntry>>,
    short_index: HashMap<String, String>,
    pub(crate) positionals: Vec<Box<dyn PositionalEntry>>,
    pub(crate) subcommands: BTreeMap<String, Subcommand>,
    pub(crate) examples: Vec<Example>,
    selected_subcommand: Option<String>,
    callback: Option<Box<dyn FnMut()>>,
    pub(crate) required_subcommands: i32,
    pub(crate) parsed: bool,
    pub(crate) help_requested: bool,
    fallthrough: bool,
}

impl Subcommand {
    pub(crate) fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        chain: String,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            chain,
            flags: BTreeMap::new(),
            short_index: HashMap::new(),
            positionals: Vec::new(),
            subcommands: BTreeMap::new(),
            examples: Vec::new(),
            selected_subcommand: None,
            callback: None,
            required_subcommands: 0,
            parsed: false,
            help_requested: false,
            fallthrough: false,
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

    /// Declare a nested subcommand.
    pub fn add_subcommand(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Subcommand {
        let name = name.into();
        let chain = format!("{} {}", self.chain, name);
        self.subcommands
            .insert(name.clone(), Subcommand::new(name.clone(), description, chain));
        self.subcommands
            .get_mut(&name)
            .expect("subcommand was just inserted")
    }

    /// Register the standard boolean help flag (`--help`, `-h`).
    pub fn add_help_flag(&mut self) -> &mut Self {
        self.add_flag::<bool>("help", "Display help for this subcommand")
            .short_name("h");
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

    /// Set a callback invoked after this subcommand is selected and passes
    /// requirement validation.
    pub fn set_callback(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Defer unknown flags to the parent scope instead of erroring.
    pub fn set_fallthrough(&mut self, allow: bool) -> &mut Self {
        self.fallthrough = allow;
        self
    }

    /// Require subcommand selection: `-1` means exactly one nested
    /// subcommand must be selected, `0` (default) makes them optional.
    pub fn require_subcommand(&mut self, count: i32) -> &mut Self {
        self.required_subcommands = count;
        self
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

    /// Name of the nested subcommand selected during the last parse.
    pub fn selected_subcommand(&self) -> Option<&str> {
        self.selected_subcommand.as_deref()
    }

    /// Access a nested subcommand by name.
    pub fn subcommand(&self, name: &str) -> Option<&Subcommand> {
        self.subcommands.get(name)
    }

    /// Mutable access to a nested subcommand by name.
    pub fn subcommand_mut(&mut self, name: &str) -> Option<&mut Subcommand> {
        self.subcommands.get_mut(name)
    }

    /// True if this subcommand was selected during parsing.
    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// True if a flag named `help` was recognized in this scope or any
    /// nested scope.
    pub fn help_requested(&self) -> bool {
        self.help_requested
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    // -- Help -------------------------------------------------------------

    /// Help text for this subcommand. With `full_chain` the title shows the
    /// complete command path ("app sub subsub").
    pub fn generate_help(&self, full_chain: bool) -> String {
        help::render_subcommand_help(self, full_chain, &Palette::plain())
    }

    /// Help text with an explicit color palette.
    pub fn generate_help_with(&self, full_chain: bool, palette: &Palette) -> String {
        help::render_subcommand_help(self, full_chain, palette)
    }

    /// Print help to stdout, colored when stdout is a terminal.
    pub fn print_help(&self, full_chain: bool) {
        print!("{}", self.generate_help_with(full_chain, &Palette::auto()));
    }

    pub(crate) fn command_chain(&self) -> &str {
        &self.chain
    }

    // -- Parsing ----------------------------------------------------------

    /// Clear all parse state, recursively. Flag values return to their
    /// defaults; positional values clear.
    pub(crate) fn reset(&mut self) {
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

    /// Parse this scope's share of the token sequence, starting at
    /// `start`. Requirement validation is the caller's job; this only
    /// routes tokens.
    pub(crate) fn parse_tokens(&mut self, args: &[String], start: usize) -> Result<Scan> {
        self.rebuild_short_index();

        let mut pos_index = 0;
        let mut after_double_dash = false;
        let mut deferred_child: Option<String> = None;
        let mut i = start;

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
                let scan = child.parse_tokens(args, i + 1)?;
                child.parsed = true;

                if child.help_requested {
                    // Help short-circuits validation at every level.
                    self.help_requested = true;
                    let next = match scan {
                        Scan::Complete(n) | Scan::Deferred(n) => n,
                    };
                    return Ok(Scan::Complete(next));
                }

                match scan {
                    Scan::Deferred(next) => {
                        // Child deferred a token to us; resume scanning
                        // here and settle the child's requirements after
                        // our own loop ends.
                        deferred_child = Some(name);
                        i = next;
                        continue;
                    }
                    Scan::Complete(next) => {
                        let child = self
                            .subcommands
                            .get_mut(&name)
                            .expect("selected subcommand exists");
                        child.validate_requirements()?;
                        child.invoke_callback();
                        return Ok(Scan::Complete(next));
                    }
                }
            }

            if after_double_dash || arg.is_empty() || !arg.starts_with('-') {
                if pos_index >= self.positionals.len() {
                    if self.fallthrough {
                        return Ok(Scan::Deferred(i));
                    }
                    return Err(Error::too_many_positionals());
                }
                self.positionals[pos_index].set_from_token(arg)?;
                pos_index += 1;
                i += 1;
                continue;
            }

            match self.scan_flag(args, i)? {
                FlagScan::Consumed(next) => i = next,
                FlagScan::Deferred => return Ok(Scan::Deferred(i)),
            }
        }

        if let Some(name) = deferred_child {
            let child = self
                .subcommands
                .get_mut(&name)
                .expect("selected subcommand exists");
            child.validate_requirements()?;
            child.invoke_callback();
        }

        Ok(Scan::Complete(args.len()))
    }

    /// Resolve one flag-shaped token against this scope's registry.
    fn scan_flag(&mut self, args: &[String], mut i: usize) -> Result<FlagScan> {
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
                None => {
                    if self.fallthrough {
                        return Ok(FlagScan::Deferred);
                    }
                    return Err(Error::unknown_flag(arg));
                }
            }
        };

        if long_name == "help" {
            self.help_requested = true;
        }

        let Some(entry) = self.flags.get_mut(&long_name) else {
            if self.fallthrough {
                return Ok(FlagScan::Deferred);
            }
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
        Ok(FlagScan::Consumed(i + 1))
    }

    /// Check that every required flag and positional received a value,
    /// and that a nested subcommand was selected when one is required.
    pub(crate) fn validate_requirements(&self) -> Result<()> {
        if self.required_subcommands == -1 && self.selected_subcommand.is_none() {
            return Err(Error::new(
                ErrorKind::MissingRequiredFlag,
                "A subcommand is required",
            ));
        }

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

    pub(crate) fn invoke_callback(&mut self) {
        if let Some(callback) = &mut self.callback {
            callback();
        }
    }
}

//! Help and version rendering.
//!
//! Pure string formatting over the dispatcher's declared schema; nothing
//! here influences parsing. Color is an injected capability: callers pass
//! a [`Palette`] instead of the renderer probing the terminal itself.

use std::io::IsTerminal;

use crate::parser::Parser;
use crate::registry::FlagEntry;
use crate::subcommand::Subcommand;

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_RESET: &str = "\x1b[0m";

/// A usage example shown in help output.
pub(crate) struct Example {
    pub(crate) description: String,
    pub(crate) command: String,
}

/// Escape sequences used by the renderer. [`Palette::plain`] disables
/// coloring entirely, which keeps rendering testable without a terminal.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    bold: &'static str,
    green: &'static str,
    reset: &'static str,
}

impl Palette {
    /// No color codes at all.
    pub fn plain() -> Self {
        Self {
            bold: "",
            green: "",
            reset: "",
        }
    }

    /// ANSI bold/green codes.
    pub fn ansi() -> Self {
        Self {
            bold: ANSI_BOLD,
            green: ANSI_GREEN,
            reset: ANSI_RESET,
        }
    }

    /// ANSI codes when stdout is a terminal, plain otherwise.
    pub fn auto() -> Self {
        if std::io::stdout().is_terminal() {
            Self::ansi()
        } else {
            Self::plain()
        }
    }
}

/// `"    -s, --long (required)"` — the flag summary line.
fn flag_line(entry: &dyn FlagEntry) -> String {
    let mut line = String::from("    ");

    match entry.short_name() {
        Some(short) => {
            line.push('-');
            line.push_str(short);
            line.push_str(", ");
        }
        None => line.push_str("    "),
    }

    line.push_str("--");
    line.push_str(entry.long_name());

    if entry.is_required() {
        line.push_str(" (required)");
    }

    line
}

fn options_section<'a>(
    out: &mut String,
    flags: impl Iterator<Item = &'a Box<dyn FlagEntry>>,
) {
    let mut wrote_heading = false;

    for entry in flags {
        if !wrote_heading {
            out.push_str("OPTIONS:\n");
            wrote_heading = true;
        }
        out.push_str(&flag_line(entry.as_ref()));
        out.push('\n');
        if !entry.description().is_empty() {
            out.push_str("        ");
            out.push_str(entry.description());
            out.push('\n');
        }
        if let Some(long_description) = entry.long_description() {
            out.push_str("        ");
            out.push_str(long_description);
            out.push('\n');
        }
    }

    if wrote_heading {
        out.push('\n');
    }
}

fn examples_section(out: &mut String, examples: &[Example], palette: &Palette) {
    if examples.is_empty() {
        return;
    }

    out.push_str("EXAMPLES:\n");
    for example in examples {
        out.push_str("  ");
        out.push_str(&example.description);
        out.push_str("\n    $ ");
        out.push_str(palette.green);
        out.push_str(&example.command);
        out.push_str(palette.reset);
        out.push_str("\n\n");
    }
}

pub(crate) fn render_parser_help(parser: &Parser, palette: &Palette) -> String {
    let mut out = String::new();

    out.push_str(palette.bold);
    out.push_str(&parser.app_name);
    if !parser.version.is_empty() {
        out.push_str(" v");
        out.push_str(&parser.version);
    }
    out.push_str(palette.reset);
    out.push('\n');

    if !parser.description.is_empty() {
        out.push_str(&parser.description);
        out.push('\n');
    }

    out.push_str("\nUSAGE:\n    ");
    out.push_str(&parser.app_name);
    out.push_str(" [OPTIONS]");

    for entry in &parser.positionals {
        if entry.is_required() {
            out.push_str(&format!(" <{}>", entry.name()));
        } else {
            out.push_str(&format!(" [{}]", entry.name()));
        }
    }

    if !parser.subcommands.is_empty() {
        if parser.required_subcommands != 0 {
            out.push_str(" <SUBCOMMAND>");
        } else {
            out.push_str(" [SUBCOMMAND]");
        }
    }

    out.push_str("\n\n");

    options_section(&mut out, parser.flags.values());

    if !parser.subcommands.is_empty() {
        out.push_str("SUBCOMMANDS:\n");
        for (name, sub) in &parser.subcommands {
            out.push_str("    ");
            out.push_str(name);
            if !sub.description().is_empty() {
                out.push_str(" - ");
                out.push_str(sub.description());
            }
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&format!(
            "Use '{} <SUBCOMMAND> --help' for more information on a subcommand.\n\n",
            parser.app_name
        ));
    }

    examples_section(&mut out, &parser.examples, palette);

    out
}

pub(crate) fn render_subcommand_help(
    sub: &Subcommand,
    full_chain: bool,
    palette: &Palette,
) -> String {
    let mut out = String::new();

    let title = if full_chain {
        sub.command_chain()
    } else {
        sub.name()
    };

    out.push_str(palette.bold);
    out.push_str(title);
    out.push_str(palette.reset);
    out.push('\n');

    if !sub.description().is_empty() {
        out.push_str(sub.description());
        out.push('\n');
    }

    out.push_str("\nUSAGE:\n    ");
    out.push_str(sub.name());
    out.push_str(" [OPTIONS]");

    for entry in &sub.positionals {
        if entry.is_required() {
            out.push_str(&format!(" <{}>", entry.name()));
        } else {
            out.push_str(&format!(" [{}]", entry.name()));
        }
    }

    if !sub.subcommands.is_empty() {
        if sub.required_subcommands != 0 {
            out.push_str(" <SUBCOMMAND>");
        } else {
            out.push_str(" [SUBCOMMAND]");
        }
    }

    out.push_str("\n\n");

    options_section(&mut out, sub.flags.values());

    if !sub.subcommands.is_empty() {
        out.push_str("SUBCOMMANDS:\n");
        for (name, nested) in &sub.subcommands {
            out.push_str("    ");
            out.push_str(name);
            if !nested.description().is_empty() {
                out.push_str(" - ");
                out.push_str(nested.description());
            }
            out.push('\n');
        }
        out.push('\n');
    }

    examples_section(&mut out, &sub.examples, palette);

    out
}

pub(crate) fn render_version(parser: &Parser, palette: &Palette) -> String {
    let mut out = String::new();
    out.push_str(palette.bold);
    out.push_str(&parser.app_name);
    if !parser.version.is_empty() {
        out.push_str(" v");
        out.push_str(&parser.version);
    }
    out.push_str(palette.reset);
    out.push('\n');
    out
}

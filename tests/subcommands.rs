//! Subcommand dispatch end to end: selection, nesting, fallthrough,
//! callbacks, and required-subcommand enforcement.

use std::cell::Cell;
use std::rc::Rc;

use argot::{ErrorKind, Parser};

// -- Selection -------------------------------------------------------------

#[test]
fn subcommand_token_hands_off_the_tail() {
    let mut parser = Parser::new("app", "", "");
    parser.add_flag::<bool>("verbose", "Verbose").short_name("v");
    let build = parser.add_subcommand("build", "Build the project");
    build.add_flag::<bool>("release", "Optimized build");
    build.add_positional::<String>("target", "Build target", true);

    parser.parse_from(["-v", "build", "--release", "x86_64"]).unwrap();

    assert_eq!(parser.get::<bool>("verbose"), Some(true));
    assert_eq!(parser.selected_subcommand(), Some("build"));

    let build = parser.subcommand("build").unwrap();
    assert!(build.parsed());
    assert_eq!(build.get::<bool>("release"), Some(true));
    assert_eq!(build.get_positional::<String>(0).as_deref(), Some("x86_64"));
}

#[test]
fn unselected_subcommand_is_not_parsed() {
    let mut parser = Parser::new("app", "", "");
    parser.add_subcommand("build", "");
    parser.add_subcommand("clean", "");

    parser.parse_from(["build"]).unwrap();
    assert!(parser.subcommand("build").unwrap().parsed());
    assert!(!parser.subcommand("clean").unwrap().parsed());
}

#[test]
fn nested_subcommands_dispatch_recursively() {
    let mut parser = Parser::new("app", "", "");
    let remote = parser.add_subcommand("remote", "Manage remotes");
    let add = remote.add_subcommand("add", "Add a remote");
    add.add_positional::<String>("name", "Remote name", true);
    add.add_flag::<String>("url", "Remote URL").required();

    parser
        .parse_from(["remote", "add", "origin", "--url", "https://example.com"])
        .unwrap();

    let add = parser
        .subcommand("remote")
        .and_then(|r| r.subcommand("add"))
        .unwrap();
    assert!(add.parsed());
    assert_eq!(add.get_positional::<String>(0).as_deref(), Some("origin"));
    assert_eq!(
        add.get::<String>("url").as_deref(),
        Some("https://example.com")
    );
}

#[test]
fn subcommand_name_after_double_dash_is_a_positional() {
    let mut parser = Parser::new("app", "", "");
    parser.add_subcommand("build", "");
    parser.add_positional::<String>("arg", "Anything", true);

    parser.parse_from(["--", "build"]).unwrap();

    assert_eq!(parser.selected_subcommand(), None);
    assert!(!parser.subcommand("build").unwrap().parsed());
    assert_eq!(parser.get_positional::<String>(0).as_deref(), Some("build"));
}

#[test]
fn subcommand_name_in_value_position_is_consumed_as_the_value() {
    let mut parser = Parser::new("app", "", "");
    parser.add_flag::<String>("target", "Target name");
    parser.add_subcommand("build", "");

    parser.parse_from(["--target", "build"]).unwrap();

    assert_eq!(parser.get::<String>("target").as_deref(), Some("build"));
    assert_eq!(parser.selected_subcommand(), None);
}

// -- Requirements across levels ----------------------------------------------

#[test]
fn child_requirements_are_enforced() {
    let mut parser = Parser::new("app", "", "");
    parser
        .add_subcommand("deploy", "")
        .add_flag::<String>("env", "Target environment")
        .required();

    let err = parser.parse_from(["deploy"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredFlag);
    assert_eq!(err.message(), "Required flag missing: --env");
}

#[test]
fn completed_subcommand_ends_the_parse() {
    // Once dispatch hands off to a subcommand, the remaining requirements
    // of the outer scope are not checked.
    let mut parser = Parser::new("app", "", "");
    parser.add_flag::<String>("config", "Config path").required();
    parser.add_subcommand("clean", "");

    parser.parse_from(["clean"]).unwrap();
    assert!(parser.parsed());
    assert!(!parser.has("config"));
}

#[test]
fn required_subcommand_missing_is_an_error() {
    let mut parser = Parser::new("app", "", "");
    parser.add_subcommand("build", "");
    parser.require_subcommand(-1);

    let err = parser.parse_from(Vec::<String>::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredFlag);
    assert_eq!(err.message(), "A subcommand is required");
}

#[test]
fn required_subcommand_satisfied_by_selection() {
    let mut parser = Parser::new("app", "", "");
    parser.add_subcommand("build", "");
    parser.require_subcommand(-1);

    parser.parse_from(["build"]).unwrap();
    assert_eq!(parser.selected_subcommand(), Some("build"));
}

// -- Fallthrough ---------------------------------------------------------------

#[test]
fn fallthrough_defers_unknown_flags_to_the_parent() {
    let mut parser = Parser::new("app", "", "");
    parser.add_flag::<bool>("verbose", "Verbose").short_name("v");
    let build = parser.add_subcommand("build", "");
    build.set_fallthrough(true);
    build.add_flag::<bool>("release", "Optimized build");

    parser.parse_from(["build", "--release", "-v"]).unwrap();

    assert_eq!(parser.get::<bool>("verbose"), Some(true));
    let build = parser.subcommand("build").unwrap();
    assert!(build.parsed());
    assert_eq!(build.get::<bool>("release"), Some(true));
}

#[test]
fn fallthrough_defers_excess_positionals_to_the_parent() {
    let mut parser = Parser::new("app", "", "");
    parser.add_positional::<String>("extra", "Spillover", false);
    let run = parser.add_subcommand("run", "");
    run.set_fallthrough(true);
    run.add_positional::<String>("script", "Script path", true);

    parser.parse_from(["run", "main.sh", "spill"]).unwrap();

    let run = parser.subcommand("run").unwrap();
    assert_eq!(run.get_positional::<String>(0).as_deref(), Some("main.sh"));
    assert_eq!(parser.get_positional::<String>(0).as_deref(), Some("spill"));
}

#[test]
fn deferred_token_unknown_to_the_parent_still_errors() {
    let mut parser = Parser::new("app", "", "");
    let build = parser.add_subcommand("build", "");
    build.set_fallthrough(true);

    let err = parser.parse_from(["build", "--bogus"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownFlag);
    assert_eq!(err.message(), "Unknown flag: --bogus");
}

#[test]
fn deferred_subcommand_requirements_are_still_enforced() {
    let mut parser = Parser::new("app", "", "");
    parser.add_flag::<bool>("verbose", "Verbose").short_name("v");
    let build = parser.add_subcommand("build", "");
    build.set_fallthrough(true);
    build.add_flag::<String>("target", "Build target").required();

    let err = parser.parse_from(["build", "-v"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredFlag);
    assert_eq!(err.message(), "Required flag missing: --target");
}

#[test]
fn without_fallthrough_unknown_flags_error_in_the_subcommand() {
    let mut parser = Parser::new("app", "", "");
    parser.add_flag::<bool>("verbose", "Verbose").short_name("v");
    parser.add_subcommand("build", "");

    // Parent declares -v, but the child scope does not fall through.
    let err = parser.parse_from(["build", "-v"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownFlag);
}

// -- Callbacks ------------------------------------------------------------------

#[test]
fn callback_fires_once_after_a_valid_parse() {
    let hits = Rc::new(Cell::new(0));
    let seen = Rc::clone(&hits);

    let mut parser = Parser::new("app", "", "");
    parser
        .add_subcommand("build", "")
        .set_callback(move || seen.set(seen.get() + 1));

    parser.parse_from(["build"]).unwrap();
    assert_eq!(hits.get(), 1);

    parser.parse_from(["build"]).unwrap();
    assert_eq!(hits.get(), 2);
}

#[test]
fn callback_skipped_when_validation_fails() {
    let hits = Rc::new(Cell::new(0));
    let seen = Rc::clone(&hits);

    let mut parser = Parser::new("app", "", "");
    let deploy = parser.add_subcommand("deploy", "");
    deploy.add_flag::<String>("env", "Target environment").required();
    deploy.set_callback(move || seen.set(seen.get() + 1));

    parser.parse_from(["deploy"]).unwrap_err();
    assert_eq!(hits.get(), 0);
}

#[test]
fn deferred_subcommand_callback_runs_after_the_parent_finishes() {
    let hits = Rc::new(Cell::new(0));
    let seen = Rc::clone(&hits);

    let mut parser = Parser::new("app", "", "");
    parser.add_flag::<bool>("verbose", "Verbose").short_name("v");
    let build = parser.add_subcommand("build", "");
    build.set_fallthrough(true);
    build.set_callback(move || seen.set(seen.get() + 1));

    parser.parse_from(["build", "-v"]).unwrap();
    assert_eq!(hits.get(), 1);
}

// -- Help across levels ------------------------------------------------------------

#[test]
fn nested_help_skips_validation_everywhere() {
    let mut parser = Parser::new("app", "", "");
    parser.add_flag::<String>("config", "Config path").required();
    let remote = parser.add_subcommand("remote", "");
    let add = remote.add_subcommand("add", "");
    add.add_help_flag();
    add.add_flag::<String>("url", "Remote URL").required();

    parser.parse_from(["remote", "add", "--help"]).unwrap();

    assert!(parser.help_requested());
    assert!(parser.parsed());
}

#[test]
fn reparse_clears_subcommand_selection() {
    let mut parser = Parser::new("app", "", "");
    parser.add_subcommand("build", "")
        .add_positional::<String>("target", "", false);

    parser.parse_from(["build", "arm64"]).unwrap();
    assert_eq!(parser.selected_subcommand(), Some("build"));

    parser.parse_from(Vec::<String>::new()).unwrap();
    assert_eq!(parser.selected_subcommand(), None);
    let build = parser.subcommand("build").unwrap();
    assert!(!build.parsed());
    assert_eq!(build.get_positional::<String>(0), None);
}

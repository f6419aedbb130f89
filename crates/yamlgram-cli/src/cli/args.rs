//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so the same definition can be reused
//! across commands, hidden (`.hide(true)`) where a command ignores it.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// BNF grammar file (positional, "-" for stdin).
pub fn grammar_path_arg() -> Arg {
    Arg::new("grammar_path")
        .value_name("GRAMMAR")
        .value_parser(value_parser!(PathBuf))
        .help("BNF grammar file (\"-\" for stdin)")
}

/// Fix-up grammar files layered over the base (-p/--patch, repeatable).
pub fn patch_arg() -> Arg {
    Arg::new("patch")
        .short('p')
        .long("patch")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .action(ArgAction::Append)
        .help("Grammar fragment overriding same-named productions (repeatable, later wins)")
}

/// Use the built-in meta-grammar as the base (--meta).
pub fn meta_arg() -> Arg {
    Arg::new("meta")
        .long("meta")
        .action(ArgAction::SetTrue)
        .help("Use the built-in BNF meta-grammar as the base grammar")
}

/// Input file to parse (positional).
pub fn source_path_arg() -> Arg {
    Arg::new("source_path")
        .value_name("SOURCE")
        .value_parser(value_parser!(PathBuf))
        .help("Input file to parse (\"-\" for stdin)")
}

/// Inline input text (-s/--source).
pub fn source_text_arg() -> Arg {
    Arg::new("source_text")
        .short('s')
        .long("source")
        .value_name("TEXT")
        .help("Inline input text")
}

/// Root production (-r/--root).
pub fn root_arg() -> Arg {
    Arg::new("root")
        .short('r')
        .long("root")
        .value_name("NAME")
        .help("Production to parse the whole input as (default: the first one)")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Show byte ranges (--spans).
pub fn spans_arg() -> Arg {
    Arg::new("spans")
        .long("spans")
        .action(ArgAction::SetTrue)
        .help("Show byte ranges")
}

/// Show bound parameters (--params).
pub fn params_arg() -> Arg {
    Arg::new("params")
        .long("params")
        .action(ArgAction::SetTrue)
        .help("Show the parameters each production was invoked with")
}

/// JSON parse tree (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print the parse tree as JSON")
}

/// Grammar output format (--format).
pub fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .value_name("FORMAT")
        .default_value("bnf")
        .value_parser(["bnf", "json"])
        .help("Output format")
}

/// Treat undefined references as errors (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Treat undefined references as errors")
}

/// Disable the failure cache (--no-cache).
pub fn no_cache_arg() -> Arg {
    Arg::new("no_cache")
        .long("no-cache")
        .action(ArgAction::SetTrue)
        .help("Do not remember failed production calls")
}

/// Recursion limit (--recursion-limit).
pub fn recursion_limit_arg() -> Arg {
    Arg::new("recursion_limit")
        .long("recursion-limit")
        .value_name("N")
        .value_parser(value_parser!(u32))
        .help("Maximum nesting of production calls [default: 1024]")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v for verbose, -vv for very verbose)")
}

/// Skip the tree after the trace (--no-result).
pub fn no_result_arg() -> Arg {
    Arg::new("no_result")
        .long("no-result")
        .action(ArgAction::SetTrue)
        .help("Print the trace only, not the parse tree")
}

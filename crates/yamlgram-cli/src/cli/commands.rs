//! Command builders for the CLI.
//!
//! Each command is built from the shared arg builders in `args.rs`.
//! `parse` and `trace` accept each other's flags, with the ones they
//! ignore hidden from `--help`.

use clap::Command;

use super::args::*;

/// Grammar selection shared by every command.
fn with_grammar_args(cmd: Command) -> Command {
    cmd.arg(grammar_path_arg())
        .arg(patch_arg())
        .arg(meta_arg())
}

/// Interpreter options shared by `parse` and `trace`.
fn with_run_args(cmd: Command) -> Command {
    cmd.arg(source_path_arg())
        .arg(source_text_arg())
        .arg(root_arg())
        .arg(no_cache_arg())
        .arg(recursion_limit_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("yamlgram")
        .about("Compile BNF grammars and run them against text")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(check_command())
        .subcommand(dump_command())
        .subcommand(parse_command())
        .subcommand(trace_command())
}

/// Compile a grammar and report problems.
pub fn check_command() -> Command {
    let cmd = Command::new("check")
        .about("Compile a grammar and report undefined references")
        .override_usage(
            "\
  yamlgram check <GRAMMAR> [-p <FILE>]...
  yamlgram check --meta -p <FILE>",
        )
        .after_help(
            r#"EXAMPLES:
  yamlgram check yaml.bnf                   # compile, warn on undefined references
  yamlgram check yaml.bnf -p fixups.bnf     # with a fix-up fragment
  yamlgram check yaml.bnf --strict          # undefined references are errors"#,
        )
        .arg(strict_arg())
        .arg(color_arg());

    with_grammar_args(cmd)
}

/// Print the compiled grammar.
pub fn dump_command() -> Command {
    let cmd = Command::new("dump")
        .about("Print the compiled grammar")
        .override_usage(
            "\
  yamlgram dump <GRAMMAR> [-p <FILE>]... [--format <FORMAT>]
  yamlgram dump --meta",
        )
        .after_help(
            r#"EXAMPLES:
  yamlgram dump yaml.bnf                    # normalized BNF
  yamlgram dump yaml.bnf --format json      # grammar IR as JSON
  yamlgram dump --meta                      # the BNF dialect, in itself"#,
        )
        .arg(format_arg())
        .arg(color_arg());

    with_grammar_args(cmd)
}

/// Parse input text and print the tree.
pub fn parse_command() -> Command {
    let cmd = Command::new("parse")
        .about("Parse input with a grammar and print the tree")
        .override_usage(
            "\
  yamlgram parse <GRAMMAR> <SOURCE> [-r <NAME>]
  yamlgram parse <GRAMMAR> -s <TEXT> [-r <NAME>]
  yamlgram parse --meta <SOURCE>",
        )
        .after_help(
            r#"EXAMPLES:
  yamlgram parse yaml.bnf doc.yaml -r l-yaml-stream
  yamlgram parse yaml.bnf -s 'a: b' -r l-yaml-stream --spans
  yamlgram parse --meta yaml.bnf --json     # parse a grammar file itself"#,
        )
        .arg(spans_arg())
        .arg(params_arg())
        .arg(json_arg())
        .arg(color_arg());

    let cmd = with_run_args(with_grammar_args(cmd));
    cmd.arg(verbose_arg().hide(true))
        .arg(no_result_arg().hide(true))
}

/// Trace interpretation for debugging.
pub fn trace_command() -> Command {
    let cmd = Command::new("trace")
        .about("Trace production calls while parsing")
        .override_usage(
            "\
  yamlgram trace <GRAMMAR> <SOURCE> [-r <NAME>] [-v...]
  yamlgram trace <GRAMMAR> -s <TEXT> [-r <NAME>] [-v...]",
        )
        .after_help(
            r#"EXAMPLES:
  yamlgram trace yaml.bnf -s '- a' -r l-yaml-stream
  yamlgram trace yaml.bnf doc.yaml -vv      # matched text, cache hits, parameters
  yamlgram trace yaml.bnf doc.yaml --no-result"#,
        )
        .arg(verbose_arg())
        .arg(no_result_arg())
        .arg(spans_arg())
        .arg(params_arg())
        .arg(color_arg());

    let cmd = with_run_args(with_grammar_args(cmd));
    cmd.arg(json_arg().hide(true))
}

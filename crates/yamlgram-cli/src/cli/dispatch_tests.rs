//! Tests for CLI dispatch logic.
//!
//! These tests verify:
//! 1. parse and trace accept each other's flags
//! 2. hidden flags don't appear in --help
//! 3. `--meta` shifts a lone positional to the source
//! 4. params are extracted and converted correctly

use std::path::PathBuf;

use yamlgram_vm::{DEFAULT_RECURSION_LIMIT, Verbosity};

use super::dispatch::ColorChoice;
use super::*;
use crate::cli::commands::{check_command, dump_command, parse_command, trace_command};
use crate::commands::check::CheckArgs;
use crate::commands::dump::{DumpArgs, DumpFormat};
use crate::commands::parse::ParseArgs;
use crate::commands::trace::TraceArgs;

#[test]
fn subcommand_is_required() {
    assert!(build_cli().try_get_matches_from(["yamlgram"]).is_err());
    assert!(
        build_cli()
            .try_get_matches_from(["yamlgram", "dump", "--meta"])
            .is_ok()
    );
}

#[test]
fn parse_accepts_trace_flags() {
    let result = parse_command().try_get_matches_from([
        "parse",
        "yaml.bnf",
        "doc.yaml",
        "-vv",
        "--no-result",
    ]);
    assert!(
        result.is_ok(),
        "parse should accept trace flags: {:?}",
        result.err()
    );

    let params = ParseParams::from_matches(&result.unwrap());
    assert_eq!(
        params.run.grammar.grammar_path,
        Some(PathBuf::from("yaml.bnf"))
    );
    assert_eq!(params.run.source_path, Some(PathBuf::from("doc.yaml")));
}

#[test]
fn trace_accepts_parse_flags() {
    let result = trace_command().try_get_matches_from(["trace", "yaml.bnf", "-s", "a", "--json"]);
    assert!(
        result.is_ok(),
        "trace should accept --json: {:?}",
        result.err()
    );
}

#[test]
fn parse_help_hides_trace_flags() {
    let help = parse_command().render_help().to_string();
    assert!(!help.contains("--no-result"), "{help}");
    assert!(!help.contains("Verbosity"), "{help}");
    assert!(help.contains("--json"), "{help}");
    assert!(help.contains("--no-cache"), "{help}");
}

#[test]
fn trace_help_hides_json() {
    let help = trace_command().render_help().to_string();
    assert!(!help.contains("--json"), "{help}");
    assert!(help.contains("--no-result"), "{help}");
}

#[test]
fn meta_shifts_positional_to_source() {
    let m = parse_command()
        .try_get_matches_from(["parse", "--meta", "grammar.bnf"])
        .unwrap();
    let params = ParseParams::from_matches(&m);

    assert!(params.run.grammar.meta);
    assert_eq!(params.run.grammar.grammar_path, None);
    assert_eq!(params.run.source_path, Some(PathBuf::from("grammar.bnf")));
}

#[test]
fn meta_no_shift_with_both_positionals() {
    let m = trace_command()
        .try_get_matches_from(["trace", "--meta", "fixups.bnf", "grammar.bnf"])
        .unwrap();
    let params = TraceParams::from_matches(&m);

    assert_eq!(
        params.run.grammar.grammar_path,
        Some(PathBuf::from("fixups.bnf"))
    );
    assert_eq!(params.run.source_path, Some(PathBuf::from("grammar.bnf")));
}

#[test]
fn no_shift_without_meta() {
    let m = parse_command()
        .try_get_matches_from(["parse", "yaml.bnf", "-s", "a: b"])
        .unwrap();
    let params = ParseParams::from_matches(&m);

    assert_eq!(
        params.run.grammar.grammar_path,
        Some(PathBuf::from("yaml.bnf"))
    );
    assert_eq!(params.run.source_path, None);
    assert_eq!(params.run.source_text.as_deref(), Some("a: b"));
}

#[test]
fn run_params_extracts_all_fields() {
    let m = parse_command()
        .try_get_matches_from([
            "parse",
            "yaml.bnf",
            "doc.yaml",
            "-p",
            "first.bnf",
            "--patch",
            "second.bnf",
            "-r",
            "l-yaml-stream",
            "--no-cache",
            "--recursion-limit",
            "64",
            "--spans",
            "--params",
            "--color",
            "never",
        ])
        .unwrap();
    let params = ParseParams::from_matches(&m);

    assert_eq!(
        params.run.grammar.patches,
        [PathBuf::from("first.bnf"), PathBuf::from("second.bnf")]
    );
    assert_eq!(params.run.root.as_deref(), Some("l-yaml-stream"));
    assert!(params.run.no_cache);
    assert_eq!(params.run.recursion_limit, 64);
    assert!(params.spans);
    assert!(params.params);
    assert!(!params.json);
    assert_eq!(params.color, ColorChoice::Never);
}

#[test]
fn run_params_defaults() {
    let m = parse_command()
        .try_get_matches_from(["parse", "yaml.bnf", "doc.yaml"])
        .unwrap();
    let params = ParseParams::from_matches(&m);

    assert!(params.run.grammar.patches.is_empty());
    assert_eq!(params.run.root, None);
    assert!(!params.run.no_cache);
    assert_eq!(params.run.recursion_limit, DEFAULT_RECURSION_LIMIT);
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn recursion_limit_must_be_a_number() {
    let result = parse_command().try_get_matches_from([
        "parse",
        "g.bnf",
        "-s",
        "x",
        "--recursion-limit",
        "deep",
    ]);
    assert!(result.is_err());
}

#[test]
fn trace_verbosity_levels() {
    for (flags, expected) in [
        (&[][..], Verbosity::Default),
        (&["-v"][..], Verbosity::Verbose),
        (&["-vv"][..], Verbosity::VeryVerbose),
        (&["-vvv"][..], Verbosity::VeryVerbose),
    ] {
        let mut argv = vec!["trace", "g.bnf", "-s", "x", "--color", "always"];
        argv.extend_from_slice(flags);
        let m = trace_command().try_get_matches_from(argv).unwrap();
        let args: TraceArgs = TraceParams::from_matches(&m).into();
        assert_eq!(args.verbosity, expected, "{flags:?}");
        assert!(args.color);
    }
}

#[test]
fn explicit_color_choice_ignores_terminal() {
    let never = parse_command()
        .try_get_matches_from(["parse", "g.bnf", "-s", "x", "--color", "never"])
        .unwrap();
    let args: ParseArgs = ParseParams::from_matches(&never).into();
    assert!(!args.color);

    let always = check_command()
        .try_get_matches_from(["check", "g.bnf", "--color", "always"])
        .unwrap();
    let args: CheckArgs = CheckParams::from_matches(&always).into();
    assert!(args.color);
}

#[test]
fn dump_format() {
    let m = dump_command()
        .try_get_matches_from(["dump", "--meta", "--format", "json"])
        .unwrap();
    let args: DumpArgs = DumpParams::from_matches(&m).into();
    assert_eq!(args.format, DumpFormat::Json);
    assert!(args.grammar.meta);

    let m = dump_command().try_get_matches_from(["dump", "g.bnf"]).unwrap();
    assert_eq!(DumpParams::from_matches(&m).format, DumpFormat::Bnf);

    assert!(
        dump_command()
            .try_get_matches_from(["dump", "g.bnf", "--format", "yaml"])
            .is_err()
    );
}

#[test]
fn check_params() {
    let m = check_command()
        .try_get_matches_from(["check", "yaml.bnf", "-p", "fix.bnf", "--strict"])
        .unwrap();
    let params = CheckParams::from_matches(&m);

    assert!(params.strict);
    assert_eq!(
        params.grammar.grammar_path,
        Some(PathBuf::from("yaml.bnf"))
    );
    assert_eq!(params.grammar.patches, [PathBuf::from("fix.bnf")]);
}

#[test]
fn check_rejects_source_args() {
    assert!(
        check_command()
            .try_get_matches_from(["check", "yaml.bnf", "-s", "x"])
            .is_err()
    );
}

//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! - `*Params` structs mirror the command `*Args` but are populated from clap
//! - `from_matches()` pulls the relevant fields, ignoring hidden ones
//! - `Into<*Args>` bridges dispatch to the command handlers
//! - with `--meta`, a lone positional is the source, not a grammar

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::ArgMatches;
use yamlgram_vm::{DEFAULT_RECURSION_LIMIT, Verbosity};

use crate::commands::check::CheckArgs;
use crate::commands::dump::{DumpArgs, DumpFormat};
use crate::commands::grammar_loader::GrammarSelection;
use crate::commands::parse::ParseArgs;
use crate::commands::run_common::RunOptions;
use crate::commands::trace::TraceArgs;

/// Grammar selection as given on the command line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GrammarParams {
    pub grammar_path: Option<PathBuf>,
    pub patches: Vec<PathBuf>,
    pub meta: bool,
}

impl GrammarParams {
    fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar_path: m.get_one::<PathBuf>("grammar_path").cloned(),
            patches: m
                .get_many::<PathBuf>("patch")
                .map(|paths| paths.cloned().collect())
                .unwrap_or_default(),
            meta: m.get_flag("meta"),
        }
    }
}

impl From<GrammarParams> for GrammarSelection {
    fn from(p: GrammarParams) -> Self {
        Self {
            base: p.grammar_path,
            patches: p.patches,
            meta: p.meta,
        }
    }
}

pub struct CheckParams {
    pub grammar: GrammarParams,
    pub strict: bool,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar: GrammarParams::from_matches(m),
            strict: m.get_flag("strict"),
            color: ColorChoice::from_matches(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            grammar: p.grammar.into(),
            strict: p.strict,
            color: p.color.resolve(),
        }
    }
}

pub struct DumpParams {
    pub grammar: GrammarParams,
    pub format: DumpFormat,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let format = match m.get_one::<String>("format").map(|s| s.as_str()) {
            Some("json") => DumpFormat::Json,
            _ => DumpFormat::Bnf,
        };
        Self {
            grammar: GrammarParams::from_matches(m),
            format,
            color: ColorChoice::from_matches(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            grammar: p.grammar.into(),
            format: p.format,
            color: p.color.resolve(),
        }
    }
}

/// Input and interpreter options shared by `parse` and `trace`.
#[derive(Debug, PartialEq, Eq)]
pub struct RunParams {
    pub grammar: GrammarParams,
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub root: Option<String>,
    pub no_cache: bool,
    pub recursion_limit: u32,
}

impl RunParams {
    fn from_matches(m: &ArgMatches) -> Self {
        let mut grammar = GrammarParams::from_matches(m);
        let (grammar_path, source_path) = shift_positional_to_source(
            grammar.meta,
            grammar.grammar_path.take(),
            m.get_one::<PathBuf>("source_path").cloned(),
        );
        grammar.grammar_path = grammar_path;

        Self {
            grammar,
            source_path,
            source_text: m.get_one::<String>("source_text").cloned(),
            root: m.get_one::<String>("root").cloned(),
            no_cache: m.get_flag("no_cache"),
            recursion_limit: m
                .get_one::<u32>("recursion_limit")
                .copied()
                .unwrap_or(DEFAULT_RECURSION_LIMIT),
        }
    }
}

impl From<RunParams> for RunOptions {
    fn from(p: RunParams) -> Self {
        Self {
            grammar: p.grammar.into(),
            source_path: p.source_path,
            source_text: p.source_text,
            root: p.root,
            backtrack_cache: !p.no_cache,
            recursion_limit: p.recursion_limit,
        }
    }
}

pub struct ParseParams {
    pub run: RunParams,
    pub spans: bool,
    pub params: bool,
    pub json: bool,
    pub color: ColorChoice,
    // verbose and no_result are parsed but not extracted
}

impl ParseParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            run: RunParams::from_matches(m),
            spans: m.get_flag("spans"),
            params: m.get_flag("params"),
            json: m.get_flag("json"),
            color: ColorChoice::from_matches(m),
        }
    }
}

impl From<ParseParams> for ParseArgs {
    fn from(p: ParseParams) -> Self {
        Self {
            run: p.run.into(),
            spans: p.spans,
            params: p.params,
            json: p.json,
            color: p.color.resolve(),
        }
    }
}

pub struct TraceParams {
    pub run: RunParams,
    pub verbose: u8,
    pub no_result: bool,
    pub spans: bool,
    pub params: bool,
    pub color: ColorChoice,
}

impl TraceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            run: RunParams::from_matches(m),
            verbose: m.get_count("verbose"),
            no_result: m.get_flag("no_result"),
            spans: m.get_flag("spans"),
            params: m.get_flag("params"),
            color: ColorChoice::from_matches(m),
        }
    }
}

impl From<TraceParams> for TraceArgs {
    fn from(p: TraceParams) -> Self {
        let verbosity = match p.verbose {
            0 => Verbosity::Default,
            1 => Verbosity::Verbose,
            _ => Verbosity::VeryVerbose,
        };

        Self {
            run: p.run.into(),
            verbosity,
            no_result: p.no_result,
            spans: p.spans,
            params: p.params,
            color: p.color.resolve(),
        }
    }
}

/// `--color` as written on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn from_matches(m: &ArgMatches) -> Self {
        match m.get_one::<String>("color").map(String::as_str) {
            Some("always") => ColorChoice::Always,
            Some("never") => ColorChoice::Never,
            _ => ColorChoice::Auto,
        }
    }

    /// `auto` colors only when neither stdout nor stderr is redirected.
    fn resolve(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
            }
        }
    }
}

/// With `--meta` and a single positional, that positional is the source.
/// This enables: `yamlgram parse --meta grammar.bnf`
fn shift_positional_to_source(
    meta: bool,
    grammar_path: Option<PathBuf>,
    source_path: Option<PathBuf>,
) -> (Option<PathBuf>, Option<PathBuf>) {
    if meta && grammar_path.is_some() && source_path.is_none() {
        (None, grammar_path)
    } else {
        (grammar_path, source_path)
    }
}

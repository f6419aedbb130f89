//! Common logic for parse and trace commands.

use std::path::PathBuf;

use yamlgram_core::Grammar;
use yamlgram_vm::{ParseOperation, RuntimeError};

use super::grammar_loader::{GrammarSelection, load_grammar, read_text};

/// Input and interpreter options shared by `parse` and `trace`.
pub struct RunOptions {
    pub grammar: GrammarSelection,
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub root: Option<String>,
    pub backtrack_cache: bool,
    pub recursion_limit: u32,
}

/// Grammar, input text and root production, ready to run.
pub struct Prepared {
    pub grammar: Grammar,
    pub source: String,
    pub root: String,
    backtrack_cache: bool,
    recursion_limit: u32,
}

impl Prepared {
    pub fn operation(&self) -> ParseOperation<'_, '_> {
        ParseOperation::builder(&self.grammar, &self.source)
            .backtrack_cache(self.backtrack_cache)
            .recursion_limit(self.recursion_limit)
            .build()
    }
}

/// Loads grammar and input, exiting with a message on failure.
pub fn prepare(options: RunOptions, color: bool) -> Prepared {
    let grammar = load_grammar(&options.grammar, color).unwrap_or_else(|e| {
        e.print();
        std::process::exit(1);
    });
    let root = resolve_root(&grammar, options.root).unwrap_or_else(|msg| fail(&msg));
    let source = load_source(options.source_path, options.source_text)
        .unwrap_or_else(|msg| fail(&msg));

    log::info!(
        "parsing {} byte(s) as `{root}` ({} production(s))",
        source.len(),
        grammar.len()
    );

    Prepared {
        grammar,
        source,
        root,
        backtrack_cache: options.backtrack_cache,
        recursion_limit: options.recursion_limit,
    }
}

/// Explicit root, or the first production of the grammar.
pub fn resolve_root(grammar: &Grammar, root: Option<String>) -> Result<String, String> {
    match root {
        Some(name) if grammar.contains(&name) => Ok(name),
        Some(name) => Err(format!("grammar has no production `{name}`")),
        None => grammar
            .names()
            .next()
            .map(str::to_string)
            .ok_or_else(|| "grammar has no productions".to_string()),
    }
}

fn load_source(path: Option<PathBuf>, text: Option<String>) -> Result<String, String> {
    if let Some(text) = text {
        return Ok(text);
    }
    match path {
        Some(path) => read_text(&path),
        None => Err("input is required: use a positional SOURCE or -s/--source".to_string()),
    }
}

/// Exit code 1 when the input does not match, 2 when the grammar is defective.
pub fn exit_with(error: &RuntimeError) -> ! {
    match error {
        RuntimeError::NoMatch { .. } | RuntimeError::Incomplete { .. } => {
            eprintln!("error: {}", error);
            std::process::exit(1);
        }
        _ => {
            eprintln!("runtime error: {}", error);
            std::process::exit(2);
        }
    }
}

fn fail(msg: &str) -> ! {
    eprintln!("error: {}", msg);
    std::process::exit(1);
}

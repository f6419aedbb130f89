use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use yamlgram_compiler::{GrammarBuilder, meta_grammar, parse_grammar};
use yamlgram_core::Grammar;

/// Which grammar files to compile and how to layer them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GrammarSelection {
    pub base: Option<PathBuf>,
    pub patches: Vec<PathBuf>,
    /// Start from the built-in meta-grammar.
    pub meta: bool,
}

impl GrammarSelection {
    pub fn is_empty(&self) -> bool {
        !self.meta && self.base.is_none() && self.patches.is_empty()
    }
}

/// Why a grammar could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Plain message, printed after `error: `.
    Message(String),
    /// Compile error already rendered against its file.
    Diagnostic(String),
}

impl LoadError {
    pub fn print(&self) {
        match self {
            LoadError::Message(msg) => eprintln!("error: {}", msg),
            LoadError::Diagnostic(rendered) => eprintln!("{}", rendered.trim_end()),
        }
    }
}

impl From<String> for LoadError {
    fn from(msg: String) -> Self {
        LoadError::Message(msg)
    }
}

/// Compiles the base, then every patch over it, in order.
pub fn load_grammar(selection: &GrammarSelection, color: bool) -> Result<Grammar, LoadError> {
    if selection.is_empty() {
        return Err("grammar is required: use a positional GRAMMAR or --meta"
            .to_string()
            .into());
    }

    let mut builder = if selection.meta {
        GrammarBuilder::from_grammar(meta_grammar().clone())
    } else {
        GrammarBuilder::new()
    };
    for path in selection.base.iter().chain(&selection.patches) {
        builder = builder.patch(load_fragment(path, color)?);
    }
    builder
        .finish()
        .map_err(|e| LoadError::Message(e.to_string()))
}

/// Compiles one BNF file.
pub fn load_fragment(path: &Path, color: bool) -> Result<Grammar, LoadError> {
    let text = read_text(path)?;
    let name = display_name(path);
    let grammar = parse_grammar(&text).map_err(|e| {
        LoadError::Diagnostic(
            e.printer()
                .source(&text)
                .path(&name)
                .colored(color)
                .render(),
        )
    })?;
    log::debug!("{name}: {} production(s)", grammar.len());
    Ok(grammar)
}

/// Reads a file, or stdin for "-".
pub fn read_text(path: &Path) -> Result<String, String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {}", e))?;
        return Ok(buf);
    }
    fs::read_to_string(path).map_err(|e| format!("failed to read '{}': {}", path.display(), e))
}

fn display_name(path: &Path) -> String {
    if path.as_os_str() == "-" {
        "<stdin>".to_string()
    } else {
        path.to_string_lossy().into_owned()
    }
}

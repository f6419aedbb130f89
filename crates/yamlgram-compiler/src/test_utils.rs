//! Test helpers for compiling and running grammar text.

use yamlgram_core::Grammar;
use yamlgram_vm::{AstNode, ParseOperation, RuntimeError};

use crate::{CompileError, parse_grammar};

/// Compiles `text`, panicking with the rendered diagnostic on failure.
pub fn compile(text: &str) -> Grammar {
    match parse_grammar(text) {
        Ok(grammar) => grammar,
        Err(e) => panic!("grammar failed to compile:\n{}", e.printer().source(text).render()),
    }
}

/// Compiles `text`, expecting failure.
pub fn compile_err(text: &str) -> CompileError {
    match parse_grammar(text) {
        Ok(grammar) => panic!("grammar unexpectedly compiled:\n{grammar}"),
        Err(e) => e,
    }
}

/// Rendered diagnostic for `text`, which must fail to compile.
pub fn render_err(text: &str) -> String {
    compile_err(text).printer().source(text).render()
}

/// Compiles `grammar` and parses `input` as `root`.
pub fn run(grammar: &str, root: &str, input: &str) -> Result<AstNode, RuntimeError> {
    let grammar = compile(grammar);
    ParseOperation::new(&grammar, input).parse_all(root)
}

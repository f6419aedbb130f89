//! Compiling BNF text with the meta-grammar.

use yamlgram_core::{Grammar, GrammarNode, Parameters};
use yamlgram_vm::{ParseOperation, RuntimeError};

use crate::Result;
use crate::error::CompileError;
use crate::meta::meta_grammar;
use crate::translate::Translator;

/// Compiles grammar text in the BNF dialect of [`META_GRAMMAR_BNF`](crate::META_GRAMMAR_BNF).
///
/// The whole text must parse as the meta-grammar's `grammar` production.
pub fn parse_grammar(text: &str) -> Result<Grammar> {
    let meta = meta_grammar();
    let tree = match ParseOperation::new(meta, text).parse_all("grammar") {
        Ok(tree) => tree,
        Err(RuntimeError::NoMatch { .. } | RuntimeError::Incomplete { .. }) => {
            return Err(CompileError::Syntax {
                span: locate_syntax_error(text)?,
            });
        }
        Err(e) => return Err(e.into()),
    };

    let grammar = Translator::new(text).translate(&tree)?;
    log::debug!(
        "compiled {} productions from {} bytes of grammar text",
        grammar.len(),
        text.len()
    );
    Ok(grammar)
}

/// Start of the first clause that does not parse, past any comments.
fn locate_syntax_error(text: &str) -> Result<std::ops::Range<usize>> {
    let mut op = ParseOperation::new(meta_grammar(), text);
    let params = Parameters::default();

    let prefix = GrammarNode::zero_or_more(GrammarNode::reference("production"));
    let end = op.parse(0, &params, &prefix)?.map_or(0, |m| m.end);

    let ignorable = GrammarNode::reference("s-ignorable");
    let start = op.parse(end, &params, &ignorable)?.map_or(end, |m| m.end);
    Ok(start..start)
}

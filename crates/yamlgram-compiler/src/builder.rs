//! Composing grammars from a base and fix-up fragments.

use yamlgram_core::{Grammar, GrammarNode, Production};

use crate::Result;
use crate::compile::parse_grammar;
use crate::error::CompileError;

/// Builds a grammar by layering fragments over a base.
///
/// Every fragment replaces same-named productions wholesale; later fragments
/// win. Replaced productions keep their original position.
///
/// ```
/// use yamlgram_compiler::GrammarBuilder;
///
/// let grammar = GrammarBuilder::from_bnf("a ::= 'x' b\nb ::= 'y'")?
///     .patch_bnf("b ::= 'z'")?
///     .finish()?;
/// assert_eq!(grammar.len(), 2);
/// # Ok::<(), yamlgram_compiler::CompileError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct GrammarBuilder {
    grammar: Grammar,
    validate: bool,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_grammar(grammar: Grammar) -> Self {
        Self {
            grammar,
            validate: false,
        }
    }

    pub fn from_bnf(text: &str) -> Result<Self> {
        Ok(Self::from_grammar(parse_grammar(text)?))
    }

    /// Overrides productions with those compiled from `text`.
    pub fn patch_bnf(self, text: &str) -> Result<Self> {
        Ok(self.patch(parse_grammar(text)?))
    }

    /// Overrides productions with those of `fragment`.
    pub fn patch(mut self, fragment: Grammar) -> Self {
        self.grammar.merge(fragment);
        self
    }

    /// Overrides a single production, typically one with no textual form.
    pub fn production(mut self, name: &str, production: Production) -> Self {
        self.grammar.insert(name, production);
        self
    }

    pub fn body(self, name: &str, body: GrammarNode) -> Self {
        self.production(name, Production::new(body))
    }

    /// Check references when finishing instead of when the interpreter reaches them.
    pub fn validate(mut self, on: bool) -> Self {
        self.validate = on;
        self
    }

    /// The composed grammar; with [`validate`](Self::validate), the first
    /// undefined reference is an error.
    pub fn finish(self) -> Result<Grammar> {
        if self.validate {
            if let Some(&(caller, name)) = self.grammar.undefined_references().first() {
                return Err(CompileError::UndefinedReference {
                    caller: caller.to_string(),
                    name: name.to_string(),
                });
            }
        }
        Ok(self.grammar)
    }

    /// The grammar built so far, unvalidated.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
}

impl From<Grammar> for GrammarBuilder {
    fn from(grammar: Grammar) -> Self {
        Self::from_grammar(grammar)
    }
}

//! Errors raised while compiling grammar text.

use std::ops::Range;

use yamlgram_core::Parameters;
use yamlgram_vm::RuntimeError;

use crate::diagnostics::DiagnosticPrinter;

/// A grammar-authoring defect, located by a byte span in the grammar text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The text is not valid BNF from `span.start` on.
    #[error("cannot parse a production here")]
    Syntax { span: Range<usize> },

    /// The meta-grammar itself failed; never caused by the grammar text alone.
    #[error("meta-grammar failure: {0}")]
    Runtime(#[from] RuntimeError),

    /// The meta-grammar parse tree lacks a node the translator relies on.
    #[error("malformed parse tree: missing `{expected}`")]
    MalformedTree {
        expected: &'static str,
        span: Range<usize>,
    },

    #[error("invalid number `{text}`")]
    InvalidNumber { text: String, span: Range<usize> },

    /// A production head parameter that is neither a formal nor a literal.
    #[error("invalid parameter `{text}` in production head: {reason}")]
    InvalidFormal {
        text: String,
        reason: &'static str,
        span: Range<usize>,
    },

    #[error("clauses of `{name}` declare different parameters")]
    InconsistentFormals { name: String, span: Range<usize> },

    #[error("`{name}{pattern}` is defined twice")]
    DuplicateClause {
        name: String,
        pattern: Parameters,
        span: Range<usize>,
    },

    #[error("unknown special `<{name}>`")]
    UnknownSpecial { name: String, span: Range<usize> },

    #[error("unsupported parameter expression `{text}`")]
    UnsupportedExpression { text: String, span: Range<usize> },

    /// Reported only when a [`GrammarBuilder`](crate::GrammarBuilder) validates references.
    #[error("undefined production `{name}` referenced from `{caller}`")]
    UndefinedReference { caller: String, name: String },

    /// A lookbehind operand that can match something other than one code point.
    #[error("`{text}` is not a character set")]
    NotACharSet { text: String, span: Range<usize> },
}

impl CompileError {
    /// Location in the grammar text, if the error has one.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            CompileError::Runtime(_) | CompileError::UndefinedReference { .. } => None,
            CompileError::Syntax { span }
            | CompileError::MalformedTree { span, .. }
            | CompileError::InvalidNumber { span, .. }
            | CompileError::InvalidFormal { span, .. }
            | CompileError::InconsistentFormals { span, .. }
            | CompileError::DuplicateClause { span, .. }
            | CompileError::UnknownSpecial { span, .. }
            | CompileError::UnsupportedExpression { span, .. }
            | CompileError::NotACharSet { span, .. } => Some(span.clone()),
        }
    }

    pub fn printer(&self) -> DiagnosticPrinter<'_, '_> {
        DiagnosticPrinter::new(self)
    }
}

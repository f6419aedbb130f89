//! yamlgram compiler: BNF grammar text to grammar IR.
//!
//! - `meta` - the hand-built meta-grammar and its textual transcription
//! - `compile` - [`parse_grammar`], running the meta-grammar over BNF text
//! - `translate` - parse tree to [`Grammar`](yamlgram_core::Grammar)
//! - `builder` - composing base grammars with fix-up fragments
//! - `diagnostics` - error rendering

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod builder;
mod compile;
pub mod diagnostics;
mod error;
mod meta;
mod translate;

#[cfg(test)]
mod builder_tests;
#[cfg(test)]
mod compile_tests;
#[cfg(test)]
mod error_tests;
#[cfg(test)]
pub mod test_utils;

pub use builder::GrammarBuilder;
pub use compile::parse_grammar;
pub use diagnostics::DiagnosticPrinter;
pub use error::CompileError;
pub use meta::{META_GRAMMAR_BNF, meta_grammar};

/// Result type for grammar compilation.
pub type Result<T> = std::result::Result<T, CompileError>;

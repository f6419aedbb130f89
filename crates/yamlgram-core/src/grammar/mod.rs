//! Grammar IR.
//!
//! A [`Grammar`] maps production names to [`Production`]s whose bodies are
//! [`GrammarNode`] trees. Grammars serialize to JSON for inspection and to a
//! compact binary form for caching compiled BNF.

mod binary;
mod display;
mod json;
mod types;

#[cfg(test)]
mod types_tests;

pub use json::GrammarError;
pub use types::{Binding, Bound, ContextCase, Grammar, GrammarNode, Production};

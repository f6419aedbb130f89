#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for yamlgram.
//!
//! - [`CharSet`]: sorted, merged code-point ranges
//! - [`Parameters`]: the `n`/`m`/`c`/`t` binding record threaded through productions
//! - [`grammar`]: the grammar IR ([`GrammarNode`], [`Production`], [`Grammar`])
//! - [`Colors`]: ANSI palette shared by the printers

mod charset;
mod colors;
pub mod grammar;
mod params;


pub use charset::{CharItem, CharSet, MAX_CODE_POINT};
pub use colors::Colors;
pub use grammar::{Binding, Bound, ContextCase, Grammar, GrammarError, GrammarNode, Production};
pub use params::{Chomping, Context, ParamError, ParamName, ParamValue, Parameters};

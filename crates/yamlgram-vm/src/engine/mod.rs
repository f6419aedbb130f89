//! Grammar interpreter.
//!
//! Parse failure is ordinary control flow (`Ok(None)`); grammar defects such
//! as an undefined production or an uncovered context are [`RuntimeError`]s.

mod ast;
mod error;
mod interpreter;
mod trace;
mod tree;


pub use ast::AstNode;
pub use error::RuntimeError;
pub use interpreter::{DEFAULT_RECURSION_LIMIT, Match, ParseOperation, ParseOperationBuilder};
pub use trace::{NoopTracer, PrintTracer, PrintTracerBuilder, Tracer, Verbosity};
pub use tree::TreeOptions;

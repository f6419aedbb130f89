#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Interpreter for the yamlgram grammar IR.
//!
//! A [`ParseOperation`] walks a [`Grammar`](yamlgram_core::Grammar) against
//! one input text and produces an [`AstNode`] tree.

pub mod engine;

pub use engine::{
    AstNode, DEFAULT_RECURSION_LIMIT, Match, NoopTracer, ParseOperation, ParseOperationBuilder,
    PrintTracer, PrintTracerBuilder, RuntimeError, Tracer, TreeOptions, Verbosity,
};

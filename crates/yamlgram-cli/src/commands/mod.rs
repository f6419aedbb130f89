pub mod check;
pub mod dump;
pub mod grammar_loader;
pub mod parse;
pub mod run_common;
pub mod trace;

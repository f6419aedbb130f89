//! Errors raised while interpreting a grammar.

use yamlgram_core::{ParamError, Parameters};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// A `Ref` names a production the grammar does not define.
    #[error("undefined production `{name}` referenced from `{caller}`")]
    UndefinedProduction { name: String, caller: String },

    #[error("`{production}` takes {expected} argument(s), called with {actual}")]
    ArityMismatch {
        production: String,
        expected: usize,
        actual: usize,
    },

    /// A parameter was unbound, ill-typed, or `in-flow` was undefined.
    #[error("in `{production}`: {source}")]
    Parameter {
        production: String,
        #[source]
        source: ParamError,
    },

    /// No `Context` case accepts the bound parameters.
    #[error("no case of `{production}` accepts `{production}{parameters}`")]
    UncoveredContext {
        production: String,
        parameters: Parameters,
    },

    /// The root production failed at offset 0.
    #[error("`{root}` does not match the input")]
    NoMatch { root: String },

    /// The root production matched a proper prefix of the input.
    #[error("`{root}` matched only up to offset {offset} of {len}")]
    Incomplete {
        root: String,
        offset: usize,
        len: usize,
    },

    #[error("recursion limit exceeded ({limit} nested productions)")]
    RecursionLimitExceeded { limit: u32 },
}

//! Production parameters.
//!
//! YAML productions are parameterized by an indentation column `n`, a
//! detected indentation `m`, a structural context `c` and a chomping
//! behavior `t`. A [`Parameters`] record holds whichever of them are bound;
//! reading an unbound one goes through a `require_*` accessor that fails
//! with a [`ParamError`] naming the parameter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Structural context of a YAML production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Context {
    BlockIn,
    BlockOut,
    BlockKey,
    FlowIn,
    FlowOut,
    FlowKey,
    AnnotationIn,
}

impl Context {
    pub const ALL: [Context; 7] = [
        Context::BlockIn,
        Context::BlockOut,
        Context::BlockKey,
        Context::FlowIn,
        Context::FlowOut,
        Context::FlowKey,
        Context::AnnotationIn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Context::BlockIn => "block-in",
            Context::BlockOut => "block-out",
            Context::BlockKey => "block-key",
            Context::FlowIn => "flow-in",
            Context::FlowOut => "flow-out",
            Context::FlowKey => "flow-key",
            Context::AnnotationIn => "annotation-in",
        }
    }

    /// The `in-flow(c)` mapping. Defined only for flow and key contexts.
    pub fn in_flow(self) -> Option<Context> {
        match self {
            Context::FlowOut | Context::FlowIn => Some(Context::FlowIn),
            Context::BlockKey | Context::FlowKey => Some(Context::FlowKey),
            Context::BlockIn | Context::BlockOut | Context::AnnotationIn => None,
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Context {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Context::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

/// Block scalar chomping behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Chomping {
    Strip,
    Clip,
    Keep,
}

impl Chomping {
    pub fn as_str(self) -> &'static str {
        match self {
            Chomping::Strip => "strip",
            Chomping::Clip => "clip",
            Chomping::Keep => "keep",
        }
    }
}

impl fmt::Display for Chomping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chomping {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strip" => Ok(Chomping::Strip),
            "clip" => Ok(Chomping::Clip),
            "keep" => Ok(Chomping::Keep),
            _ => Err(()),
        }
    }
}

/// Formal parameter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamName {
    N,
    M,
    C,
    T,
}

impl ParamName {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamName::N => "n",
            ParamName::M => "m",
            ParamName::C => "c",
            ParamName::T => "t",
        }
    }

    fn kind(self) -> &'static str {
        match self {
            ParamName::N | ParamName::M => "integer",
            ParamName::C => "context",
            ParamName::T => "chomping",
        }
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamValue {
    Int(i32),
    Context(Context),
    Chomping(Chomping),
}

impl ParamValue {
    /// The formal a literal of this kind binds when written in a production head.
    pub fn implied_name(self) -> ParamName {
        match self {
            ParamValue::Int(_) => ParamName::N,
            ParamValue::Context(_) => ParamName::C,
            ParamValue::Chomping(_) => ParamName::T,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Context(c) => write!(f, "{c}"),
            ParamValue::Chomping(t) => write!(f, "{t}"),
        }
    }
}

/// Failure to read or bind a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// The parameter is read but not bound.
    Unbound(ParamName),
    /// A value of the wrong kind was bound to the parameter.
    Mismatch { name: ParamName, value: ParamValue },
    /// `in-flow(c)` has no value for this context.
    InFlowUndefined(Context),
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbound(name) => write!(f, "parameter `{name}` is not bound"),
            Self::Mismatch { name, value } => write!(
                f,
                "parameter `{name}` expects {}, got `{value}`",
                name.kind()
            ),
            Self::InFlowUndefined(c) => write!(f, "in-flow({c}) is undefined"),
        }
    }
}

impl std::error::Error for ParamError {}

/// Bound parameters of one production invocation.
///
/// Also used as a partial pattern in context dispatch, where every bound
/// field is a constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameters {
    #[serde(default)]
    pub n: Option<i32>,
    #[serde(default)]
    pub m: Option<i32>,
    #[serde(default)]
    pub c: Option<Context>,
    #[serde(default)]
    pub t: Option<Chomping>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.n.is_none() && self.m.is_none() && self.c.is_none() && self.t.is_none()
    }

    pub fn require_n(&self) -> Result<i32, ParamError> {
        self.n.ok_or(ParamError::Unbound(ParamName::N))
    }

    pub fn require_m(&self) -> Result<i32, ParamError> {
        self.m.ok_or(ParamError::Unbound(ParamName::M))
    }

    pub fn require_c(&self) -> Result<Context, ParamError> {
        self.c.ok_or(ParamError::Unbound(ParamName::C))
    }

    pub fn require_t(&self) -> Result<Chomping, ParamError> {
        self.t.ok_or(ParamError::Unbound(ParamName::T))
    }

    pub fn get(&self, name: ParamName) -> Option<ParamValue> {
        match name {
            ParamName::N => self.n.map(ParamValue::Int),
            ParamName::M => self.m.map(ParamValue::Int),
            ParamName::C => self.c.map(ParamValue::Context),
            ParamName::T => self.t.map(ParamValue::Chomping),
        }
    }

    /// Returns a copy with `name` bound to `value`.
    pub fn with(mut self, name: ParamName, value: ParamValue) -> Result<Self, ParamError> {
        match (name, value) {
            (ParamName::N, ParamValue::Int(v)) => self.n = Some(v),
            (ParamName::M, ParamValue::Int(v)) => self.m = Some(v),
            (ParamName::C, ParamValue::Context(v)) => self.c = Some(v),
            (ParamName::T, ParamValue::Chomping(v)) => self.t = Some(v),
            (name, value) => return Err(ParamError::Mismatch { name, value }),
        }
        Ok(self)
    }

    /// Whether every field bound in `pattern` is bound to the same value here.
    pub fn satisfies(&self, pattern: &Parameters) -> bool {
        fn field<T: PartialEq>(bound: Option<T>, wanted: Option<T>) -> bool {
            wanted.is_none() || bound == wanted
        }
        field(self.n, pattern.n)
            && field(self.m, pattern.m)
            && field(self.c, pattern.c)
            && field(self.t, pattern.t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamName, ParamValue)> + '_ {
        [ParamName::N, ParamName::M, ParamName::C, ParamName::T]
            .into_iter()
            .filter_map(|name| self.get(name).map(|value| (name, value)))
    }
}

/// Renders as `(n=2,c=block-in)`, or nothing when no parameter is bound.
impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}

//! Grammar IR type definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::CharSet;
use crate::params::{ParamError, ParamName, ParamValue, Parameters};

/// How one argument of a production reference is computed from the caller's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Binding {
    /// A literal value.
    Value(ParamValue),
    /// The caller's `c`.
    Context,
    /// The caller's `t`.
    Chomping,
    /// `n`, `m` or an integer offset of them: `n+1`, `n-1`, `n+m`, `n+1+m`.
    Indent { n: bool, m: bool, offset: i32 },
    /// `in-flow(c)` applied to the caller's `c`.
    InFlow,
}

impl Binding {
    pub fn int(value: i32) -> Self {
        Binding::Value(ParamValue::Int(value))
    }

    /// Caller's `n` plus a constant.
    pub fn n_plus(offset: i32) -> Self {
        Binding::Indent {
            n: true,
            m: false,
            offset,
        }
    }

    /// Caller's `n`, unchanged.
    pub fn n() -> Self {
        Self::n_plus(0)
    }

    /// Caller's `m`, unchanged.
    pub fn m() -> Self {
        Binding::Indent {
            n: false,
            m: true,
            offset: 0,
        }
    }

    pub fn resolve(&self, caller: &Parameters) -> Result<ParamValue, ParamError> {
        match self {
            Binding::Value(value) => Ok(*value),
            Binding::Context => caller.require_c().map(ParamValue::Context),
            Binding::Chomping => caller.require_t().map(ParamValue::Chomping),
            Binding::Indent { n, m, offset } => {
                let mut total = *offset;
                if *n {
                    total += caller.require_n()?;
                }
                if *m {
                    total += caller.require_m()?;
                }
                Ok(ParamValue::Int(total))
            }
            Binding::InFlow => {
                let c = caller.require_c()?;
                c.in_flow()
                    .map(ParamValue::Context)
                    .ok_or(ParamError::InFlowUndefined(c))
            }
        }
    }

    /// Resolves to an integer, as repetition counts and indentation minimums need.
    pub fn resolve_int(&self, caller: &Parameters) -> Result<i32, ParamError> {
        match self.resolve(caller)? {
            ParamValue::Int(v) => Ok(v),
            value => Err(ParamError::Mismatch {
                name: ParamName::N,
                value,
            }),
        }
    }
}

/// A repetition bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bound {
    Fixed(u32),
    /// Taken from the caller's parameters; negative values count as zero.
    Param(Binding),
}

impl Bound {
    pub fn resolve(&self, params: &Parameters) -> Result<u32, ParamError> {
        match self {
            Bound::Fixed(v) => Ok(*v),
            Bound::Param(binding) => Ok(binding.resolve_int(params)?.max(0) as u32),
        }
    }
}

impl From<u32> for Bound {
    fn from(v: u32) -> Self {
        Bound::Fixed(v)
    }
}

/// One arm of a [`GrammarNode::Context`] dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextCase {
    /// Partial parameters; every bound field must match the caller's.
    pub pattern: Parameters,
    pub body: GrammarNode,
}

/// Grammar IR node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrammarNode {
    /// Always matches, zero width.
    Empty,
    /// Zero width; matches at offset 0 or right after a line break.
    StartOfLine,
    /// Zero width; matches at the end of the text.
    EndOfInput,
    /// Literal text.
    String(String),
    /// One code point from the set.
    CharSet(CharSet),
    /// Invoke a production. Arguments bind the callee's formals positionally.
    Ref { name: String, args: Vec<Binding> },
    Sequence(Vec<GrammarNode>),
    /// Ordered choice: the first alternative that matches wins.
    First(Vec<GrammarNode>),
    /// Greedy repetition; `max: None` is unbounded.
    Repeat {
        child: Box<GrammarNode>,
        min: Bound,
        max: Option<Bound>,
    },
    /// Zero-width assertion that `child` matches (`positive`) or does not.
    Lookahead {
        child: Box<GrammarNode>,
        positive: bool,
    },
    /// Zero-width assertion that `child` matches exactly the code point
    /// before the offset. Usually a `CharSet`; references resolve by name
    /// like any other.
    Lookbehind(Box<GrammarNode>),
    /// Counts leading spaces into `m` and evaluates `child` at the same offset,
    /// provided the count is at least `min`.
    DetectIndentation {
        min: Binding,
        child: Box<GrammarNode>,
    },
    /// Picks the first case whose pattern the current parameters satisfy.
    Context(Vec<ContextCase>),
}

impl GrammarNode {
    pub fn string(text: impl Into<String>) -> Self {
        GrammarNode::String(text.into())
    }

    pub fn chars(set: CharSet) -> Self {
        GrammarNode::CharSet(set)
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::call(name, Vec::new())
    }

    pub fn call(name: impl Into<String>, args: Vec<Binding>) -> Self {
        GrammarNode::Ref {
            name: name.into(),
            args,
        }
    }

    pub fn seq(nodes: impl IntoIterator<Item = GrammarNode>) -> Self {
        GrammarNode::Sequence(nodes.into_iter().collect())
    }

    pub fn first(nodes: impl IntoIterator<Item = GrammarNode>) -> Self {
        GrammarNode::First(nodes.into_iter().collect())
    }

    pub fn repeat(child: GrammarNode, min: impl Into<Bound>, max: Option<Bound>) -> Self {
        GrammarNode::Repeat {
            child: Box::new(child),
            min: min.into(),
            max,
        }
    }

    pub fn optional(child: GrammarNode) -> Self {
        Self::repeat(child, 0u32, Some(Bound::Fixed(1)))
    }

    pub fn zero_or_more(child: GrammarNode) -> Self {
        Self::repeat(child, 0u32, None)
    }

    pub fn one_or_more(child: GrammarNode) -> Self {
        Self::repeat(child, 1u32, None)
    }

    pub fn ahead(child: GrammarNode) -> Self {
        GrammarNode::Lookahead {
            child: Box::new(child),
            positive: true,
        }
    }

    pub fn not_ahead(child: GrammarNode) -> Self {
        GrammarNode::Lookahead {
            child: Box::new(child),
            positive: false,
        }
    }

    pub fn behind(child: GrammarNode) -> Self {
        GrammarNode::Lookbehind(Box::new(child))
    }

    pub fn detect_indentation(min: Binding, child: GrammarNode) -> Self {
        GrammarNode::DetectIndentation {
            min,
            child: Box::new(child),
        }
    }

    pub fn context(cases: impl IntoIterator<Item = (Parameters, GrammarNode)>) -> Self {
        GrammarNode::Context(
            cases
                .into_iter()
                .map(|(pattern, body)| ContextCase { pattern, body })
                .collect(),
        )
    }

    /// Calls `f` with the name of every production this node references.
    pub fn for_each_reference<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            GrammarNode::Empty
            | GrammarNode::StartOfLine
            | GrammarNode::EndOfInput
            | GrammarNode::String(_)
            | GrammarNode::CharSet(_) => {}
            GrammarNode::Ref { name, .. } => f(name),
            GrammarNode::Sequence(nodes) | GrammarNode::First(nodes) => {
                for node in nodes {
                    node.for_each_reference(f);
                }
            }
            GrammarNode::Repeat { child, .. }
            | GrammarNode::Lookahead { child, .. }
            | GrammarNode::Lookbehind(child)
            | GrammarNode::DetectIndentation { child, .. } => child.for_each_reference(f),
            GrammarNode::Context(cases) => {
                for case in cases {
                    case.body.for_each_reference(f);
                }
            }
        }
    }
}

/// A named rule: optional section number, formal parameters and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Production {
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub parameters: Vec<ParamName>,
    pub body: GrammarNode,
}

impl Production {
    pub fn new(body: GrammarNode) -> Self {
        Self {
            number: None,
            parameters: Vec::new(),
            body,
        }
    }

    pub fn number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    pub fn parameters(mut self, parameters: impl IntoIterator<Item = ParamName>) -> Self {
        self.parameters = parameters.into_iter().collect();
        self
    }
}

/// Name-keyed productions, in definition order.
///
/// References are resolved by name when the interpreter reaches them, so
/// productions may be mutually recursive and can be replaced by merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grammar {
    productions: IndexMap<String, Production>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a production, returning the replaced one.
    pub fn insert(&mut self, name: impl Into<String>, production: Production) -> Option<Production> {
        self.productions.insert(name.into(), production)
    }

    pub fn get(&self, name: &str) -> Option<&Production> {
        self.productions.get(name)
    }

    /// The production together with the grammar's own copy of its name.
    pub fn get_entry(&self, name: &str) -> Option<(&str, &Production)> {
        self.productions
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.productions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.productions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Production)> {
        self.productions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.productions.keys().map(String::as_str)
    }

    /// Key-wise override: productions of `patch` replace same-named ones.
    ///
    /// Replaced productions keep their position; new ones are appended.
    pub fn merge(&mut self, patch: Grammar) {
        for (name, production) in patch.productions {
            self.productions.insert(name, production);
        }
    }

    pub fn merged(mut self, patch: Grammar) -> Grammar {
        self.merge(patch);
        self
    }

    /// `(referencing production, missing name)` pairs, in definition order.
    pub fn undefined_references(&self) -> Vec<(&str, &str)> {
        let mut missing = Vec::new();
        for (name, production) in &self.productions {
            production.body.for_each_reference(&mut |target| {
                if !self.contains(target) && !missing.contains(&(name.as_str(), target)) {
                    missing.push((name.as_str(), target));
                }
            });
        }
        missing
    }
}

impl<S: Into<String>> FromIterator<(S, Production)> for Grammar {
    fn from_iter<I: IntoIterator<Item = (S, Production)>>(iter: I) -> Self {
        Self {
            productions: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl IntoIterator for Grammar {
    type Item = (String, Production);
    type IntoIter = indexmap::map::IntoIter<String, Production>;

    fn into_iter(self) -> Self::IntoIter {
        self.productions.into_iter()
    }
}

//! Recursive evaluation of grammar IR against one input text.

use std::collections::HashSet;

use yamlgram_core::{
    Binding, Bound, Grammar, GrammarNode, ParamError, ParamName, ParamValue, Parameters,
};

use super::ast::AstNode;
use super::error::RuntimeError;
use super::trace::{NoopTracer, Tracer};

/// Default maximum nesting of production invocations.
pub const DEFAULT_RECURSION_LIMIT: u32 = 1024;

/// Remaining stack below which a production call continues on a new segment.
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Result of a successful [`ParseOperation::parse`]: the nodes produced and
/// the offset just past the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub nodes: Vec<AstNode>,
    pub end: usize,
}

impl Match {
    fn empty(end: usize) -> Self {
        Self {
            nodes: Vec::new(),
            end,
        }
    }
}

/// A production call known to fail: offset, production name, concrete parameters.
#[derive(Debug, PartialEq, Eq, Hash)]
struct CallKey<'g> {
    offset: usize,
    name: &'g str,
    params: Parameters,
}

/// One parse of one text against one grammar.
///
/// Holds the failure cache and the call stack, so a fresh operation is
/// needed for every independent parse.
pub struct ParseOperation<'g, 't> {
    grammar: &'g Grammar,
    text: &'t str,
    failures: HashSet<CallKey<'g>>,
    cache_enabled: bool,
    call_stack: Vec<&'g str>,
    recursion_limit: u32,
}

/// Builder for [`ParseOperation`].
pub struct ParseOperationBuilder<'g, 't> {
    grammar: &'g Grammar,
    text: &'t str,
    cache_enabled: bool,
    recursion_limit: u32,
}

impl<'g, 't> ParseOperationBuilder<'g, 't> {
    /// Maximum nesting of production invocations before
    /// [`RuntimeError::RecursionLimitExceeded`].
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Whether failed calls are remembered. Disabling it never changes the
    /// result, only the running time.
    pub fn backtrack_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn build(self) -> ParseOperation<'g, 't> {
        ParseOperation {
            grammar: self.grammar,
            text: self.text,
            failures: HashSet::new(),
            cache_enabled: self.cache_enabled,
            call_stack: Vec::new(),
            recursion_limit: self.recursion_limit,
        }
    }
}

impl<'g, 't> ParseOperation<'g, 't> {
    pub fn new(grammar: &'g Grammar, text: &'t str) -> Self {
        Self::builder(grammar, text).build()
    }

    pub fn builder(grammar: &'g Grammar, text: &'t str) -> ParseOperationBuilder<'g, 't> {
        ParseOperationBuilder {
            grammar,
            text,
            cache_enabled: true,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// Parse the whole text as production `root`.
    ///
    /// Fails with [`RuntimeError::NoMatch`] or [`RuntimeError::Incomplete`]
    /// unless the match covers `0..text.len()`.
    pub fn parse_all(self, root: &str) -> Result<AstNode, RuntimeError> {
        self.parse_all_with(root, &mut NoopTracer)
    }

    pub fn parse_all_with<T: Tracer>(
        mut self,
        root: &str,
        tracer: &mut T,
    ) -> Result<AstNode, RuntimeError> {
        let len = self.text.len();
        match self.call(0, &Parameters::default(), root, &[], tracer)? {
            None => Err(RuntimeError::NoMatch {
                root: root.to_string(),
            }),
            Some(node) if node.range.end != len => Err(RuntimeError::Incomplete {
                root: root.to_string(),
                offset: node.range.end,
                len,
            }),
            Some(node) => Ok(node),
        }
    }

    /// Evaluate `node` at `offset` with `params` bound.
    ///
    /// `Ok(None)` is an ordinary non-match.
    pub fn parse(
        &mut self,
        offset: usize,
        params: &Parameters,
        node: &GrammarNode,
    ) -> Result<Option<Match>, RuntimeError> {
        self.parse_node(offset, params, node, &mut NoopTracer)
    }

    pub fn parse_with<T: Tracer>(
        &mut self,
        offset: usize,
        params: &Parameters,
        node: &GrammarNode,
        tracer: &mut T,
    ) -> Result<Option<Match>, RuntimeError> {
        self.parse_node(offset, params, node, tracer)
    }

    fn current_production(&self) -> &'g str {
        self.call_stack.last().copied().unwrap_or("<root>")
    }

    fn param_error(&self, source: ParamError) -> RuntimeError {
        RuntimeError::Parameter {
            production: self.current_production().to_string(),
            source,
        }
    }

    fn parse_node<T: Tracer>(
        &mut self,
        offset: usize,
        params: &Parameters,
        node: &GrammarNode,
        tracer: &mut T,
    ) -> Result<Option<Match>, RuntimeError> {
        let text = self.text;
        if !text.is_char_boundary(offset) {
            return Ok(None);
        }

        let result = match node {
            GrammarNode::Empty => Some(Match::empty(offset)),
            GrammarNode::StartOfLine => {
                let at_line_start =
                    offset == 0 || matches!(text.as_bytes()[offset - 1], b'\n' | b'\r');
                at_line_start.then(|| Match::empty(offset))
            }
            GrammarNode::EndOfInput => (offset == text.len()).then(|| Match::empty(offset)),
            GrammarNode::String(literal) => text[offset..]
                .starts_with(literal.as_str())
                .then(|| Match::empty(offset + literal.len())),
            GrammarNode::CharSet(set) => text[offset..]
                .chars()
                .next()
                .filter(|&c| set.contains(c))
                .map(|c| Match::empty(offset + c.len_utf8())),
            GrammarNode::Ref { name, args } => {
                self.call(offset, params, name, args, tracer)?
                    .map(|node| Match {
                        end: node.range.end,
                        nodes: vec![node],
                    })
            }
            GrammarNode::Sequence(children) => {
                let mut nodes = Vec::new();
                let mut pos = offset;
                for child in children {
                    let Some(m) = self.parse_node(pos, params, child, tracer)? else {
                        return Ok(None);
                    };
                    pos = m.end;
                    nodes.extend(m.nodes);
                }
                Some(Match { nodes, end: pos })
            }
            GrammarNode::First(children) => {
                for child in children {
                    if let Some(m) = self.parse_node(offset, params, child, tracer)? {
                        return Ok(Some(m));
                    }
                }
                None
            }
            GrammarNode::Repeat { child, min, max } => {
                self.repeat(offset, params, child, min, max.as_ref(), tracer)?
            }
            GrammarNode::Lookahead { child, positive } => {
                let matched = self.parse_node(offset, params, child, tracer)?.is_some();
                (matched == *positive).then(|| Match::empty(offset))
            }
            GrammarNode::Lookbehind(child) => {
                let Some(prev) = text[..offset].chars().next_back() else {
                    return Ok(None);
                };
                let start = offset - prev.len_utf8();
                self.parse_node(start, params, child, tracer)?
                    .filter(|m| m.end == offset)
                    .map(|_| Match::empty(offset))
            }
            GrammarNode::DetectIndentation { min, child } => {
                self.detect_indentation(offset, params, min, child, tracer)?
            }
            GrammarNode::Context(cases) => {
                let Some(case) = cases.iter().find(|case| params.satisfies(&case.pattern)) else {
                    return Err(RuntimeError::UncoveredContext {
                        production: self.current_production().to_string(),
                        parameters: *params,
                    });
                };
                self.parse_node(offset, params, &case.body, tracer)?
            }
        };
        Ok(result)
    }

    /// Invoke production `name`, binding `args` against the caller's `params`.
    fn call<T: Tracer>(
        &mut self,
        offset: usize,
        caller: &Parameters,
        name: &str,
        args: &[Binding],
        tracer: &mut T,
    ) -> Result<Option<AstNode>, RuntimeError> {
        let grammar = self.grammar;
        let Some((name, production)) = grammar.get_entry(name) else {
            return Err(RuntimeError::UndefinedProduction {
                name: name.to_string(),
                caller: self.current_production().to_string(),
            });
        };
        if args.len() != production.parameters.len() {
            return Err(RuntimeError::ArityMismatch {
                production: name.to_string(),
                expected: production.parameters.len(),
                actual: args.len(),
            });
        }

        let mut params = Parameters::default();
        for (&formal, arg) in production.parameters.iter().zip(args) {
            let value = arg.resolve(caller).map_err(|e| self.param_error(e))?;
            params = params
                .with(formal, value)
                .map_err(|source| RuntimeError::Parameter {
                    production: name.to_string(),
                    source,
                })?;
        }

        let key = CallKey {
            offset,
            name,
            params,
        };
        if self.cache_enabled && self.failures.contains(&key) {
            tracer.trace_cache_hit(name, &params, offset);
            return Ok(None);
        }
        if self.call_stack.len() >= self.recursion_limit as usize {
            return Err(RuntimeError::RecursionLimitExceeded {
                limit: self.recursion_limit,
            });
        }

        tracer.trace_enter(name, &params, offset);
        self.call_stack.push(name);
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, || {
            self.parse_node(offset, &params, &production.body, tracer)
        });
        self.call_stack.pop();

        match result? {
            Some(m) => {
                tracer.trace_success(name, &params, offset..m.end);
                Ok(Some(AstNode {
                    name: name.to_string(),
                    parameters: params,
                    content: m.nodes,
                    range: offset..m.end,
                }))
            }
            None => {
                tracer.trace_failure(name, &params, offset);
                if self.cache_enabled {
                    self.failures.insert(key);
                }
                Ok(None)
            }
        }
    }

    fn repeat<T: Tracer>(
        &mut self,
        offset: usize,
        params: &Parameters,
        child: &GrammarNode,
        min: &Bound,
        max: Option<&Bound>,
        tracer: &mut T,
    ) -> Result<Option<Match>, RuntimeError> {
        let min = min.resolve(params).map_err(|e| self.param_error(e))?;
        let max = max
            .map(|bound| bound.resolve(params))
            .transpose()
            .map_err(|e| self.param_error(e))?;

        let mut nodes = Vec::new();
        let mut pos = offset;
        let mut count = 0u32;
        while max.is_none_or(|max| count < max) {
            let Some(m) = self.parse_node(pos, params, child, tracer)? else {
                break;
            };
            count += 1;
            let advanced = m.end != pos;
            pos = m.end;
            nodes.extend(m.nodes);

            // A zero-width iteration would match forever.
            if !advanced && max.is_none() {
                let production = self.current_production();
                log::warn!(
                    "unbounded repetition in `{production}` matched zero width at offset {pos}; stopping"
                );
                tracer.trace_zero_width_repeat(production, pos);
                break;
            }
        }

        Ok((count >= min).then_some(Match { nodes, end: pos }))
    }

    fn detect_indentation<T: Tracer>(
        &mut self,
        offset: usize,
        params: &Parameters,
        min: &Binding,
        child: &GrammarNode,
        tracer: &mut T,
    ) -> Result<Option<Match>, RuntimeError> {
        let spaces = self.text.as_bytes()[offset..]
            .iter()
            .take_while(|&&b| b == b' ')
            .count();
        let m = i32::try_from(spaces).unwrap_or(i32::MAX);
        let min = min.resolve_int(params).map_err(|e| self.param_error(e))?;
        if m < min {
            return Ok(None);
        }

        let bound = params
            .with(ParamName::M, ParamValue::Int(m))
            .map_err(|e| self.param_error(e))?;
        self.parse_node(offset, &bound, child, tracer)
    }
}

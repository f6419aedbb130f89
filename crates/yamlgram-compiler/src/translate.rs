//! Translation of a meta-grammar parse tree into grammar IR.
//!
//! The tree has one `production` node per textual clause. Clauses sharing a
//! name are grouped into one [`Production`]; clauses whose heads carry literal
//! values (`s-line-prefix(n,block-out)`) become the cases of a `Context` body.
//!
//! Only literal operands are folded into character sets. References stay
//! references, so a later fragment that replaces a production also changes
//! every rule built on it.

use std::ops::Range;

use indexmap::IndexMap;
use yamlgram_core::{
    Binding, Bound, CharSet, Grammar, GrammarNode, MAX_CODE_POINT, ParamName, ParamValue,
    Parameters, Production,
};
use yamlgram_vm::AstNode;

use crate::Result;
use crate::error::CompileError;

/// One textual `name(...) ::= ...` definition.
struct Clause<'a> {
    formals: Vec<ParamName>,
    pattern: Parameters,
    number: Option<u32>,
    body: &'a AstNode,
    span: Range<usize>,
}

/// Signed coefficients of a parameter expression such as `n+1+m`.
#[derive(Debug, Default)]
struct Sum {
    n: i32,
    m: i32,
    c: i32,
    t: i32,
    /// Terms naming `c` or `t`, which only stand alone.
    enum_terms: usize,
    constant: i32,
    terms: usize,
}

impl Sum {
    fn is_constant(&self) -> bool {
        self.n == 0 && self.m == 0 && self.enum_terms == 0
    }

    /// The formal this expression names, if it is a bare parameter.
    fn formal(&self) -> Option<ParamName> {
        if self.terms != 1 {
            return None;
        }
        match (self.n, self.m, self.c, self.t) {
            (1, 0, 0, 0) => Some(ParamName::N),
            (0, 1, 0, 0) => Some(ParamName::M),
            (0, 0, 1, 0) => Some(ParamName::C),
            (0, 0, 0, 1) => Some(ParamName::T),
            _ => None,
        }
    }

    fn binding(&self) -> Option<Binding> {
        match self.formal() {
            Some(ParamName::C) => return Some(Binding::Context),
            Some(ParamName::T) => return Some(Binding::Chomping),
            _ => {}
        }
        if self.enum_terms > 0 || !(0..=1).contains(&self.n) || !(0..=1).contains(&self.m) {
            return None;
        }
        if self.is_constant() {
            return Some(Binding::int(self.constant));
        }
        Some(Binding::Indent {
            n: self.n == 1,
            m: self.m == 1,
            offset: self.constant,
        })
    }
}

pub(crate) struct Translator<'a> {
    source: &'a str,
}

impl<'a> Translator<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Translates the tree of a whole `grammar` match.
    pub(crate) fn translate(self, root: &'a AstNode) -> Result<Grammar> {
        let mut clauses: IndexMap<&'a str, Vec<Clause<'a>>> = IndexMap::new();
        for production in root.children_named("production") {
            let (name, clause) = self.clause(production)?;
            clauses.entry(name).or_default().push(clause);
        }

        let mut grammar = Grammar::new();
        for (&name, group) in &clauses {
            grammar.insert(name, self.production(name, group)?);
        }
        Ok(grammar)
    }

    fn text(&self, node: &AstNode) -> &'a str {
        node.text(self.source)
    }

    fn required<'n>(&self, node: &'n AstNode, name: &'static str) -> Result<&'n AstNode> {
        node.child(name).ok_or_else(|| CompileError::MalformedTree {
            expected: name,
            span: node.range.clone(),
        })
    }

    fn clause(&self, production: &'a AstNode) -> Result<(&'a str, Clause<'a>)> {
        let name_node = self.required(production, "production-name")?;
        let number = production
            .child("section-number")
            .map(|section| self.section_number(section))
            .transpose()?;
        let (formals, pattern) = match production.child("parameter-list") {
            Some(list) => self.head(list)?,
            None => (Vec::new(), Parameters::default()),
        };
        let start = production
            .child("section-number")
            .unwrap_or(name_node)
            .range
            .start;

        let clause = Clause {
            formals,
            pattern,
            number,
            body: self.required(production, "alternation")?,
            span: start..production.range.end,
        };
        Ok((self.text(name_node), clause))
    }

    fn section_number(&self, section: &AstNode) -> Result<u32> {
        let decimal = self.required(section, "decimal")?;
        let text = self.text(decimal);
        text.parse().map_err(|_| CompileError::InvalidNumber {
            text: text.to_string(),
            span: decimal.range.clone(),
        })
    }

    /// Formals and the literal pattern of a production head.
    fn head(&self, list: &AstNode) -> Result<(Vec<ParamName>, Parameters)> {
        let mut formals = Vec::new();
        let mut pattern = Parameters::default();

        for param in list.children_named("parameter") {
            let invalid = |reason| CompileError::InvalidFormal {
                text: self.text(param).to_string(),
                reason,
                span: param.range.clone(),
            };

            let (name, literal) = match self.literal(param)? {
                Some(value) => (value.implied_name(), Some(value)),
                None => {
                    let sum = match param.child("param-sum") {
                        Some(sum) => self.sum(sum)?,
                        None => return Err(invalid("`in-flow` is not a parameter name")),
                    };
                    match (sum.formal(), sum.is_constant()) {
                        (Some(name), _) => (name, None),
                        (None, true) => (ParamName::N, Some(ParamValue::Int(sum.constant))),
                        (None, false) => {
                            return Err(invalid("expected a parameter name or a literal"));
                        }
                    }
                }
            };

            if formals.contains(&name) {
                return Err(invalid("parameter declared twice"));
            }
            formals.push(name);
            if let Some(value) = literal {
                pattern = pattern
                    .with(name, value)
                    .map_err(|_| invalid("value does not fit the parameter"))?;
            }
        }
        Ok((formals, pattern))
    }

    /// A context or chomping literal.
    fn literal(&self, param: &AstNode) -> Result<Option<ParamValue>> {
        if let Some(node) = param.child("context-value") {
            let value = self
                .text(node)
                .parse()
                .map_err(|()| self.malformed("context-value", node))?;
            return Ok(Some(ParamValue::Context(value)));
        }
        if let Some(node) = param.child("chomping-value") {
            let value = self
                .text(node)
                .parse()
                .map_err(|()| self.malformed("chomping-value", node))?;
            return Ok(Some(ParamValue::Chomping(value)));
        }
        Ok(None)
    }

    fn malformed(&self, expected: &'static str, node: &AstNode) -> CompileError {
        CompileError::MalformedTree {
            expected,
            span: node.range.clone(),
        }
    }

    fn sum(&self, node: &AstNode) -> Result<Sum> {
        let mut sum = Sum::default();
        let mut negative = false;

        for child in &node.content {
            match child.name.as_str() {
                "sum-operator" => negative = self.text(child) == "-",
                "param-term" => {
                    let sign = if negative { -1 } else { 1 };
                    sum.terms += 1;
                    if let Some(variable) = child.child("param-variable") {
                        match self.text(variable) {
                            "n" => sum.n += sign,
                            "m" => sum.m += sign,
                            "c" => {
                                sum.c += sign;
                                sum.enum_terms += 1;
                            }
                            "t" => {
                                sum.t += sign;
                                sum.enum_terms += 1;
                            }
                            _ => return Err(self.malformed("param-variable", variable)),
                        }
                    } else {
                        let decimal = self.required(child, "decimal")?;
                        let value = self.decimal(decimal)?;
                        sum.constant = value
                            .checked_mul(sign)
                            .and_then(|v| sum.constant.checked_add(v))
                            .ok_or_else(|| CompileError::InvalidNumber {
                                text: self.text(node).to_string(),
                                span: node.range.clone(),
                            })?;
                    }
                }
                _ => {}
            }
        }
        Ok(sum)
    }

    fn decimal(&self, node: &AstNode) -> Result<i32> {
        let text = self.text(node);
        text.parse().map_err(|_| CompileError::InvalidNumber {
            text: text.to_string(),
            span: node.range.clone(),
        })
    }

    fn unsupported(&self, node: &AstNode) -> CompileError {
        CompileError::UnsupportedExpression {
            text: self.text(node).to_string(),
            span: node.range.clone(),
        }
    }

    /// One argument of a production reference.
    fn argument(&self, param: &AstNode) -> Result<Binding> {
        if let Some(value) = self.literal(param)? {
            return Ok(Binding::Value(value));
        }
        if let Some(in_flow) = param.child("in-flow") {
            let variable = self.required(in_flow, "param-variable")?;
            return match self.text(variable) {
                "c" => Ok(Binding::InFlow),
                _ => Err(self.unsupported(in_flow)),
            };
        }
        let node = self.required(param, "param-sum")?;
        self.sum(node)?
            .binding()
            .ok_or_else(|| self.unsupported(node))
    }

    /// Repetition count of a `{k}` quantifier.
    fn bound(&self, node: &AstNode) -> Result<Bound> {
        let sum = self.sum(node)?;
        if sum.is_constant() {
            return u32::try_from(sum.constant)
                .map(Bound::Fixed)
                .map_err(|_| self.unsupported(node));
        }
        match sum.binding() {
            Some(binding @ Binding::Indent { .. }) => Ok(Bound::Param(binding)),
            _ => Err(self.unsupported(node)),
        }
    }

    fn production(&self, name: &str, clauses: &[Clause<'a>]) -> Result<Production> {
        let [head, rest @ ..] = clauses else {
            return Err(CompileError::MalformedTree {
                expected: "production",
                span: 0..0,
            });
        };

        for clause in rest {
            if clause.formals != head.formals {
                return Err(CompileError::InconsistentFormals {
                    name: name.to_string(),
                    span: clause.span.clone(),
                });
            }
        }
        for (i, clause) in clauses.iter().enumerate() {
            if clauses[..i].iter().any(|c| c.pattern == clause.pattern) {
                return Err(CompileError::DuplicateClause {
                    name: name.to_string(),
                    pattern: clause.pattern,
                    span: clause.span.clone(),
                });
            }
        }

        let body = match clauses {
            [only] if only.pattern.is_empty() => self.alternation(only.body)?,
            _ => {
                let mut cases = Vec::with_capacity(clauses.len());
                for clause in clauses {
                    cases.push((clause.pattern, self.alternation(clause.body)?));
                }
                GrammarNode::context(cases)
            }
        };

        let mut production = Production::new(body).parameters(head.formals.iter().copied());
        if let Some(number) = clauses.iter().find_map(|c| c.number) {
            production = production.number(number);
        }
        Ok(production)
    }

    fn alternation(&self, node: &AstNode) -> Result<GrammarNode> {
        let mut branches = node
            .children_named("sequence")
            .map(|s| self.sequence(s))
            .collect::<Result<Vec<_>>>()?;
        Ok(match branches.len() {
            1 => branches.remove(0),
            _ => GrammarNode::First(branches),
        })
    }

    fn sequence(&self, node: &AstNode) -> Result<GrammarNode> {
        let mut items = node
            .children_named("difference")
            .map(|d| self.difference(d))
            .collect::<Result<Vec<_>>>()?;
        Ok(match items.len() {
            1 => items.remove(0),
            _ => GrammarNode::Sequence(items),
        })
    }

    /// `a - b - c`: a character set when every operand is a literal set,
    /// otherwise `a` guarded by negative lookaheads.
    fn difference(&self, node: &AstNode) -> Result<GrammarNode> {
        let operands: Vec<&AstNode> = node.children_named("quantified").collect();
        let [first, rest @ ..] = operands.as_slice() else {
            return Err(self.malformed("quantified", node));
        };
        if rest.is_empty() {
            return self.quantified(first);
        }
        if let Some(set) = self.fold(node) {
            return Ok(GrammarNode::chars(set));
        }

        let mut items = Vec::with_capacity(operands.len());
        for excluded in rest {
            items.push(GrammarNode::not_ahead(self.quantified(excluded)?));
        }
        items.push(self.quantified(first)?);
        Ok(GrammarNode::Sequence(items))
    }

    fn quantified(&self, node: &AstNode) -> Result<GrammarNode> {
        let atom = self.atom(self.required(node, "atom")?)?;
        let Some(quantifier) = node.child("quantifier") else {
            return Ok(atom);
        };
        Ok(match self.text(quantifier) {
            "?" => GrammarNode::optional(atom),
            "*" => GrammarNode::zero_or_more(atom),
            "+" => GrammarNode::one_or_more(atom),
            _ => {
                let count = self.bound(self.required(quantifier, "param-sum")?)?;
                GrammarNode::repeat(atom, count.clone(), Some(count))
            }
        })
    }

    fn atom(&self, node: &AstNode) -> Result<GrammarNode> {
        let Some(inner) = node.content.first() else {
            return Err(self.malformed("atom", node));
        };
        match inner.name.as_str() {
            "lookaround" => self.lookaround(inner),
            "special" => self.special(inner),
            "group" => self.alternation(self.required(inner, "alternation")?),
            "code-point-range" => self.range(inner).map(GrammarNode::chars),
            "hex-char" => {
                let cp = self.hex(inner)?;
                Ok(GrammarNode::chars(CharSet::from_ranges([cp])))
            }
            "quoted-string" => Ok(GrammarNode::string(quoted_content(self.text(inner)))),
            "any-char" => Ok(GrammarNode::chars(CharSet::any())),
            "reference" => self.reference(inner),
            _ => Err(self.malformed("atom", node)),
        }
    }

    fn lookaround(&self, node: &AstNode) -> Result<GrammarNode> {
        let body = self.required(node, "alternation")?;
        if node.child("lookbehind-positive").is_some() {
            if !self.single_code_point(body) {
                let span = trimmed_span(body);
                return Err(CompileError::NotACharSet {
                    text: self.source.get(span.clone()).unwrap_or_default().to_string(),
                    span,
                });
            }
            return Ok(GrammarNode::behind(match self.fold(body) {
                Some(set) => GrammarNode::chars(set),
                None => self.alternation(body)?,
            }));
        }

        let child = self.alternation(body)?;
        Ok(if node.child("lookahead-negative").is_some() {
            GrammarNode::not_ahead(child)
        } else {
            GrammarNode::ahead(child)
        })
    }

    fn special(&self, node: &AstNode) -> Result<GrammarNode> {
        let text = self.text(node);
        let name = text
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .unwrap_or(text);
        match name {
            "empty" => Ok(GrammarNode::Empty),
            "start-of-line" => Ok(GrammarNode::StartOfLine),
            "end-of-input" => Ok(GrammarNode::EndOfInput),
            _ => Err(CompileError::UnknownSpecial {
                name: name.to_string(),
                span: node.range.clone(),
            }),
        }
    }

    fn hex(&self, node: &AstNode) -> Result<u32> {
        let text = self.text(node);
        let digits = text.strip_prefix('x').unwrap_or(text);
        u32::from_str_radix(digits, 16)
            .ok()
            .filter(|&cp| cp <= MAX_CODE_POINT)
            .ok_or_else(|| CompileError::InvalidNumber {
                text: text.to_string(),
                span: node.range.clone(),
            })
    }

    fn range_bound(&self, node: &AstNode) -> Result<u32> {
        if let Some(hex) = node.child("hex-char") {
            return self.hex(hex);
        }
        let quoted = self.required(node, "quoted-char")?;
        quoted_content(self.text(quoted))
            .chars()
            .next()
            .map(u32::from)
            .ok_or_else(|| self.malformed("quoted-char", quoted))
    }

    fn range(&self, node: &AstNode) -> Result<CharSet> {
        let mut bounds = node.children_named("range-bound");
        let (Some(lo), Some(hi)) = (bounds.next(), bounds.next()) else {
            return Err(self.malformed("range-bound", node));
        };
        Ok(CharSet::from_ranges([(self.range_bound(lo)?, self.range_bound(hi)?)]))
    }

    fn reference(&self, node: &AstNode) -> Result<GrammarNode> {
        let name = self.text(self.required(node, "production-name")?);
        let args = match node.child("parameter-list") {
            Some(list) => list
                .children_named("parameter")
                .map(|p| self.argument(p))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };
        Ok(GrammarNode::call(name, args))
    }

    /// The character set `node` denotes, if it is built from literals alone.
    fn fold(&self, node: &AstNode) -> Option<CharSet> {
        match node.name.as_str() {
            "alternation" => {
                let mut set = CharSet::empty();
                for branch in node.children_named("sequence") {
                    set = set.union(&self.fold(branch)?);
                }
                Some(set)
            }
            "sequence" => self.fold(sole_child(node, "difference")?),
            "difference" => {
                let mut operands = node.children_named("quantified");
                let mut set = self.fold(operands.next()?)?;
                for excluded in operands {
                    set = set.minus(&self.fold(excluded)?);
                }
                Some(set)
            }
            "quantified" => {
                if node.child("quantifier").is_some() {
                    return None;
                }
                self.fold(node.child("atom")?)
            }
            "atom" => self.fold(node.content.first()?),
            "group" => self.fold(node.child("alternation")?),
            "code-point-range" => self.range(node).ok(),
            "hex-char" => self.hex(node).ok().map(|cp| CharSet::from_ranges([cp])),
            "quoted-string" => {
                let mut chars = quoted_content(self.text(node)).chars();
                let c = chars.next()?;
                chars.next().is_none().then(|| CharSet::from_ranges([c]))
            }
            "any-char" => Some(CharSet::any()),
            _ => None,
        }
    }

    /// Whether `node` always matches exactly one code point, assuming every
    /// production it references does.
    fn single_code_point(&self, node: &AstNode) -> bool {
        match node.name.as_str() {
            "alternation" => node
                .children_named("sequence")
                .all(|branch| self.single_code_point(branch)),
            "sequence" => {
                sole_child(node, "difference").is_some_and(|only| self.single_code_point(only))
            }
            "difference" => node
                .children_named("quantified")
                .next()
                .is_some_and(|first| self.single_code_point(first)),
            "quantified" => {
                node.child("quantifier").is_none()
                    && node
                        .child("atom")
                        .and_then(|atom| atom.content.first())
                        .is_some_and(|inner| self.single_code_point(inner))
            }
            "group" => node
                .child("alternation")
                .is_some_and(|body| self.single_code_point(body)),
            "reference" => node.child("parameter-list").is_none(),
            _ => self.fold(node).is_some(),
        }
    }
}

/// The only child of `node` named `name`.
fn sole_child<'n>(node: &'n AstNode, name: &'n str) -> Option<&'n AstNode> {
    let mut children = node.children_named(name);
    match (children.next(), children.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

/// Text between the quotes of a quoted string or character.
fn quoted_content(text: &str) -> &str {
    text.get(1..text.len().saturating_sub(1)).unwrap_or_default()
}

/// Span of `node` without its leading and trailing ignorable text.
fn trimmed_span(node: &AstNode) -> Range<usize> {
    let mut significant = node
        .content
        .iter()
        .filter(|child| child.name != "s-ignorable" && child.name != "s-space");
    match (significant.next(), significant.next_back()) {
        (Some(first), Some(last)) => first.range.start..last.range.end,
        (Some(only), None) => only.range.clone(),
        _ => node.range.clone(),
    }
}

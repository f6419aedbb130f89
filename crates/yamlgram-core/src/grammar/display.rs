//! BNF rendering of the grammar IR.
//!
//! Literals and character sets print in the notation `parse_grammar` accepts.
//! A few IR shapes have no textual form and print as markers instead:
//! `DetectIndentation` as `<detect-indentation(..)>`, nested `Context` nodes
//! as `<context ..>`, an empty character set as `<never>`, and repeat ranges
//! as `{min,max}` or `{min,}`.

use std::fmt::{self, Display, Formatter};

use super::types::{Binding, Bound, Grammar, GrammarNode, Production};
use crate::charset::write_code_point;

/// Binding strength of the position a node is printed in.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Alternation,
    Sequence,
    Postfix,
}

impl Display for Binding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Value(value) => write!(f, "{value}"),
            Binding::Context => f.write_str("c"),
            Binding::Chomping => f.write_str("t"),
            Binding::InFlow => f.write_str("in-flow(c)"),
            Binding::Indent { n, m, offset } => {
                let mut empty = true;
                if *n {
                    f.write_str("n")?;
                    empty = false;
                }
                if *offset != 0 {
                    if empty {
                        write!(f, "{offset}")?;
                    } else {
                        write!(f, "{offset:+}")?;
                    }
                    empty = false;
                }
                if *m {
                    f.write_str(if empty { "m" } else { "+m" })?;
                    empty = false;
                }
                if empty {
                    f.write_str("0")?;
                }
                Ok(())
            }
        }
    }
}

impl Display for Bound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Fixed(v) => write!(f, "{v}"),
            Bound::Param(binding) => write!(f, "{binding}"),
        }
    }
}

impl Display for GrammarNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_node(f, self, Prec::Alternation)
    }
}

fn write_list(f: &mut Formatter<'_>, nodes: &[GrammarNode], sep: &str, prec: Prec) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write_node(f, node, prec)?;
    }
    Ok(())
}

fn write_args(f: &mut Formatter<'_>, args: &[impl Display]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    f.write_str("(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{arg}")?;
    }
    f.write_str(")")
}

/// A piece of a literal: a run that one kind of quote can enclose, or a line
/// break, which quoted text cannot contain.
enum Piece<'a> {
    Quoted(&'a str),
    Break(char),
}

fn literal_pieces(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let (mut single, mut double) = (false, false);
    for (i, c) in text.char_indices() {
        let breaks_run = matches!(c, '\n' | '\r')
            || (c == '\'' && double)
            || (c == '"' && single);
        if breaks_run {
            if start < i {
                pieces.push(Piece::Quoted(&text[start..i]));
            }
            (single, double) = (false, false);
            start = i;
        }
        if matches!(c, '\n' | '\r') {
            pieces.push(Piece::Break(c));
            start = i + c.len_utf8();
            continue;
        }
        single |= c == '\'';
        double |= c == '"';
    }
    if start < text.len() {
        pieces.push(Piece::Quoted(&text[start..]));
    }
    pieces
}

fn write_piece(f: &mut Formatter<'_>, piece: &Piece<'_>) -> fmt::Result {
    match piece {
        Piece::Quoted(run) if run.contains('\'') => write!(f, "\"{run}\""),
        Piece::Quoted(run) => write!(f, "'{run}'"),
        Piece::Break(c) => write_code_point(f, u32::from(*c)),
    }
}

fn write_literal(f: &mut Formatter<'_>, text: &str, prec: Prec) -> fmt::Result {
    let pieces = literal_pieces(text);
    let [first, rest @ ..] = pieces.as_slice() else {
        return f.write_str("<empty>");
    };
    let grouped = !rest.is_empty() && prec == Prec::Postfix;
    if grouped {
        f.write_str("( ")?;
    }
    write_piece(f, first)?;
    for piece in rest {
        f.write_str(" ")?;
        write_piece(f, piece)?;
    }
    if grouped {
        f.write_str(" )")?;
    }
    Ok(())
}

fn write_node(f: &mut Formatter<'_>, node: &GrammarNode, prec: Prec) -> fmt::Result {
    match node {
        GrammarNode::Empty => f.write_str("<empty>"),
        GrammarNode::StartOfLine => f.write_str("<start-of-line>"),
        GrammarNode::EndOfInput => f.write_str("<end-of-input>"),
        GrammarNode::String(text) => write_literal(f, text, prec),
        GrammarNode::CharSet(set) => write!(f, "{set}"),
        GrammarNode::Ref { name, args } => {
            f.write_str(name)?;
            write_args(f, args)
        }
        GrammarNode::Sequence(nodes) if nodes.is_empty() => f.write_str("<empty>"),
        GrammarNode::Sequence(nodes) if prec == Prec::Postfix => {
            f.write_str("( ")?;
            write_list(f, nodes, " ", Prec::Sequence)?;
            f.write_str(" )")
        }
        GrammarNode::Sequence(nodes) => write_list(f, nodes, " ", Prec::Sequence),
        GrammarNode::First(nodes) if prec > Prec::Alternation => {
            f.write_str("( ")?;
            write_list(f, nodes, " | ", Prec::Alternation)?;
            f.write_str(" )")
        }
        GrammarNode::First(nodes) => write_list(f, nodes, " | ", Prec::Alternation),
        GrammarNode::Repeat { child, min, max } => {
            if prec == Prec::Postfix {
                f.write_str("( ")?;
            }
            write_node(f, child, Prec::Postfix)?;
            match (min, max) {
                (Bound::Fixed(0), Some(Bound::Fixed(1))) => f.write_str("?")?,
                (Bound::Fixed(0), None) => f.write_str("*")?,
                (Bound::Fixed(1), None) => f.write_str("+")?,
                (min, Some(max)) if min == max => write!(f, "{{{min}}}")?,
                (min, Some(max)) => write!(f, "{{{min},{max}}}")?,
                (min, None) => write!(f, "{{{min},}}")?,
            }
            if prec == Prec::Postfix {
                f.write_str(" )")?;
            }
            Ok(())
        }
        GrammarNode::Lookahead { child, positive } => {
            let op = if *positive { "=" } else { "≠" };
            write!(f, "[ lookahead {op} ")?;
            write_node(f, child, Prec::Alternation)?;
            f.write_str(" ]")
        }
        GrammarNode::Lookbehind(child) => {
            f.write_str("[ lookbehind = ")?;
            write_node(f, child, Prec::Alternation)?;
            f.write_str(" ]")
        }
        GrammarNode::DetectIndentation { min, child } => {
            write!(f, "<detect-indentation({min})>( ")?;
            write_node(f, child, Prec::Alternation)?;
            f.write_str(" )")
        }
        GrammarNode::Context(cases) => {
            f.write_str("<context")?;
            for case in cases {
                write!(f, " {}=> ", case.pattern)?;
                write_node(f, &case.body, Prec::Sequence)?;
                f.write_str(";")?;
            }
            f.write_str(">")
        }
    }
}

fn write_clause(
    f: &mut Formatter<'_>,
    number: Option<u32>,
    name: &str,
    head: &[String],
    body: &GrammarNode,
) -> fmt::Result {
    if let Some(number) = number {
        write!(f, "[{number}] ")?;
    }
    f.write_str(name)?;
    write_args(f, head)?;
    f.write_str(" ::= ")?;
    write_node(f, body, Prec::Alternation)?;
    writeln!(f)
}

/// Writes one production; a top-level `Context` body becomes one clause per case.
pub(crate) fn write_production(
    f: &mut Formatter<'_>,
    name: &str,
    production: &Production,
) -> fmt::Result {
    let formals: Vec<String> = production
        .parameters
        .iter()
        .map(|p| p.to_string())
        .collect();

    let GrammarNode::Context(cases) = &production.body else {
        return write_clause(f, production.number, name, &formals, &production.body);
    };

    for (i, case) in cases.iter().enumerate() {
        let head: Vec<String> = production
            .parameters
            .iter()
            .map(|&p| match case.pattern.get(p) {
                Some(value) => value.to_string(),
                None => p.to_string(),
            })
            .collect();
        let number = if i == 0 { production.number } else { None };
        write_clause(f, number, name, &head, &case.body)?;
    }
    Ok(())
}

impl Display for Grammar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (name, production) in self.iter() {
            write_production(f, name, production)?;
        }
        Ok(())
    }
}
